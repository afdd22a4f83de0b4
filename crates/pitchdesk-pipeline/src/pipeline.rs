//! Generation pipeline orchestration.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use pitchdesk_core::{EmailDraftSet, HistoryEntry, ResearchResult};
use pitchdesk_llm::{extract_draft_set, prompt::drafts_prompt, FallbackReason, MessagesClient};
use uuid::Uuid;

use crate::error::PipelineError;
use crate::sources::{HistorySink, ProfileProvider};

/// Everything one generation produced.
#[derive(Debug, Clone)]
pub struct Generation {
    pub research: ResearchResult,
    pub drafts: EmailDraftSet,
    /// Set when the draft reply was unusable and placeholder drafts were used.
    pub fallback: Option<FallbackReason>,
    pub history_id: String,
    pub rightsholder: String,
}

/// Runs generations one at a time against a [`MessagesClient`].
#[derive(Debug)]
pub struct Generator {
    client: MessagesClient,
    busy: AtomicBool,
}

/// Clears the busy flag when the generation ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Generator {
    #[must_use]
    pub fn new(client: MessagesClient) -> Self {
        Self {
            client,
            busy: AtomicBool::new(false),
        }
    }

    /// Whether a generation is currently in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Research `company`, draft three emails for the active profile and
    /// record the result in `history`.
    ///
    /// 1. Research request with web search; its text becomes the summary.
    /// 2. Draft request embedding the summary and profile.
    /// 3. Best-effort extraction of the draft JSON, falling back to the
    ///    placeholder set on malformed output.
    /// 4. History append.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::EmptyCompany`] / [`PipelineError::NoActiveProfile`]
    ///   before anything is sent.
    /// - [`PipelineError::Busy`] if another generation is running.
    /// - [`PipelineError::Llm`] if either request fails; history is untouched.
    /// - [`PipelineError::Store`] if history cannot be written.
    pub async fn generate<P, H>(
        &self,
        company: &str,
        profiles: &P,
        history: &H,
    ) -> Result<Generation, PipelineError>
    where
        P: ProfileProvider + ?Sized,
        H: HistorySink + ?Sized,
    {
        let company = company.trim();
        if company.is_empty() {
            return Err(PipelineError::EmptyCompany);
        }
        let profile = profiles
            .active_profile()?
            .ok_or(PipelineError::NoActiveProfile)?;

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(PipelineError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        tracing::info!(company, rightsholder = %profile.name(), "generation started");

        let summary = self.client.research(company).await.inspect_err(|e| {
            tracing::error!(company, error = %e, "research request failed");
        })?;
        let research = ResearchResult {
            company: company.to_string(),
            summary,
            sources: Vec::new(),
            timestamp: Utc::now(),
        };

        let prompt = drafts_prompt(company, &research.summary, &profile);
        let raw = self.client.complete(&prompt).await.inspect_err(|e| {
            tracing::error!(company, error = %e, "draft request failed");
        })?;

        let extraction = extract_draft_set(&raw);

        let entry = HistoryEntry {
            id: format!("email-{}", Uuid::new_v4().simple()),
            company: company.to_string(),
            rightsholder: profile.name().to_string(),
            research: research.summary.clone(),
            drafts: extraction.drafts.clone(),
            timestamp: Utc::now(),
        };
        let history_id = entry.id.clone();
        history.record(entry)?;

        tracing::info!(
            company,
            history_id = %history_id,
            fallback = extraction.fallback.is_some(),
            "generation finished"
        );

        Ok(Generation {
            research,
            drafts: extraction.drafts,
            fallback: extraction.fallback,
            history_id,
            rightsholder: profile.details.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pitchdesk_core::{default_profile, RightsholderProfile};

    use super::*;

    struct FixedProfile(Option<RightsholderProfile>);

    impl ProfileProvider for FixedProfile {
        fn active_profile(&self) -> Result<Option<RightsholderProfile>, PipelineError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct MemorySink(Mutex<Vec<HistoryEntry>>);

    impl HistorySink for MemorySink {
        fn record(&self, entry: HistoryEntry) -> Result<(), PipelineError> {
            self.0.lock().expect("sink lock").push(entry);
            Ok(())
        }
    }

    fn generator() -> Generator {
        // Port 1 is never listening; these tests must fail before any request.
        let client = MessagesClient::new("http://127.0.0.1:1/api/claude", "m", 10, 1)
            .expect("client construction should not fail");
        Generator::new(client)
    }

    #[tokio::test]
    async fn blank_company_is_rejected_before_any_request() {
        let sink = MemorySink::default();
        let err = generator()
            .generate("   ", &FixedProfile(Some(default_profile(Utc::now()))), &sink)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::EmptyCompany));
        assert!(err.is_precondition());
        assert!(sink.0.lock().expect("sink lock").is_empty());
    }

    #[tokio::test]
    async fn missing_active_profile_is_rejected() {
        let sink = MemorySink::default();
        let err = generator()
            .generate("Acme", &FixedProfile(None), &sink)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NoActiveProfile));
    }

    #[tokio::test]
    async fn busy_generator_rejects_second_call() {
        let generator = generator();
        generator.busy.store(true, Ordering::Release);
        let err = generator
            .generate(
                "Acme",
                &FixedProfile(Some(default_profile(Utc::now()))),
                &MemorySink::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Busy));
        assert!(generator.is_busy(), "rejected call must not clear the flag");
    }

    #[tokio::test]
    async fn transport_failure_clears_busy_flag_and_skips_history() {
        let generator = generator();
        let sink = MemorySink::default();
        let err = generator
            .generate("Acme", &FixedProfile(Some(default_profile(Utc::now()))), &sink)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Llm(_)));
        assert!(!generator.is_busy());
        assert!(sink.0.lock().expect("sink lock").is_empty());
    }
}
