//! `generate` command handler.

use chrono::Utc;
use pitchdesk_core::{AppConfig, EmailDraftSet};
use pitchdesk_llm::MessagesClient;
use pitchdesk_pipeline::Generator;
use pitchdesk_store::{HistoryLog, ProfileRepository};

/// Research `company` and print the three drafts.
///
/// # Errors
///
/// Returns an error if the company is blank, no profile is active, either
/// request fails, or history cannot be written.
pub(crate) async fn run(config: &AppConfig, company: &str, json: bool) -> anyhow::Result<()> {
    let profiles = ProfileRepository::open(config.profiles_path(), Utc::now())?;
    let history = HistoryLog::new(config.history_path());

    let mut client = MessagesClient::from_config(config)?;
    if let Some(key) = &config.anthropic_api_key {
        client = client.with_api_key(key.clone());
    }
    tracing::debug!(endpoint = %client.endpoint(), model = client.model(), "language model client ready");
    let generator = Generator::new(client);

    let generation = generator.generate(company, &profiles, &history).await?;

    if json {
        let out = serde_json::json!({
            "historyId": generation.history_id,
            "rightsholder": generation.rightsholder,
            "research": generation.research,
            "drafts": generation.drafts,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{} for {}", generation.research.company, generation.rightsholder);
    println!();
    println!("RESEARCH");
    println!("{}", generation.research.summary.trim_end());
    println!();
    if let Some(reason) = &generation.fallback {
        eprintln!("warning: model reply was not valid draft JSON ({reason}); showing raw reply");
    }
    print_drafts(&generation.drafts);
    println!("saved as {}", generation.history_id);
    Ok(())
}

pub(crate) fn print_drafts(drafts: &EmailDraftSet) {
    for (label, draft) in drafts.variants() {
        let confidence = draft
            .confidence
            .map_or_else(|| "-".to_string(), |c| format!("{c}/10"));
        println!("== {label} (confidence {confidence})");
        println!("Subject: {}", draft.subject.as_deref().unwrap_or(""));
        println!();
        println!("{}", draft.body.as_deref().unwrap_or("").trim_end());
        if let Some(reasoning) = &draft.reasoning {
            println!();
            println!("Why: {reasoning}");
        }
        println!();
    }
    if let Some(recommendation) = &drafts.recommendation {
        println!("Recommendation: {recommendation}");
    }
}
