//! Prompt construction for the research and draft requests.

use pitchdesk_core::RightsholderProfile;

/// Search phrase recorded alongside a research request.
#[must_use]
pub fn search_query(company: &str) -> String {
    format!("{company} recent news partnership expansion")
}

/// Instruction for the web-search research request.
#[must_use]
pub fn research_prompt(company: &str) -> String {
    format!(
        "Search for news and information about \"{company}\" from the LAST 12 MONTHS ONLY. \
         Focus on: recent announcements, expansions, partnerships, executive changes, \
         funding rounds, business developments, financial results, strategic initiatives. \
         Provide a concise summary of what you find, prioritizing the most recent developments."
    )
}

/// Instruction for the email draft request.
///
/// Embeds the research summary and the rightsholder's territory,
/// differentiators, pitch angles, target categories and sales approach, and
/// asks for a single raw JSON object keyed `conservative`, `valueFocused`,
/// `bold` and `recommendation`.
#[must_use]
pub fn drafts_prompt(company: &str, research_summary: &str, profile: &RightsholderProfile) -> String {
    let details = &profile.details;
    let mut prompt = format!(
        "You are a professional sports partnership sales expert. \
         Generate 3 email draft variations for reaching out to {company}.\n\n\
         RESEARCH FINDINGS:\n{research_summary}\n\n\
         RIGHTSHOLDER CONTEXT:\n\
         Name: {name}\n\
         League: {league}\n\
         Territory: {primary}\n\
         Extended Reach: {extended}\n\n",
        name = details.name,
        league = details.league,
        primary = details.territory.primary,
        extended = details.territory.extended,
    );

    prompt.push_str("KEY DIFFERENTIATORS:\n");
    prompt.push_str(&numbered(&details.differentiators));
    prompt.push_str("\n\nPITCH ANGLES:\n");
    prompt.push_str(&numbered(&details.pitch_angles));
    prompt.push_str("\n\nTARGET CATEGORIES:\n");
    let categories = details
        .target_categories
        .iter()
        .map(|c| format!("- {} ({} priority): {}", c.name, c.priority, c.note))
        .collect::<Vec<_>>()
        .join("\n");
    prompt.push_str(&categories);

    prompt.push_str(&format!("\n\nSALES APPROACH: {}\n\n", details.approach));

    prompt.push_str(DRAFT_INSTRUCTIONS);
    prompt
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

const DRAFT_INSTRUCTIONS: &str = r#"Generate 3 email variations:
1. CONSERVATIVE: Professional, brief, meeting request focused
2. VALUE-FOCUSED: Emphasizes ROI and business objectives, uses specific differentiators
3. BOLD/CREATIVE: Unique angle, references their recent news, forward-thinking

For each email:
- Subject line
- Body (150-200 words max)
- Why this approach works (2-3 sentences)
- Confidence score (1-10) based on timing and fit

Use the research findings to personalize. Reference specific news/developments when relevant. Connect their business to the rightsholder's differentiators naturally.

CRITICAL: Return ONLY valid JSON with no markdown formatting, no code fences, no extra text. Just the raw JSON object.

Format as JSON:
{
  "conservative": {"subject": "", "body": "", "reasoning": "", "confidence": 0},
  "valueFocused": {"subject": "", "body": "", "reasoning": "", "confidence": 0},
  "bold": {"subject": "", "body": "", "reasoning": "", "confidence": 0},
  "recommendation": "Which approach to use and why"
}"#;
