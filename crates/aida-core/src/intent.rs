//! Lead-generation intent detection.

/// Phrases that route a chat message to the lead panel instead of the agent.
pub const LEAD_KEYWORDS: [&str; 8] = [
    "create leads",
    "generate leads",
    "find leads",
    "lead generation",
    "find businesses",
    "search businesses",
    "prospect",
    "prospecting",
];

/// Returns true when the message asks for lead generation.
///
/// Case-insensitive substring match against [`LEAD_KEYWORDS`].
pub fn is_lead_generation_query(message: &str) -> bool {
    let lower = message.to_lowercase();
    LEAD_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}
