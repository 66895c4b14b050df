use crate::models::Message;

/// Appended when a summary is cut at the configured length
pub const TRUNCATION_MARKER: &str = "...";

/// Bound a raw summary to `max_chars` characters
///
/// Over-long summaries keep their first `max_chars` characters followed by
/// [`TRUNCATION_MARKER`], so the result can be up to three characters longer
/// than `max_chars`. Sheet titles downstream depend on this exact length.
pub fn truncate_summary(raw: &str, max_chars: usize) -> String {
    let raw = raw.trim();
    if raw.chars().count() <= max_chars {
        return raw.to_string();
    }

    let mut truncated: String = raw.chars().take(max_chars).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

/// Messages for the one-off summarization request
pub fn summary_request(initial_prompt: &str, max_chars: usize) -> Vec<Message> {
    vec![
        Message::system(format!(
            "Summarize the text sent by the user in at most {} characters. \
             Reply with the summary only, without quotes or punctuation at the end.",
            max_chars
        )),
        Message::user(initial_prompt),
    ]
}
