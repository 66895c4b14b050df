//! Sheet title rules

/// Characters spreadsheet applications refuse in sheet titles
pub const FORBIDDEN_CHARS: [char; 7] = [':', '\\', '/', '?', '*', '[', ']'];

/// Longest title a sheet can carry
pub const MAX_SHEET_NAME_CHARS: usize = 31;

/// Title used when nothing usable is left after sanitizing
pub const FALLBACK_SHEET_NAME: &str = "Sheet";

/// Turn a session summary into a valid sheet title
///
/// Forbidden characters are removed, runs of whitespace or control characters
/// become one space, and the result is trimmed and capped at
/// [`MAX_SHEET_NAME_CHARS`]; an empty result becomes [`FALLBACK_SHEET_NAME`].
pub fn sanitize_sheet_name(summary: &str) -> String {
    let allowed: String = summary.chars().filter(|c| !FORBIDDEN_CHARS.contains(c)).collect();
    let stripped = allowed
        .split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    // Leading/trailing apostrophes are rejected by Excel as well
    let trimmed = stripped.trim().trim_matches('\'').trim();
    let capped: String = trimmed.chars().take(MAX_SHEET_NAME_CHARS).collect();

    if capped.is_empty() { FALLBACK_SHEET_NAME.to_string() } else { capped }
}

/// First of `base`, `base1`, `base2`, ... not already taken (case-insensitive)
///
/// Suffixed titles are shortened so they stay within [`MAX_SHEET_NAME_CHARS`].
pub fn unique_sheet_name<'a, I>(base: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: Vec<String> = existing.into_iter().map(str::to_lowercase).collect();
    let is_taken = |candidate: &str| taken.iter().any(|t| *t == candidate.to_lowercase());

    if !is_taken(base) {
        return base.to_string();
    }

    (1usize..)
        .map(|n| {
            let suffix = n.to_string();
            let keep = MAX_SHEET_NAME_CHARS.saturating_sub(suffix.len());
            let prefix: String = base.chars().take(keep).collect();
            format!("{}{}", prefix, suffix)
        })
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_else(|| base.to_string())
}
