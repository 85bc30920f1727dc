//! Turning video titles into file names

/// Longest file stem we produce, in characters
const MAX_STEM_CHARS: usize = 200;

/// Characters invalid on Windows/macOS/Linux filesystems
const INVALID_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Sanitize a video title into a file stem that is legal on every platform.
///
/// Invalid characters become `_`, control characters are dropped, leading and
/// trailing dots/whitespace are trimmed and runs of `_` are collapsed. The
/// result is never empty and never longer than 200 characters.
///
/// # Examples
/// ```
/// use tubefetch::utils::sanitize_title;
/// assert_eq!(sanitize_title("AC/DC: Live"), "AC_DC_ Live");
/// assert_eq!(sanitize_title(".hidden"), "hidden");
/// assert_eq!(sanitize_title(""), "video");
/// ```
pub fn sanitize_title(title: &str) -> String {
    let mut sanitized: String = title
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if INVALID_CHARS.contains(&c) { '_' } else { c })
        .collect();

    while sanitized.contains("__") {
        sanitized = sanitized.replace("__", "_");
    }

    let trimmed = sanitized
        .trim()
        .trim_start_matches('.')
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace());

    if trimmed.is_empty() {
        return "video".to_string();
    }

    trimmed.chars().take(MAX_STEM_CHARS).collect::<String>().trim_end().to_string()
}
