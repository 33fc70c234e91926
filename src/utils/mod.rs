use std::sync::LazyLock;

use regex::Regex;

use crate::domain::Format;

// ASCII word characters, whitespace, '.' and '-' survive
static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s.-]").expect("valid regex"));

/// Strip every character that is not safe in a saved file name
pub fn sanitize_filename(filename: &str) -> String {
    UNSAFE_CHARS.replace_all(filename, "").into_owned()
}

/// Name the downloaded file after the video title
pub fn output_filename(title: &str, format: Format) -> String {
    format!("{}.{}", sanitize_filename(title), format.extension())
}
