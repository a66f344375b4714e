/// Splits free text notes into the non-blank lines shown on the invoice.
pub fn note_lines(notes: Option<&str>) -> Vec<String> {
    notes
        .map(str::trim)
        .unwrap_or_default()
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
