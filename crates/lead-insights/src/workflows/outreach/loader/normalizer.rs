/// Trims, collapses inner whitespace, strips invisible marks, and upper-cases
/// a categorical value so vocabulary lookups are reliable.
pub(crate) fn normalize_category(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_uppercase()
}
