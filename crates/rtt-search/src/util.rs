//! Small query-parsing helpers shared by handlers.

/// Splits a comma-separated `collections` query param into a `Vec<String>`,
/// trimming whitespace and dropping empty entries. `None` means "no filter".
pub fn parse_collections(csv: Option<&str>) -> Option<Vec<String>> {
    let csv = csv?;
    let collections: Vec<String> = csv.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
    if collections.is_empty() {
        None
    } else {
        Some(collections)
    }
}
