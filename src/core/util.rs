//! Generic utilities used across core modules.

/// Filter items by case-insensitive substring match on any of their string fields.
/// Returns all items when query is empty.
pub fn filter_by_query<'a, T, F, const N: usize>(
    items: &'a [T],
    query: &str,
    get_fields: F,
) -> Vec<&'a T>
where
    F: Fn(&'a T) -> [&'a str; N],
{
    if query.is_empty() {
        return items.iter().collect();
    }
    let q = query.to_lowercase();
    items
        .iter()
        .filter(|item| {
            get_fields(item)
                .iter()
                .any(|field| field.to_lowercase().contains(&q))
        })
        .collect()
}

/// Shorten `text` to `max_len` characters with an ellipsis. Newlines become spaces.
pub fn truncate_preview(text: &str, max_len: usize) -> String {
    let s = text.trim().replace('\n', " ");
    if s.chars().count() <= max_len {
        return s;
    }
    let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
    format!("{}…", truncated.trim_end())
}
