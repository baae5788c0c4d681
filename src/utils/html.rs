// src/utils/html.rs

/// Sanitize user-supplied text with the ammonia whitelist.
///
/// Free-text fields (review text) are stored and echoed back to other
/// clients, so script tags and event-handler attributes are stripped before
/// the text ever reaches the database.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
