//! Plain-text cleanup of markup fragments

use scraper::Html;

/// Visible text of a markup fragment
///
/// Tags are dropped, entities decoded and runs of whitespace collapsed to
/// a single space. Returns `None` when nothing but whitespace is left.
pub fn fragment_text(markup: &str) -> Option<String> {
    let fragment = Html::parse_fragment(markup);
    let text = fragment.root_element().text().collect::<String>();
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}
