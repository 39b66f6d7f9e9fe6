//! Search-results page patterns

use std::sync::LazyLock;

use regex::Regex;

static RESULT_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+) résultats? trouvés? dans les titres de films\.")
        .expect("result count pattern must compile")
});

static CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<a href='/film/fichefilm_gen_cfilm=(\d+)\.html'><img.+?src='.+?'.+?alt='.+?' />")
        .expect("candidate pattern must compile")
});

/// Number of title matches the page claims to have, as written on the page
///
/// `None` means the page reports no movie matches at all.
pub fn extract_result_count(page: &str) -> Option<String> {
    RESULT_COUNT
        .captures(page)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Movie ids linked from result thumbnails, in page order
///
/// Duplicates are kept.
pub fn extract_candidate_ids(page: &str) -> Vec<String> {
    CANDIDATE
        .captures_iter(page)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
