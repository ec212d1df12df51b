/// Normalizes a scan target into a fetchable URL
///
/// Surrounding whitespace is trimmed and, when the target has neither an
/// `http://` nor an `https://` prefix (compared case-insensitively),
/// `https://` is prepended. Nothing else about the URL is changed, so two
/// targets are duplicates only if they normalize to the same string.
///
/// # Examples
///
/// ```
/// use sumi_sieve::target::normalize_target;
///
/// assert_eq!(normalize_target("example.com"), "https://example.com");
/// assert_eq!(normalize_target("http://example.com"), "http://example.com");
/// ```
pub fn normalize_target(target: &str) -> String {
    let target = target.trim();

    if has_http_scheme(target) {
        target.to_string()
    } else {
        format!("https://{}", target)
    }
}

fn has_http_scheme(target: &str) -> bool {
    ["http://", "https://"].iter().any(|prefix| {
        target
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}
