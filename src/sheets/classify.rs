/// Substrings that betray an HTML error or Google login page
const ERROR_PAGE_MARKERS: [&str; 6] = [
    "<!doctype html",
    "<html",
    "google-signin",
    "accounts.google.com",
    "login",
    "service_login",
];

/// Whether a response body is an error page dressed up as a 200.
///
/// Google answers unpublished or private sheets with HTML rather than an
/// error status. Empty text is not treated as an error page; it simply
/// produces no rows downstream.
pub fn is_error_page(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();
    ERROR_PAGE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}
