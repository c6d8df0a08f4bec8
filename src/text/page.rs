//! Mapping between page paths, translation file names and content documents.
//!
//! Each mapping replaces only the first occurrence of its pattern, so a page
//! such as `blog/index-of-posts.html` keeps the rest of its name.

/// Path of a page as used in links (`about.html` -> `about`, `index.html` -> ``).
#[must_use]
pub fn page_link_path(page: &str) -> String {
    page.replacen(".html", "", 1).replacen("index", "", 1)
}

/// Stem of the translation file written for a page.
///
/// `index.html` -> `home`, `blog/index.html` -> `blog`, `about.html` -> `about`.
#[must_use]
pub fn translation_file_stem(page: &str) -> String {
    page.replacen("/index.html", "", 1).replacen(".html", "", 1).replacen("index", "home", 1)
}

/// Content document name for a translation file stem (`home` -> `index.md`).
#[must_use]
pub fn content_file_name(stem: &str) -> String {
    format!("{}.md", stem.replacen("home", "index", 1))
}
