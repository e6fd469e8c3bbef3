/// True if `title` contains one of the lower-cased `keywords`, ignoring case.
pub fn contains_keyword(title: &str, keywords: &[String]) -> bool {
    if keywords.is_empty() {
        return false;
    }
    let title_lower = title.to_lowercase();
    keywords
        .iter()
        .any(|keyword| title_lower.contains(keyword.as_str()))
}

/// Navigation and consent chrome that shows up as a candidate title.
pub fn should_reject(title: &str, negative_keywords: &[String]) -> bool {
    contains_keyword(title, negative_keywords)
}
