use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Returned by [`extract_email`] when the text carries no address
pub const EMAIL_NOT_FOUND: &str = "Not Found";

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+").expect("valid email regex")
});

static SOCIAL_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("instagram", r"(?:https?://)?(?:www\.)?instagram\.com/[a-zA-Z0-9_.]+/?"),
        ("twitter", r"(?:https?://)?(?:www\.)?(?:twitter\.com|x\.com)/[a-zA-Z0-9_]+/?"),
        ("facebook", r"(?:https?://)?(?:www\.)?facebook\.com/[a-zA-Z0-9.]+/?"),
        ("tiktok", r"(?:https?://)?(?:www\.)?tiktok\.com/@[a-zA-Z0-9.]+/?"),
        ("linkedin", r"(?:https?://)?(?:www\.)?linkedin\.com/in/[a-zA-Z0-9-]+/?"),
    ]
    .into_iter()
    .map(|(platform, pattern)| (platform, Regex::new(pattern).expect("valid social regex")))
    .collect()
});

/// First email-like address in `text`, or [`EMAIL_NOT_FOUND`]
pub fn extract_email(text: &str) -> String {
    EMAIL_REGEX
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| EMAIL_NOT_FOUND.to_string())
}

/// Every profile link per platform; platforms without a match are left out
pub fn extract_social_links(text: &str) -> BTreeMap<String, Vec<String>> {
    SOCIAL_PATTERNS
        .iter()
        .filter_map(|(platform, regex)| {
            let links: Vec<String> = regex.find_iter(text).map(|m| m.as_str().to_string()).collect();
            (!links.is_empty()).then(|| (platform.to_string(), links))
        })
        .collect()
}
