//! App and website categorization for the companion focus tracker.
//!
//! The tracker reports whatever is in the foreground: a macOS bundle id such as
//! `com.microsoft.VSCode` or a browser URL. Both are reduced to a lowercase key
//! and looked up first in the user's own list, then in the built-in defaults.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoreError;

pub const DEFAULT_PRODUCTIVE: &[&str] = &[
    "com.microsoft.vscode",
    "com.apple.dt.xcode",
    "com.jetbrains.pycharm",
    "localhost:3000",
    "localhost:5173",
    "github.com",
];

pub const DEFAULT_UNPRODUCTIVE: &[&str] = &[
    "chatgpt.com",
    "com.spotify.client",
    "instagram.com",
    "twitter.com",
    "reddit.com",
    "youtube.com",
    "netflix.com",
];

/// Maximum length of a stored app/site key.
pub const FOCUS_APP_NAME_MAX: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusCategory {
    Productive,
    Unproductive,
    Unknown,
}

impl FocusCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Productive => "productive",
            Self::Unproductive => "unproductive",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for FocusCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "productive" => Ok(Self::Productive),
            "unproductive" => Ok(Self::Unproductive),
            "unknown" => Ok(Self::Unknown),
            other => Err(CoreError::Validation(format!(
                "Invalid category '{other}'. Must be one of: productive, unproductive"
            ))),
        }
    }
}

impl TryFrom<String> for FocusCategory {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Reduce a URL to its host (port kept, `www.` dropped). Returns `None` for
/// input with no usable host.
///
/// ```
/// use slate_core::focus::base_domain;
/// assert_eq!(base_domain("https://www.YouTube.com/watch?v=1").as_deref(), Some("youtube.com"));
/// assert_eq!(base_domain("localhost:5173/app").as_deref(), Some("localhost:5173"));
/// ```
pub fn base_domain(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }
    // Bare hosts like `localhost:5173` would otherwise parse as a scheme.
    let parsed = if trimmed.contains("://") {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("https://{trimmed}"))
    }
    .ok()?;
    let host = parsed.host_str().filter(|h| !h.is_empty())?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    Some(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Normalize a tracker item into the key stored in `focus_apps`.
///
/// Reverse-DNS bundle ids (`com.*` with no scheme, path, or port) pass through
/// lowercased; everything else is treated as a URL.
pub fn normalize_item(item: &str) -> Option<String> {
    let trimmed = item.trim();
    if trimmed.is_empty() {
        return None;
    }
    let looks_like_bundle = !trimmed.contains("://")
        && !trimmed.contains('/')
        && !trimmed.contains(':')
        && trimmed.starts_with("com.");
    if looks_like_bundle {
        Some(trimmed.to_lowercase())
    } else {
        base_domain(trimmed)
    }
}

/// Categorize a normalized key. User entries win over the defaults.
pub fn categorize<'a, I>(key: &str, user_entries: I) -> FocusCategory
where
    I: IntoIterator<Item = (&'a str, FocusCategory)>,
{
    if let Some((_, category)) = user_entries
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
    {
        return category;
    }
    if DEFAULT_PRODUCTIVE.contains(&key) {
        FocusCategory::Productive
    } else if DEFAULT_UNPRODUCTIVE.contains(&key) {
        FocusCategory::Unproductive
    } else {
        FocusCategory::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_ENTRIES: [(&str, FocusCategory); 0] = [];

    #[test]
    fn base_domain_strips_scheme_path_and_www() {
        assert_eq!(base_domain("https://www.reddit.com/r/rust").as_deref(), Some("reddit.com"));
        assert_eq!(base_domain("github.com/rust-lang").as_deref(), Some("github.com"));
        assert_eq!(base_domain("http://user@Example.org:8080/x").as_deref(), Some("example.org:8080"));
        assert_eq!(base_domain("https://"), None);
        assert_eq!(base_domain(""), None);
    }

    #[test]
    fn base_domain_keeps_explicit_ports_only() {
        assert_eq!(base_domain("http://127.0.0.1:8000/admin").as_deref(), Some("127.0.0.1:8000"));
        assert_eq!(base_domain("https://example.com:443/").as_deref(), Some("example.com"));
        assert_eq!(base_domain("WWW.Netflix.com?x=1#top").as_deref(), Some("netflix.com"));
        assert_eq!(base_domain("file:///tmp/notes.txt"), None);
    }

    #[test]
    fn bundle_ids_pass_through_lowercased() {
        assert_eq!(normalize_item("com.Microsoft.VSCode").as_deref(), Some("com.microsoft.vscode"));
        assert_eq!(normalize_item("https://www.youtube.com/").as_deref(), Some("youtube.com"));
        assert_eq!(normalize_item("   "), None);
    }

    #[test]
    fn defaults_apply_without_user_entries() {
        assert_eq!(categorize("github.com", NO_ENTRIES), FocusCategory::Productive);
        assert_eq!(categorize("youtube.com", NO_ENTRIES), FocusCategory::Unproductive);
        assert_eq!(categorize("example.com", NO_ENTRIES), FocusCategory::Unknown);
    }

    #[test]
    fn user_entries_override_defaults() {
        let mine = [("youtube.com", FocusCategory::Productive)];
        assert_eq!(categorize("youtube.com", mine), FocusCategory::Productive);
    }

    #[test]
    fn category_parse() {
        assert_eq!("productive".parse::<FocusCategory>().unwrap(), FocusCategory::Productive);
        assert!("meh".parse::<FocusCategory>().is_err());
    }
}
