//! Browser tab records.
//!
//! Scripted enumeration of a running browser lives at the platform edge;
//! this module owns the record shapes, the pinned/top-app classifier, the
//! tab-suspender URL unwrap, and the domain-core extraction that makes URLs
//! searchable by their site name rather than their full path.

use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use crate::search::Searchable;
use crate::transliterate::{fold, loose_words, transliterate};
use crate::windows::app_file_stem;

/// Browsers queried in tab mode, in fixed priority order.
pub const BROWSER_BUNDLE_IDS: &[&str] = &[
    "com.apple.Safari",
    "com.google.Chrome",
    "company.thebrowser.Browser",
];

/// Intra-source ordering classifier reported by some browsers (Arc pins and
/// "top apps"). Absent or unrecognized values sort with the pinned group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabLocation {
    Pinned,
    TopApp,
    Unpinned,
    Unknown,
}

impl TabLocation {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pinned" => TabLocation::Pinned,
            "topApp" => TabLocation::TopApp,
            "unpinned" => TabLocation::Unpinned,
            _ => TabLocation::Unknown,
        }
    }

    pub fn is_unpinned(self) -> bool {
        self == TabLocation::Unpinned
    }

    pub fn title_prefix(self) -> &'static str {
        match self {
            TabLocation::Pinned => "📌 ",
            TabLocation::TopApp => "🔝 ",
            TabLocation::Unpinned | TabLocation::Unknown => "",
        }
    }
}

/// One scripted browser window: a title and its tabs in reported order.
#[derive(Debug, Clone)]
pub struct BrowserWindow {
    pub title: String,
    pub tabs: Vec<TabRecord>,
}

#[derive(Debug, Clone)]
pub struct TabRecord {
    pub url: String,
    pub title: String,
    pub tab_index: i64,
    pub window_index: i64,
    pub tab_id: String,
    pub location: TabLocation,
    pub bundle_id: String,
    pub process_name: String,
    pub app_path: String,
    /// Resolved favicon file, filled in by the icon cache; `None` means the
    /// presentation layer falls back to the owning application's icon.
    pub icon_path: Option<PathBuf>,
    search_strings: Vec<String>,
}

impl TabRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        url: String,
        title: String,
        tab_index: i64,
        window_index: i64,
        tab_id: String,
        location: TabLocation,
        bundle_id: String,
        process_name: String,
        app_path: String,
    ) -> Self {
        let search_strings = vec![
            fold(&domain_words(&url)),
            fold(&loose_ascii_words(&title)),
            fold(&loose_words(&title)),
            fold(&process_name),
            fold(&transliterate(&process_name)),
            fold(&app_file_stem(&app_path)),
        ];
        TabRecord {
            url,
            title,
            tab_index,
            window_index,
            tab_id,
            location,
            bundle_id,
            process_name,
            app_path,
            icon_path: None,
            search_strings,
        }
    }
}

impl Searchable for TabRecord {
    fn search_strings(&self) -> &[String] {
        &self.search_strings
    }
}

fn suspender_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"chrome-extension://[a-z]+/suspended\.html#.+?&uri=").expect("suspender regex")
    })
}

fn domain_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^https?://(www2?\.|m\.)?([\w\.]+)(\.co)?(\.[A-Za-z]+)/?.*")
            .expect("domain regex")
    })
}

/// Strip the `tab suspender` extension prefix so both matching and the
/// output argument see the original URL.
pub fn unsuspend(url: &str) -> Cow<'_, str> {
    suspender_re().replace(url, "")
}

/// Reduce a URL to the core words of its domain: scheme, `www`/mobile
/// prefixes, the public suffix, and the path all drop out.
pub fn domain_words(url: &str) -> String {
    let unsuspended = unsuspend(url);
    let core = domain_re().replace(unsuspended.as_ref(), "$2");
    core.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// ASCII-only loose words of the raw title (no transliteration), mirroring
/// the second title fragment every tab carries.
fn loose_ascii_words(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Flatten scripted windows into tab records, dropping windows whose title
/// is empty (Chrome PWAs surface as untitled placeholder windows). Order is
/// the browser-reported order throughout.
pub fn collect_tabs(windows: Vec<BrowserWindow>) -> Vec<TabRecord> {
    windows
        .into_iter()
        .filter(|w| !w.title.is_empty())
        .flat_map(|w| w.tabs)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::search;

    fn tab(url: &str, title: &str, location: TabLocation) -> TabRecord {
        TabRecord::new(
            url.to_string(),
            title.to_string(),
            0,
            0,
            String::new(),
            location,
            "com.google.Chrome".into(),
            "Google Chrome".into(),
            "/Applications/Google Chrome.app".into(),
        )
    }

    #[test]
    fn location_parsing() {
        assert_eq!(TabLocation::parse("pinned"), TabLocation::Pinned);
        assert_eq!(TabLocation::parse("topApp"), TabLocation::TopApp);
        assert_eq!(TabLocation::parse("unpinned"), TabLocation::Unpinned);
        assert_eq!(TabLocation::parse(""), TabLocation::Unknown);
        assert!(!TabLocation::Unknown.is_unpinned());
    }

    #[test]
    fn unsuspend_strips_extension_prefix() {
        let suspended =
            "chrome-extension://abcdef/suspended.html#ttl=Docs&uri=https://example.com/page";
        assert_eq!(unsuspend(suspended), "https://example.com/page");
        assert_eq!(unsuspend("https://example.com"), "https://example.com");
    }

    #[test]
    fn domain_words_extracts_site_core() {
        assert_eq!(domain_words("https://openai.com/blog"), "openai");
        assert_eq!(domain_words("https://www.github.com/rust-lang"), "github");
        assert_eq!(
            domain_words("https://encrypted.google.com/search?q=x"),
            "encrypted google"
        );
        assert_eq!(domain_words("http://m.example.org"), "example");
    }

    #[test]
    fn collect_tabs_drops_untitled_windows_and_keeps_order() {
        let windows = vec![
            BrowserWindow {
                title: "Work".into(),
                tabs: vec![tab("https://a.com", "A", TabLocation::Unknown)],
            },
            BrowserWindow {
                title: String::new(),
                tabs: vec![tab("https://pwa.com", "PWA", TabLocation::Unknown)],
            },
            BrowserWindow {
                title: "Play".into(),
                tabs: vec![tab("https://b.com", "B", TabLocation::Unknown)],
            },
        ];
        let tabs = collect_tabs(windows);
        let titles: Vec<_> = tabs.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn multi_term_query_must_match_one_tab() {
        let tabs = vec![
            tab("https://openai.com/blog", "OpenAI Blog", TabLocation::Unknown),
            tab("https://example.com", "Example", TabLocation::Unknown),
        ];
        let hits = search(tabs, "open blog");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "OpenAI Blog");
    }

    #[test]
    fn suspended_tab_matches_by_original_domain() {
        let t = tab(
            "chrome-extension://abc/suspended.html#ttl=x&uri=https://openai.com/blog",
            "OpenAI Blog",
            TabLocation::Unknown,
        );
        assert_eq!(search(vec![t], "openai").len(), 1);
    }
}
