//! On-screen window records.
//!
//! Enumeration itself lives at the platform edge; this module owns the
//! record shape, the visibility/exclusion filter, and the search fragments
//! each window contributes to the engine.

use std::path::Path;

use crate::search::Searchable;
use crate::transliterate::{fold, loose_words, transliterate};

/// Owning bundle ids whose windows never participate in search. The empty
/// string covers processes with no resolvable bundle.
pub const EXCLUDED_BUNDLE_IDS: &[&str] = &["", "com.apple.dock", "com.apple.WindowManager"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl WindowBounds {
    pub const ZERO: WindowBounds = WindowBounds {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };
}

#[derive(Debug, Clone)]
pub struct WindowInfo {
    pub name: String,
    pub process_name: String,
    pub pid: i64,
    pub window_id: u32,
    pub bundle_id: String,
    /// Path of the owning application bundle, empty when unresolvable.
    pub app_path: String,
    pub bounds: WindowBounds,
    pub alpha: f64,
    pub layer: i64,
    search_strings: Vec<String>,
}

impl WindowInfo {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        process_name: String,
        pid: i64,
        window_id: u32,
        bundle_id: String,
        app_path: String,
        bounds: WindowBounds,
        alpha: f64,
        layer: i64,
    ) -> Self {
        let file_name = app_file_stem(&app_path);
        let search_strings = vec![
            fold(&process_name),
            fold(&transliterate(&process_name)),
            fold(&file_name),
            fold(&name),
            fold(&loose_words(&name)),
        ];
        WindowInfo {
            name,
            process_name,
            pid,
            window_id,
            bundle_id,
            app_path,
            bounds,
            alpha,
            layer,
            search_strings,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.alpha > 0.0 && self.layer == 0
    }
}

impl Searchable for WindowInfo {
    fn search_strings(&self) -> &[String] {
        &self.search_strings
    }
}

/// File stem of an application bundle path ("Safari" for ".../Safari.app").
pub fn app_file_stem(app_path: &str) -> String {
    Path::new(app_path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Keep windows that a launcher should offer: visible, named, and not owned
/// by an excluded process. Placeholder windows with an empty name are dropped
/// regardless of query.
pub fn visible_windows(raw: Vec<WindowInfo>) -> Vec<WindowInfo> {
    raw.into_iter()
        .filter(|w| {
            w.is_visible()
                && !w.name.is_empty()
                && !EXCLUDED_BUNDLE_IDS.contains(&w.bundle_id.as_str())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::search;

    fn window(name: &str, process: &str, bundle_id: &str, alpha: f64, layer: i64) -> WindowInfo {
        WindowInfo::new(
            name.to_string(),
            process.to_string(),
            42,
            7,
            bundle_id.to_string(),
            format!("/Applications/{process}.app"),
            WindowBounds::ZERO,
            alpha,
            layer,
        )
    }

    #[test]
    fn filter_drops_invisible_and_unnamed_windows() {
        let raw = vec![
            window("Inbox – Mail", "Mail", "com.apple.mail", 1.0, 0),
            window("", "Mail", "com.apple.mail", 1.0, 0),
            window("Ghost", "Mail", "com.apple.mail", 0.0, 0),
            window("Overlay", "Mail", "com.apple.mail", 1.0, 25),
            window("Dock", "Dock", "com.apple.dock", 1.0, 0),
        ];
        let kept = visible_windows(raw);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "Inbox – Mail");
    }

    #[test]
    fn empty_query_returns_all_visible_windows() {
        let raw = vec![
            window("Inbox – Mail", "Mail", "com.apple.mail", 1.0, 0),
            window("", "Mail", "com.apple.mail", 1.0, 0),
        ];
        let results = search(visible_windows(raw), "");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Inbox – Mail");
    }

    #[test]
    fn fragments_cover_process_title_and_file_name() {
        let w = window("Inbox – Mail", "Mail", "com.apple.mail", 1.0, 0);
        let hits = search(vec![w], "inbox mail");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn han_window_title_matches_latin_query() {
        let w = window("中文文档", "Safari", "com.apple.Safari", 1.0, 0);
        assert_eq!(search(vec![w], "zhong wen").len(), 1);
    }

    #[test]
    fn app_file_stem_strips_extension() {
        assert_eq!(app_file_stem("/Applications/Safari.app"), "Safari");
        assert_eq!(app_file_stem(""), "");
    }
}
