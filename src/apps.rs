//! Running-application records.
//!
//! The platform edge enumerates regular-activation applications; each one
//! searches on its localized name, its bundle file name, and a transliterated
//! form of the name.

use crate::search::Searchable;
use crate::transliterate::{fold, transliterate};
use crate::windows::app_file_stem;

#[derive(Debug, Clone)]
pub struct RunningApp {
    pub name: String,
    pub bundle_id: String,
    pub path: String,
    search_strings: Vec<String>,
}

impl RunningApp {
    pub fn new(name: String, bundle_id: String, path: String) -> Self {
        let search_strings = vec![
            fold(&name),
            fold(&app_file_stem(&path)),
            fold(&transliterate(&name)),
        ];
        RunningApp {
            name,
            bundle_id,
            path,
            search_strings,
        }
    }
}

impl Searchable for RunningApp {
    fn search_strings(&self) -> &[String] {
        &self.search_strings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::search;

    #[test]
    fn matches_on_name_and_file_stem() {
        let app = RunningApp::new(
            "Visual Studio Code".into(),
            "com.microsoft.VSCode".into(),
            "/Applications/Visual Studio Code.app".into(),
        );
        assert_eq!(search(vec![app.clone()], "studio").len(), 1);
        assert_eq!(search(vec![app], "visual code").len(), 1);
    }

    #[test]
    fn unmatched_app_is_excluded() {
        let app = RunningApp::new(
            "Mail".into(),
            "com.apple.mail".into(),
            "/System/Applications/Mail.app".into(),
        );
        assert!(search(vec![app], "terminal").is_empty());
    }
}
