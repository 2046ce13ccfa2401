//! The Alfred script-filter output contract.
//!
//! Heterogeneous record shapes all map into one `Item` through an exhaustive
//! constructor per shape; the document always contains at least one
//! displayable row, with a "No Results" placeholder standing in for an empty
//! merge.

use serde::Serialize;
use serde_json::{json, Value};

use crate::apps::RunningApp;
use crate::browser::{unsuspend, TabRecord};
use crate::search::Searchable;
use crate::windows::WindowInfo;

#[derive(Debug, Clone, Serialize)]
pub struct Icon {
    pub path: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Icon {
    /// Render the icon of the file at `path` (an application bundle).
    fn file(path: &str) -> Icon {
        Icon {
            path: path.to_string(),
            kind: Some("fileicon".to_string()),
        }
    }

    /// Render the image file at `path` directly.
    fn image(path: &str) -> Icon {
        Icon {
            path: path.to_string(),
            kind: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Text {
    pub copy: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Text>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quicklookurl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
}

impl Item {
    pub fn from_window(window: &WindowInfo) -> Item {
        Item {
            title: window.name.clone(),
            subtitle: Some(window.process_name.clone()),
            arg: Some(String::new()),
            icon: Some(Icon::file(&window.app_path)),
            match_: Some(window.search_strings().join(" ")),
            variables: Some(json!({
                "bundleId": window.bundle_id,
                "windowId": window.window_id,
            })),
            kind: None,
            text: None,
            quicklookurl: None,
            valid: None,
        }
    }

    pub fn from_tab(tab: &TabRecord) -> Item {
        let original_url = unsuspend(&tab.url);
        let icon = match &tab.icon_path {
            Some(path) => Icon::image(&path.to_string_lossy()),
            None => Icon::file(&tab.app_path),
        };
        Item {
            title: format!("{}{}", tab.location.title_prefix(), tab.title),
            subtitle: Some(tab.url.clone()),
            arg: Some(format!("[{}]({})", tab.title, original_url)),
            icon: Some(icon),
            match_: Some(tab.search_strings().join(" ")),
            variables: Some(json!({
                "tabIndex": tab.tab_index,
                "windowIndex": tab.window_index,
                "bundleId": tab.bundle_id,
                "tabId": tab.tab_id,
            })),
            kind: Some("file:skipcheck".to_string()),
            text: Some(Text {
                copy: tab.url.clone(),
            }),
            quicklookurl: Some(tab.url.clone()),
            valid: None,
        }
    }

    pub fn from_app(app: &RunningApp) -> Item {
        Item {
            title: app.name.clone(),
            subtitle: Some(app.path.clone()),
            arg: Some(app.path.clone()),
            icon: Some(Icon::file(&app.path)),
            match_: Some(app.search_strings().join(" ")),
            variables: Some(json!({ "bundleId": app.bundle_id })),
            kind: Some("file".to_string()),
            text: None,
            quicklookurl: None,
            valid: None,
        }
    }

    pub fn no_results() -> Item {
        Item {
            title: "No Results".to_string(),
            subtitle: None,
            arg: None,
            icon: None,
            match_: None,
            variables: None,
            kind: None,
            text: None,
            quicklookurl: None,
            valid: Some(false),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub items: Vec<Item>,
}

impl Document {
    pub fn new(items: Vec<Item>) -> Document {
        Document { items }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| r#"{"items":[]}"#.to_string())
    }
}
