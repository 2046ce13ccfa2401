//! Cross-source result aggregation.
//!
//! Sources arrive already searched, in the caller's fixed priority order.
//! Aggregation applies the one intra-source ordering rule (unpinned tabs
//! sort after everything else, stably), maps each shape to its presentation
//! row, and concatenates. No cross-source deduplication: the same logical
//! target from two sources produces two rows. An empty merge still yields
//! one well-formed placeholder row.

use crate::alfred::Item;
use crate::apps::RunningApp;
use crate::browser::TabRecord;
use crate::windows::WindowInfo;

/// One searched source's surviving records.
pub enum SourceResults {
    Windows(Vec<WindowInfo>),
    Tabs(Vec<TabRecord>),
    Apps(Vec<RunningApp>),
}

pub fn aggregate(sources: Vec<SourceResults>) -> Vec<Item> {
    let mut items = Vec::new();
    for source in sources {
        match source {
            SourceResults::Windows(windows) => {
                items.extend(windows.iter().map(Item::from_window));
            }
            SourceResults::Tabs(tabs) => {
                let (kept, unpinned): (Vec<_>, Vec<_>) = tabs
                    .into_iter()
                    .partition(|tab| !tab.location.is_unpinned());
                items.extend(kept.iter().map(Item::from_tab));
                items.extend(unpinned.iter().map(Item::from_tab));
            }
            SourceResults::Apps(apps) => {
                items.extend(apps.iter().map(Item::from_app));
            }
        }
    }
    if items.is_empty() {
        items.push(Item::no_results());
    }
    items
}
