//! Stub collaborators for platforms without a compositor or scripting
//! bridge. Enumerations come back empty and the permission probe passes.

use crate::apps::RunningApp;
use crate::browser::BrowserWindow;
use crate::error::WinhopError;
use crate::windows::WindowInfo;

pub fn check_screen_recording_permission() -> Result<(), WinhopError> {
    Ok(())
}

pub fn list_windows() -> Vec<WindowInfo> {
    Vec::new()
}

pub fn running_apps() -> Vec<RunningApp> {
    Vec::new()
}

/// `None` mirrors "browser not running" on macOS.
pub fn browser_windows(bundle_id: &str) -> Option<Vec<BrowserWindow>> {
    let _ = bundle_id;
    None
}
