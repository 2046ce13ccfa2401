//! External collaborators: OS window/application enumeration and scripted
//! browser access. Everything here blocks the caller and is consumed through
//! three plain functions plus the permission probe; other platforms get
//! empty enumerations so the engine stays testable anywhere.

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "macos")]
pub use macos::{browser_windows, check_screen_recording_permission, list_windows, running_apps};

#[cfg(not(target_os = "macos"))]
mod fallback;
#[cfg(not(target_os = "macos"))]
pub use fallback::{browser_windows, check_screen_recording_permission, list_windows, running_apps};
