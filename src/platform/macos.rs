//! macOS collaborators: CoreGraphics window enumeration, NSWorkspace
//! application lookups, and ScriptingBridge access to running browsers.
//!
//! The scripting side never calls a remote method blindly: each connection
//! resolves a `TitleApi` capability once (Safari exposes tab/window titles
//! as `name`, every other browser as `title`) and unknown properties fall
//! back to empty values instead of raising.

use std::collections::HashMap;
use std::ffi::CStr;
use std::os::raw::c_char;

use cocoa::base::{id, nil};
use cocoa::foundation::NSString as CocoaNSString;
use core_foundation::base::{CFType, TCFType};
use core_foundation::dictionary::{CFDictionary, CFDictionaryRef};
use core_foundation::number::CFNumber;
use core_foundation::string::CFString;
use core_graphics::geometry::{CGPoint, CGRect, CGSize};
use core_graphics::window as cg_window;
use objc::runtime::{Sel, BOOL, NO, YES};
use objc::{class, msg_send, sel, sel_impl};
use tracing::debug;

use crate::apps::RunningApp;
use crate::browser::{BrowserWindow, TabLocation, TabRecord};
use crate::error::WinhopError;
use crate::windows::{WindowBounds, WindowInfo};

#[link(name = "ScriptingBridge", kind = "framework")]
extern "C" {}

/// NSApplicationActivationPolicyRegular: ordinary apps with a Dock icon.
const ACTIVATION_POLICY_REGULAR: i64 = 0;

// ---------------------------------------------------------------------------
// Window enumeration
// ---------------------------------------------------------------------------

/// All on-screen, non-desktop windows in front-to-back order, unfiltered.
/// Visibility and exclusion rules are applied by `windows::visible_windows`.
pub fn list_windows() -> Vec<WindowInfo> {
    let options =
        cg_window::kCGWindowListOptionOnScreenOnly | cg_window::kCGWindowListExcludeDesktopElements;
    let Some(list) = cg_window::copy_window_info(options, cg_window::kCGNullWindowID) else {
        return Vec::new();
    };

    let apps = AppDirectory::snapshot();
    let mut path_cache: HashMap<String, String> = HashMap::new();
    let mut windows = Vec::new();

    for item in list.iter() {
        let dict =
            unsafe { CFDictionary::<CFString, CFType>::wrap_under_get_rule(*item as CFDictionaryRef) };

        let name = dict_string(&dict, "kCGWindowName").unwrap_or_default();
        let process_name = dict_string(&dict, "kCGWindowOwnerName").unwrap_or_default();
        let pid = dict_i64(&dict, "kCGWindowOwnerPID").unwrap_or(-1);
        let window_id = dict_i64(&dict, "kCGWindowNumber").unwrap_or(0) as u32;
        let alpha = dict_f64(&dict, "kCGWindowAlpha").unwrap_or(0.0);
        let layer = dict_i64(&dict, "kCGWindowLayer").unwrap_or(-1);
        let bounds = dict_bounds(&dict).unwrap_or(WindowBounds::ZERO);

        let bundle_id = apps.bundle_id(pid);
        let app_path = path_cache
            .entry(bundle_id.clone())
            .or_insert_with(|| app_path_for_bundle(&bundle_id))
            .clone();

        windows.push(WindowInfo::new(
            name,
            process_name,
            pid,
            window_id,
            bundle_id,
            app_path,
            bounds,
            alpha,
            layer,
        ));
    }
    debug!(count = windows.len(), "enumerated on-screen windows");
    windows
}

/// Probe the screen-recording capability before doing any real work.
///
/// Window names are only readable with the permission, so a first window
/// that already carries a name proves the capability. A nameless first
/// window is ambiguous; imaging it resolves the question, since the image
/// call returns null exactly when the permission is denied.
pub fn check_screen_recording_permission() -> Result<(), WinhopError> {
    let Some((window_id, has_name)) = first_onscreen_window() else {
        return Ok(());
    };
    if has_name {
        return Ok(());
    }

    let null_rect = CGRect::new(
        &CGPoint::new(f64::INFINITY, f64::INFINITY),
        &CGSize::new(0.0, 0.0),
    );
    let image = cg_window::create_image(
        null_rect,
        cg_window::kCGWindowListOptionIncludingWindow,
        window_id,
        cg_window::kCGWindowImageBoundsIgnoreFraming | cg_window::kCGWindowImageBestResolution,
    );
    if image.is_none() {
        return Err(WinhopError::ScreenRecordingDenied);
    }
    Ok(())
}

fn first_onscreen_window() -> Option<(u32, bool)> {
    let options =
        cg_window::kCGWindowListOptionOnScreenOnly | cg_window::kCGWindowListExcludeDesktopElements;
    let list = cg_window::copy_window_info(options, cg_window::kCGNullWindowID)?;
    let first = list.iter().next()?;
    let dict =
        unsafe { CFDictionary::<CFString, CFType>::wrap_under_get_rule(*first as CFDictionaryRef) };
    let window_id = dict_i64(&dict, "kCGWindowNumber")? as u32;
    let has_name = dict.find(CFString::new("kCGWindowName")).is_some();
    Some((window_id, has_name))
}

fn dict_string(dict: &CFDictionary<CFString, CFType>, key: &str) -> Option<String> {
    let value = dict.find(CFString::new(key))?;
    value.downcast::<CFString>().map(|s| s.to_string())
}

fn dict_i64(dict: &CFDictionary<CFString, CFType>, key: &str) -> Option<i64> {
    let value = dict.find(CFString::new(key))?;
    value.downcast::<CFNumber>().and_then(|n| n.to_i64())
}

fn dict_f64(dict: &CFDictionary<CFString, CFType>, key: &str) -> Option<f64> {
    let value = dict.find(CFString::new(key))?;
    value.downcast::<CFNumber>().and_then(|n| n.to_f64())
}

fn dict_bounds(dict: &CFDictionary<CFString, CFType>) -> Option<WindowBounds> {
    let value = dict.find(CFString::new("kCGWindowBounds"))?;
    let bounds = unsafe {
        CFDictionary::<CFString, CFType>::wrap_under_get_rule(
            value.as_CFTypeRef() as CFDictionaryRef
        )
    };
    Some(WindowBounds {
        x: dict_f64(&bounds, "X")?,
        y: dict_f64(&bounds, "Y")?,
        width: dict_f64(&bounds, "Width")?,
        height: dict_f64(&bounds, "Height")?,
    })
}

// ---------------------------------------------------------------------------
// Running applications
// ---------------------------------------------------------------------------

/// Regular-activation running applications in workspace order.
pub fn running_apps() -> Vec<RunningApp> {
    let mut result = Vec::new();
    unsafe {
        let workspace: id = msg_send![class!(NSWorkspace), sharedWorkspace];
        let apps: id = msg_send![workspace, runningApplications];
        if apps == nil {
            return result;
        }
        let count: usize = msg_send![apps, count];
        for i in 0..count {
            let app: id = msg_send![apps, objectAtIndex: i];
            let policy: i64 = msg_send![app, activationPolicy];
            if policy != ACTIVATION_POLICY_REGULAR {
                continue;
            }
            let name: id = msg_send![app, localizedName];
            let bundle: id = msg_send![app, bundleIdentifier];
            let url: id = msg_send![app, bundleURL];
            let path = if url == nil {
                String::new()
            } else {
                let path_ns: id = msg_send![url, path];
                ns_string_to_rust(path_ns)
            };
            result.push(RunningApp::new(
                ns_string_to_rust(name),
                ns_string_to_rust(bundle),
                path,
            ));
        }
    }
    result
}

/// pid → bundle id directory, snapshotted once per enumeration pass.
struct AppDirectory {
    by_pid: HashMap<i64, String>,
}

impl AppDirectory {
    fn snapshot() -> AppDirectory {
        let mut by_pid = HashMap::new();
        unsafe {
            let workspace: id = msg_send![class!(NSWorkspace), sharedWorkspace];
            let apps: id = msg_send![workspace, runningApplications];
            if apps != nil {
                let count: usize = msg_send![apps, count];
                for i in 0..count {
                    let app: id = msg_send![apps, objectAtIndex: i];
                    let pid: i32 = msg_send![app, processIdentifier];
                    let bundle: id = msg_send![app, bundleIdentifier];
                    by_pid.insert(pid as i64, ns_string_to_rust(bundle));
                }
            }
        }
        AppDirectory { by_pid }
    }

    fn bundle_id(&self, pid: i64) -> String {
        self.by_pid.get(&pid).cloned().unwrap_or_default()
    }
}

fn app_path_for_bundle(bundle_id: &str) -> String {
    if bundle_id.is_empty() {
        return String::new();
    }
    unsafe {
        let workspace: id = msg_send![class!(NSWorkspace), sharedWorkspace];
        let ns = CocoaNSString::alloc(nil).init_str(bundle_id);
        let url: id = msg_send![workspace, URLForApplicationWithBundleIdentifier: ns];
        if url == nil {
            return String::new();
        }
        let path: id = msg_send![url, path];
        ns_string_to_rust(path)
    }
}

// ---------------------------------------------------------------------------
// Scripted browser access
// ---------------------------------------------------------------------------

/// Which property a scripted application family uses for titles. Resolved
/// once per connection, separately for windows and tabs.
#[derive(Debug, Clone, Copy)]
enum TitleApi {
    Name,
    Title,
}

impl TitleApi {
    fn detect(probe: id) -> TitleApi {
        if responds_to(probe, "name") {
            TitleApi::Name
        } else {
            TitleApi::Title
        }
    }

    fn read(self, obj: id) -> String {
        match self {
            TitleApi::Name => string_property(obj, "name"),
            TitleApi::Title => string_property(obj, "title"),
        }
    }
}

/// Scripted windows (with tabs) of a running browser, in reported order.
/// `None` when the browser is not running or not scriptable.
pub fn browser_windows(bundle_id: &str) -> Option<Vec<BrowserWindow>> {
    let process_name = running_app_name(bundle_id)?;
    let app_path = app_path_for_bundle(bundle_id);
    if app_path.is_empty() {
        return None;
    }

    unsafe {
        let ns = CocoaNSString::alloc(nil).init_str(bundle_id);
        let app: id = msg_send![class!(SBApplication), applicationWithBundleIdentifier: ns];
        if app == nil {
            return None;
        }

        let windows_arr = object_property(app, "windows");
        if windows_arr == nil {
            return Some(Vec::new());
        }
        let window_count: usize = msg_send![windows_arr, count];

        let mut window_api: Option<TitleApi> = None;
        let mut tab_api: Option<TitleApi> = None;
        let mut result = Vec::with_capacity(window_count);

        for window_index in 0..window_count {
            let window: id = msg_send![windows_arr, objectAtIndex: window_index];
            let api = *window_api.get_or_insert_with(|| TitleApi::detect(window));
            let title = api.read(window);

            let tabs_arr = object_property(window, "tabs");
            let tab_count: usize = if tabs_arr == nil {
                0
            } else {
                msg_send![tabs_arr, count]
            };

            let mut tabs = Vec::with_capacity(tab_count);
            for tab_index in 0..tab_count {
                let tab: id = msg_send![tabs_arr, objectAtIndex: tab_index];
                let api = *tab_api.get_or_insert_with(|| TitleApi::detect(tab));
                tabs.push(TabRecord::new(
                    string_property(tab, "URL"),
                    api.read(tab),
                    tab_index as i64,
                    window_index as i64,
                    string_property(tab, "id"),
                    TabLocation::parse(&string_property(tab, "location")),
                    bundle_id.to_string(),
                    process_name.clone(),
                    app_path.clone(),
                ));
            }
            result.push(BrowserWindow { title, tabs });
        }
        debug!(bundle_id, windows = result.len(), "scripted browser windows");
        Some(result)
    }
}

/// Localized name of a running application, `None` if it is not running.
fn running_app_name(bundle_id: &str) -> Option<String> {
    unsafe {
        let workspace: id = msg_send![class!(NSWorkspace), sharedWorkspace];
        let apps: id = msg_send![workspace, runningApplications];
        if apps == nil {
            return None;
        }
        let count: usize = msg_send![apps, count];
        for i in 0..count {
            let app: id = msg_send![apps, objectAtIndex: i];
            let bundle: id = msg_send![app, bundleIdentifier];
            if ns_string_to_rust(bundle) == bundle_id {
                let name: id = msg_send![app, localizedName];
                let name = ns_string_to_rust(name);
                return (!name.is_empty()).then_some(name);
            }
        }
    }
    None
}

fn responds_to(obj: id, selector: &str) -> bool {
    if obj == nil {
        return false;
    }
    let sel = Sel::register(selector);
    let responds: BOOL = unsafe { msg_send![obj, respondsToSelector: sel] };
    responds == YES
}

/// Read an object-valued property by selector name, `nil` when absent.
fn object_property(obj: id, selector: &str) -> id {
    if !responds_to(obj, selector) {
        return nil;
    }
    let sel = Sel::register(selector);
    unsafe { msg_send![obj, performSelector: sel] }
}

/// Read a string-valued property by selector name; numbers are rendered
/// through `stringValue`, anything else becomes the empty string.
fn string_property(obj: id, selector: &str) -> String {
    let value = object_property(obj, selector);
    if value == nil {
        return String::new();
    }
    unsafe {
        let is_string: BOOL = msg_send![value, isKindOfClass: class!(NSString)];
        if is_string != NO {
            return ns_string_to_rust(value);
        }
        let is_number: BOOL = msg_send![value, isKindOfClass: class!(NSNumber)];
        if is_number != NO {
            let rendered: id = msg_send![value, stringValue];
            return ns_string_to_rust(rendered);
        }
    }
    String::new()
}

unsafe fn ns_string_to_rust(ns: id) -> String {
    if ns == nil {
        return String::new();
    }
    let utf8: *const c_char = msg_send![ns, UTF8String];
    if utf8.is_null() {
        return String::new();
    }
    CStr::from_ptr(utf8).to_string_lossy().into_owned()
}
