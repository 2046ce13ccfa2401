use thiserror::Error;
use tracing::{error, warn};

/// Domain errors that reach the top level.
///
/// Almost nothing in this program is allowed to be fatal: icon resolution,
/// snapshot copies, and scripting calls all degrade to "less metadata" at
/// their own boundary. The two exceptions are a broken configuration and the
/// screen-recording permission probe.
#[derive(Error, Debug)]
pub enum WinhopError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(
        "this workflow requires permission for screen recording. \
         Go to System Settings > Privacy & Security > Screen Recording, \
         authorize Alfred and re-launch."
    )]
    ScreenRecordingDenied,
}

/// Extension trait for the degrade-and-log policy.
///
/// Use `log_err()` for recoverable failures and `warn_on_err()` for expected
/// ones (a browser not running, an icon row missing). Both swallow the error
/// after recording it with the caller's location.
pub trait ResultExt<T> {
    fn log_err(self) -> Option<T>;
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?err,
                    file = caller.file(),
                    line = caller.line(),
                    "operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?err,
                    file = caller.file(),
                    line = caller.line(),
                    "operation degraded"
                );
                None
            }
        }
    }
}
