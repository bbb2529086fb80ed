//! Logging macros gated on a module-level `ENABLE_LOGS` flag.
//!
//! The tick loop and the prediction engine run many times per second; each
//! of those modules declares its own switch so its output can be silenced
//! without touching `RUST_LOG` for the rest of the crate:
//!
//! ```rust,ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_debug, log_info, log_warn};
//!
//! log_info!("selected {}", target);
//! ```

/// `log::debug!` when the calling module's `ENABLE_LOGS` is true.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

/// `log::info!` when the calling module's `ENABLE_LOGS` is true.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// `log::warn!` when the calling module's `ENABLE_LOGS` is true.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Installs `env_logger`. `RUST_LOG` overrides the default filter; calling
/// this more than once is harmless.
pub fn init(default_level: log::LevelFilter) {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(default_level)
        .parse_default_env()
        .try_init();
}
