//! Status macros used across the workspace.
//!
//! They forward to [`tracing`] and only differ by target and level, so the
//! terminal formatter can pick a symbol and colour for each kind of message.

/// Target of events emitted by [`success!`](crate::success).
pub const SUCCESS_TARGET: &str = "netsweep::success";

/// Target of raw terminal output, printed without any decoration.
pub const PRINT_TARGET: &str = "netsweep::print";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: $crate::log::SUCCESS_TARGET, $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::tracing::error!($($arg)*)
    };
}
