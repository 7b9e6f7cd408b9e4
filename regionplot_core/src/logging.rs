// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logging support.
//!
//! With the `tracing` feature the crate-root `trace!`/`debug!`/`warn!` macros forward to
//! `tracing`. Without it they expand to nothing, so call sites never need their own `cfg`.

#[cfg(feature = "tracing")]
pub use tracing as __tracing;

#[cfg(feature = "tracing")]
mod forward {
    /// Emits a `tracing` event at TRACE level.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {
            $crate::logging::__tracing::trace!($($arg)*)
        };
    }

    /// Emits a `tracing` event at DEBUG level.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {
            $crate::logging::__tracing::debug!($($arg)*)
        };
    }

    /// Emits a `tracing` event at WARN level.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {
            $crate::logging::__tracing::warn!($($arg)*)
        };
    }
}

#[cfg(not(feature = "tracing"))]
mod noop {
    /// No-op trace macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op debug macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op warn macro when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}
