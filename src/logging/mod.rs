//! # Logging
//!
//! Diagnostics go through `tracing` (filtered by `RUST_LOG`, or by `-v`/`-q`
//! when it is unset). The [`verbose_log!`] macro adds the human-readable
//! progress lines shown with `-v`. Both write to stderr; per-file decisions
//! are printed to stdout by [`crate::output`].
//!
//! ```rust
//! use licer::logging::{ColorMode, Verbosity};
//! use licer::verbose_log;
//!
//! Verbosity::from_flags(false, 1).install();
//! ColorMode::Never.apply();
//!
//! verbose_log!("Processing file: {}", "example.rs");
//! ```

mod verbosity;

pub use verbosity::{ColorMode, Verbosity, init_tracing, is_quiet, is_verbose};

/// Prints to stderr when the run is verbose.
///
/// Same format syntax as [`eprintln!`].
#[macro_export]
macro_rules! verbose_log {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}
