//! Directory traversal engine for pathwalk.
//!
//! This crate walks directory trees depth-first, evaluates each entry
//! against a [`Predicate`] and writes matching pathnames to any
//! [`std::io::Write`] sink.
//!
//! # Overview
//!
//! - **Downward walks** visit every descendant of a root, up to an optional
//!   depth limit.
//! - **Upward walks** list the contents of a starting directory and then of
//!   each ancestor, stopping at `/`.
//! - **Device boundaries** can be enforced per root so a walk never crosses
//!   into another mounted filesystem.
//!
//! Non-fatal problems (unreadable directories, failed `lstat`s, overlong
//! pathnames) are logged through `tracing` and collected in the
//! [`WalkSummary`]; they never stop the walk.
//!
//! # Example
//!
//! ```rust,no_run
//! use pathwalk_scan::{Walker, WalkConfig};
//!
//! let config = WalkConfig::builder()
//!     .roots(vec!["/var/log".into()])
//!     .pattern("\\.log$")
//!     .larger_than("1M")
//!     .build()
//!     .unwrap();
//!
//! let stdout = std::io::stdout();
//! let mut walker = Walker::from_config(&config, stdout.lock()).unwrap();
//! let summary = walker.run(&config.roots).unwrap();
//! eprintln!("{} matches", summary.matches);
//! ```

mod summary;
mod walker;

pub use summary::{MAX_STORED_WARNINGS, WalkSummary};
pub use walker::{RootOutcome, Walker};

// Re-export core types for convenience
pub use pathwalk_core::{
    DeviceGuard, Direction, EntryKind, Predicate, TypeMask, Verdict, WalkConfig, WalkError,
    WalkWarning, WarningKind,
};
