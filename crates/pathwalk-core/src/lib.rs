//! Core types for pathwalk.
//!
//! This crate provides the match [`Predicate`], its configuration, the
//! option value parsers and the error types shared by the traversal engine
//! and the `walk` binary.

mod config;
mod device;
mod entry;
mod error;
mod parse;
mod predicate;

pub use config::{Direction, WalkConfig, WalkConfigBuilder, WalkConfigBuilderError};
pub use device::{DeviceGuard, device_of};
pub use entry::{EntryKind, MAX_PATH_LEN, Timestamp, TypeMask};
pub use error::{WalkError, WalkWarning, WarningKind};
pub use parse::{parse_datetime, parse_integer, parse_size};
pub use predicate::{Predicate, Verdict, compile_pattern};
