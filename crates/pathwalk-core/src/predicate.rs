//! Match criteria and per-entry evaluation.

use std::ffi::OsStr;
use std::fs::Metadata;
use std::path::Path;

use regex::bytes::{Regex, RegexBuilder};

use crate::config::WalkConfig;
use crate::device::{DeviceGuard, device_of};
use crate::entry::{EntryKind, Timestamp, TypeMask};
use crate::error::{WalkError, WalkWarning};
use crate::parse::{parse_datetime, parse_integer, parse_size};

/// Outcome of evaluating one directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every enabled filter passed; the pathname is printed.
    Matched,
    /// Some filter failed. Nothing is printed, but a directory is still
    /// descended into.
    Rejected,
    /// Neither printed nor descended into: an excluded dot-file, or an entry
    /// across the device boundary.
    Pruned,
}

impl Verdict {
    /// Check if the entry should be printed.
    pub fn is_match(self) -> bool {
        matches!(self, Self::Matched)
    }

    /// Check if recursion into the entry may proceed.
    pub fn descends(self) -> bool {
        !matches!(self, Self::Pruned)
    }
}

/// Conjunction of optional filters. A `None` field is unconstrained.
///
/// Built once from a [`WalkConfig`] and never changed afterwards; the
/// per-root device id lives in a separate [`DeviceGuard`].
#[derive(Debug, Clone, Default)]
pub struct Predicate {
    /// Include dot-files.
    pub walk_all: bool,
    /// Case-insensitive pattern matched against the full pathname.
    pub pattern: Option<Regex>,
    /// Exclusive lower bound on modification time.
    pub after: Option<Timestamp>,
    /// Exclusive upper bound on modification time.
    pub before: Option<Timestamp>,
    /// Deepest level visited below each root (root contents are depth 0).
    pub max_depth: Option<i64>,
    /// Exclusive lower bound on size in bytes.
    pub larger_than: Option<i64>,
    /// Exclusive upper bound on size in bytes.
    pub smaller_than: Option<i64>,
    /// Accepted entry kinds.
    pub types: Option<TypeMask>,
    /// Stop at device boundaries.
    pub no_cross_device: bool,
}

impl Predicate {
    /// Parse every option of `config` into a predicate.
    ///
    /// Any unparsable value is a configuration error; nothing is silently
    /// dropped.
    pub fn from_config(config: &WalkConfig) -> Result<Self, WalkError> {
        let predicate = Self {
            walk_all: config.walk_hidden,
            pattern: config.pattern.as_deref().map(compile_pattern).transpose()?,
            after: config.after.as_deref().map(parse_datetime).transpose()?,
            before: config.before.as_deref().map(parse_datetime).transpose()?,
            max_depth: config.max_depth.as_deref().map(parse_integer).transpose()?,
            larger_than: config.larger_than.as_deref().map(parse_size).transpose()?,
            smaller_than: config.smaller_than.as_deref().map(parse_size).transpose()?,
            types: config.types.as_deref().map(TypeMask::from_letters),
            no_cross_device: config.no_cross_device,
        };
        tracing::debug!(?predicate, "built predicate");
        Ok(predicate)
    }

    /// Check if a directory at `depth` lies beyond the depth limit.
    pub fn exceeds_depth(&self, depth: i64) -> bool {
        self.max_depth.is_some_and(|max| depth > max)
    }

    /// Whether evaluation has to look up entry metadata.
    pub fn needs_metadata(&self) -> bool {
        self.after.is_some()
            || self.before.is_some()
            || self.larger_than.is_some()
            || self.smaller_than.is_some()
            || self.no_cross_device
    }

    /// Evaluate one entry.
    ///
    /// Checks run cheapest first: dot-file policy, type tag, pathname
    /// pattern, then a single `lstat` shared by the device, time and size
    /// filters. A failed `lstat` is returned as a warning; callers treat the
    /// entry as [`Verdict::Rejected`].
    pub fn evaluate(
        &self,
        path: &Path,
        name: &OsStr,
        kind: EntryKind,
        guard: Option<&DeviceGuard>,
    ) -> Result<Verdict, WalkWarning> {
        if !self.walk_all && is_hidden(name) {
            return Ok(Verdict::Pruned);
        }

        if let Some(mask) = self.types {
            if !mask.admits(kind) {
                return Ok(Verdict::Rejected);
            }
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(path.as_os_str().as_encoded_bytes()) {
                return Ok(Verdict::Rejected);
            }
        }

        if self.needs_metadata() {
            let metadata =
                std::fs::symlink_metadata(path).map_err(|e| WalkWarning::metadata_error(path, &e))?;
            return Ok(self.check_metadata(&metadata, guard));
        }

        Ok(Verdict::Matched)
    }

    fn check_metadata(&self, metadata: &Metadata, guard: Option<&DeviceGuard>) -> Verdict {
        if self.no_cross_device {
            if let Some(guard) = guard {
                if !guard.admits(device_of(metadata)) {
                    return Verdict::Pruned;
                }
            }
        }

        let modified = modified_secs(metadata);
        if self.after.is_some_and(|after| modified <= after)
            || self.before.is_some_and(|before| modified >= before)
        {
            return Verdict::Rejected;
        }

        let size = i64::try_from(metadata.len()).unwrap_or(i64::MAX);
        if self.larger_than.is_some_and(|larger| size <= larger)
            || self.smaller_than.is_some_and(|smaller| size >= smaller)
        {
            return Verdict::Rejected;
        }

        Verdict::Matched
    }
}

/// Compile a case-insensitive pathname pattern.
pub fn compile_pattern(pattern: &str) -> Result<Regex, WalkError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| WalkError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn is_hidden(name: &OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&b'.')
}

/// Modification time in whole seconds since the epoch.
#[cfg(unix)]
fn modified_secs(metadata: &Metadata) -> Timestamp {
    use std::os::unix::fs::MetadataExt;
    metadata.mtime()
}

#[cfg(not(unix))]
fn modified_secs(metadata: &Metadata) -> Timestamp {
    use std::time::UNIX_EPOCH;
    match metadata.modified() {
        Ok(time) => match time.duration_since(UNIX_EPOCH) {
            Ok(after) => after.as_secs() as Timestamp,
            Err(before) => -(before.duration().as_secs() as Timestamp),
        },
        Err(_) => 0,
    }
}
