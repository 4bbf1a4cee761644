//! Depth-first directory walker.

use std::ffi::OsString;
use std::fs::{DirEntry, ReadDir};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use pathwalk_core::{
    DeviceGuard, Direction, EntryKind, MAX_PATH_LEN, Predicate, Verdict, WalkConfig, WalkError,
    WalkWarning,
};

use crate::summary::WalkSummary;

/// What happened to a single root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootOutcome {
    /// The root was traversed (possibly with warnings).
    Walked,
    /// The root was skipped before traversal began.
    Skipped,
}

/// Walks directory trees, writing every pathname the predicate matches to
/// `output`, each followed by the record separator.
///
/// Traversal is single-threaded and recursive. Directory handles are owned
/// by the stack frame that opened them, so they are closed on every exit
/// path. Symlinks are never followed, which keeps the recursion acyclic;
/// its depth is bounded by [`MAX_PATH_LEN`] since every level lengthens
/// the pathname.
pub struct Walker<W: Write> {
    predicate: Predicate,
    direction: Direction,
    separator: u8,
    output: W,
    summary: WalkSummary,
}

/// An entry after evaluation.
struct Examined {
    path: PathBuf,
    kind: EntryKind,
    verdict: Verdict,
}

impl<W: Write> Walker<W> {
    /// Create a downward, newline-separated walker.
    pub fn new(predicate: Predicate, output: W) -> Self {
        Self {
            predicate,
            direction: Direction::Down,
            separator: b'\n',
            output,
            summary: WalkSummary::new(),
        }
    }

    /// Create a walker from parsed options.
    pub fn from_config(config: &WalkConfig, output: W) -> Result<Self, WalkError> {
        let predicate = Predicate::from_config(config)?;
        Ok(Self::new(predicate, output)
            .with_direction(config.direction)
            .with_separator(config.record_separator()))
    }

    /// Set the traversal direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the byte written after each pathname.
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    /// Statistics gathered so far.
    pub fn summary(&self) -> &WalkSummary {
        &self.summary
    }

    /// Consume the walker, returning the output sink and statistics.
    pub fn into_parts(self) -> (W, WalkSummary) {
        (self.output, self.summary)
    }

    /// Walk every root in order, then flush the output.
    ///
    /// A root that cannot be set up is skipped and later roots still run.
    /// Only output failures abort the run.
    pub fn run<P: AsRef<Path>>(&mut self, roots: &[P]) -> Result<&WalkSummary, WalkError> {
        let start = Instant::now();
        for root in roots {
            self.walk_root(root.as_ref())?;
        }
        self.output.flush().map_err(WalkError::Output)?;
        self.summary.elapsed = start.elapsed();

        tracing::debug!(
            matches = self.summary.matches,
            examined = self.summary.entries_examined,
            warnings = self.summary.warning_count(),
            elapsed = ?self.summary.elapsed,
            "walk finished"
        );
        Ok(&self.summary)
    }

    /// Set up the device boundary for `root`, then walk it in the configured
    /// direction.
    pub fn walk_root(&mut self, root: &Path) -> Result<RootOutcome, WalkError> {
        let guard = if self.predicate.no_cross_device {
            match DeviceGuard::for_root(root) {
                Ok(guard) => Some(guard),
                Err(err) => {
                    self.summary
                        .record_warning(WalkWarning::device_lookup(root, &err));
                    self.summary.roots_skipped += 1;
                    return Ok(RootOutcome::Skipped);
                }
            }
        } else {
            None
        };

        self.summary.roots_walked += 1;
        match self.direction {
            Direction::Down => self.walk(root, guard, 0)?,
            Direction::Up => self.walk_up(root, guard, 0)?,
        }
        Ok(RootOutcome::Walked)
    }

    /// Evaluate every entry below `root`, descending into directories that
    /// were not pruned. `depth` is 0 for the contents of a root.
    pub fn walk(
        &mut self,
        root: &Path,
        guard: Option<DeviceGuard>,
        depth: i64,
    ) -> Result<(), WalkError> {
        if self.predicate.exceeds_depth(depth) {
            return Ok(());
        }
        let Some(entries) = self.open_dir(root) else {
            return Ok(());
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    self.summary
                        .record_warning(WalkWarning::read_error(root, &err));
                    break;
                }
            };
            let Some(examined) = self.examine(root, &entry, guard)? else {
                continue;
            };
            if examined.verdict.descends() && examined.kind.is_dir() {
                self.walk(&examined.path, guard, depth + 1)?;
            }
        }
        Ok(())
    }

    /// Evaluate the entries of `start`, then of each of its ancestors up to
    /// and including `/`. Each step up counts as one level of depth.
    ///
    /// `start` is made absolute first (without resolving symlinks) so that
    /// relative starting points still climb to the filesystem root.
    pub fn walk_up(
        &mut self,
        start: &Path,
        guard: Option<DeviceGuard>,
        depth: i64,
    ) -> Result<(), WalkError> {
        let start = match std::path::absolute(start) {
            Ok(path) => path,
            Err(err) => {
                self.summary
                    .record_warning(WalkWarning::read_error(start, &err));
                return Ok(());
            }
        };

        for (level, dir) in (depth..).zip(start.ancestors()) {
            if self.predicate.exceeds_depth(level) {
                break;
            }
            let Some(entries) = self.open_dir(dir) else {
                continue;
            };
            for entry in entries {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        self.summary
                            .record_warning(WalkWarning::read_error(dir, &err));
                        break;
                    }
                };
                self.examine(dir, &entry, guard)?;
            }
        }
        Ok(())
    }

    fn open_dir(&mut self, dir: &Path) -> Option<ReadDir> {
        match std::fs::read_dir(dir) {
            Ok(entries) => {
                tracing::debug!(dir = %dir.display(), "reading directory");
                self.summary.dirs_opened += 1;
                Some(entries)
            }
            Err(err) => {
                self.summary.record_warning(WalkWarning::read_error(dir, &err));
                None
            }
        }
    }

    /// Join, classify and evaluate one entry, printing it on a match.
    ///
    /// Returns `None` when the entry had to be skipped entirely.
    fn examine(
        &mut self,
        dir: &Path,
        entry: &DirEntry,
        guard: Option<DeviceGuard>,
    ) -> Result<Option<Examined>, WalkError> {
        let name: OsString = entry.file_name();
        let path = dir.join(&name);
        if path.as_os_str().len() > MAX_PATH_LEN {
            self.summary.record_warning(WalkWarning::path_too_long(&path));
            return Ok(None);
        }

        // The iterator's type tag; std falls back to lstat when it is unknown.
        let kind = match entry.file_type() {
            Ok(file_type) => EntryKind::from_file_type(file_type),
            Err(err) => {
                self.summary
                    .record_warning(WalkWarning::metadata_error(&path, &err));
                return Ok(None);
            }
        };

        self.summary.entries_examined += 1;
        let verdict = match self.predicate.evaluate(&path, &name, kind, guard.as_ref()) {
            Ok(verdict) => verdict,
            Err(warning) => {
                self.summary.record_warning(warning);
                Verdict::Rejected
            }
        };
        tracing::trace!(path = %path.display(), %kind, ?verdict, "examined");

        if verdict.is_match() {
            self.emit(&path)?;
        }
        Ok(Some(Examined {
            path,
            kind,
            verdict,
        }))
    }

    fn emit(&mut self, path: &Path) -> Result<(), WalkError> {
        self.output
            .write_all(path.as_os_str().as_encoded_bytes())
            .and_then(|()| self.output.write_all(&[self.separator]))
            .map_err(WalkError::Output)?;
        self.summary.matches += 1;
        Ok(())
    }
}
