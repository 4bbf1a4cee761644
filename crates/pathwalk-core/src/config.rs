//! Walk configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::WalkError;

/// Which way a walk travels from each root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Visit descendants of each root.
    #[default]
    Down,
    /// Visit the contents of each root and then of every ancestor up to `/`.
    Up,
}

/// Options for a walk, as given on the command line.
///
/// Values are kept in their textual form; [`crate::Predicate::from_config`]
/// parses and validates them.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct WalkConfig {
    /// Starting pathnames. Empty means the current directory.
    #[builder(default)]
    #[serde(default)]
    pub roots: Vec<PathBuf>,

    /// Traversal direction.
    #[builder(default)]
    #[serde(default)]
    pub direction: Direction,

    /// Include dot-files in traversal and matching.
    #[builder(default = "false")]
    #[serde(default)]
    pub walk_hidden: bool,

    /// Match entries modified strictly after this date-time.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub after: Option<String>,

    /// Match entries modified strictly before this date-time.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub before: Option<String>,

    /// Maximum depth below each root (None = unlimited).
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub max_depth: Option<String>,

    /// Case-insensitive regular expression matched against full pathnames.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub pattern: Option<String>,

    /// Match entries strictly larger than this many bytes.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub larger_than: Option<String>,

    /// Match entries strictly smaller than this many bytes.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub smaller_than: Option<String>,

    /// Entry type letters: `f`ile, `d`irectory, `s`ymlink.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub types: Option<String>,

    /// Do not descend into entries on another device than the root.
    #[builder(default = "false")]
    #[serde(default)]
    pub no_cross_device: bool,

    /// Terminate output records with NUL instead of newline.
    #[builder(default = "false")]
    #[serde(default)]
    pub nul_terminate: bool,
}

impl From<WalkConfigBuilderError> for WalkError {
    fn from(err: WalkConfigBuilderError) -> Self {
        Self::InvalidConfig {
            message: err.to_string(),
        }
    }
}

impl WalkConfig {
    /// Create a new walk config builder.
    pub fn builder() -> WalkConfigBuilder {
        WalkConfigBuilder::default()
    }

    /// Create an unconstrained downward walk over `roots`.
    pub fn new(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            direction: Direction::Down,
            walk_hidden: false,
            after: None,
            before: None,
            max_depth: None,
            pattern: None,
            larger_than: None,
            smaller_than: None,
            types: None,
            no_cross_device: false,
            nul_terminate: false,
        }
    }

    /// Byte written after every matched pathname.
    pub fn record_separator(&self) -> u8 {
        if self.nul_terminate { b'\0' } else { b'\n' }
    }

    /// Roots to walk, substituting the implicit root when none were given.
    ///
    /// A downward walk defaults to `.`; an upward walk defaults to the
    /// absolute current directory so that it has ancestors to climb.
    pub fn effective_roots(&self) -> Result<Vec<PathBuf>, WalkError> {
        if !self.roots.is_empty() {
            return Ok(self.roots.clone());
        }
        match self.direction {
            Direction::Down => Ok(vec![PathBuf::from(".")]),
            Direction::Up => std::env::current_dir()
                .map(|cwd| vec![cwd])
                .map_err(|e| WalkError::io(".", e)),
        }
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self::new(Vec::<PathBuf>::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = WalkConfig::builder()
            .roots(vec![PathBuf::from("/srv")])
            .walk_hidden(true)
            .pattern("\\.rs$")
            .max_depth("2")
            .build()
            .unwrap();

        assert_eq!(config.roots, vec![PathBuf::from("/srv")]);
        assert!(config.walk_hidden);
        assert_eq!(config.pattern.as_deref(), Some("\\.rs$"));
        assert_eq!(config.max_depth.as_deref(), Some("2"));
        assert_eq!(config.direction, Direction::Down);
        assert!(config.after.is_none());
    }

    #[test]
    fn test_config_keeps_empty_root() {
        // An empty root fails at walk time like any unreadable directory.
        let config = WalkConfig::builder()
            .roots(vec![PathBuf::from(""), PathBuf::from("src")])
            .build()
            .unwrap();
        assert_eq!(config.effective_roots().unwrap().len(), 2);
    }

    #[test]
    fn test_builder_error_is_usage() {
        let err = WalkError::from(WalkConfigBuilderError::UninitializedField("roots"));
        assert!(matches!(err, WalkError::InvalidConfig { .. }));
        assert!(err.is_usage());
    }

    #[test]
    fn test_record_separator() {
        let mut config = WalkConfig::default();
        assert_eq!(config.record_separator(), b'\n');
        config.nul_terminate = true;
        assert_eq!(config.record_separator(), b'\0');
    }

    #[test]
    fn test_effective_roots() {
        let config = WalkConfig::default();
        assert_eq!(config.effective_roots().unwrap(), vec![PathBuf::from(".")]);

        let config = WalkConfig::builder().direction(Direction::Up).build().unwrap();
        let roots = config.effective_roots().unwrap();
        assert_eq!(roots.len(), 1);
        assert!(roots[0].is_absolute());

        let config = WalkConfig::new(["a", "b"]);
        assert_eq!(
            config.effective_roots().unwrap(),
            vec![PathBuf::from("a"), PathBuf::from("b")]
        );
    }
}
