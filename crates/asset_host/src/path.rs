//! Virtual hierarchical paths layered over flat, prefix-addressed object keys.
//!
//! A [`VirtualPath`] is a `/`-joined list of non-empty segments. The first segment is the
//! namespace root (for example `multimedia`), so a single-segment path is always the root.
//! Directories do not exist in the store; they are inferred from shared key prefixes.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator used between virtual path segments and object-key prefixes.
pub const PATH_SEPARATOR: char = '/';

const BACKSLASH: char = '\\';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Validation failures for user-supplied names and raw paths.
pub enum NameError {
    /// The name contains a path separator or is a relative segment (`.`/`..`).
    #[error("invalid name {name:?}: names cannot contain `/`, `\\` or be `.`/`..`")]
    Invalid {
        /// Offending name as supplied.
        name: String,
    },
    /// The name is empty after trimming surrounding whitespace.
    #[error("name cannot be empty")]
    Empty,
}

/// Trims a raw user-supplied folder or file name and validates it as a single path segment.
///
/// # Errors
///
/// Returns [`NameError::Empty`] when nothing remains after trimming and [`NameError::Invalid`]
/// when the name contains a separator or is `.`/`..`.
pub fn sanitize_name(raw: &str) -> Result<String, NameError> {
    let trimmed = raw.trim();
    validate_segment(trimmed)?;
    Ok(trimmed.to_string())
}

fn validate_segment(segment: &str) -> Result<(), NameError> {
    if segment.is_empty() {
        return Err(NameError::Empty);
    }
    if segment.contains([PATH_SEPARATOR, BACKSLASH]) || segment == "." || segment == ".." {
        return Err(NameError::Invalid {
            name: segment.to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
/// Rooted virtual directory or file path. Never empty and never ends in a separator.
pub struct VirtualPath(String);

impl VirtualPath {
    /// Builds the namespace root path from a single segment such as `multimedia`.
    ///
    /// # Errors
    ///
    /// Returns a [`NameError`] when `name` is not a valid single segment.
    pub fn root(name: &str) -> Result<Self, NameError> {
        Ok(Self(sanitize_name(name)?))
    }

    /// Parses a full path as returned by the object store.
    ///
    /// A single trailing separator is tolerated because stores report common prefixes as
    /// `parent/child/`.
    ///
    /// # Errors
    ///
    /// Returns a [`NameError`] when the path is empty or contains an empty or invalid segment.
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_suffix(PATH_SEPARATOR).unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }
        for segment in trimmed.split(PATH_SEPARATOR) {
            validate_segment(segment).map_err(|err| match err {
                NameError::Empty => NameError::Invalid {
                    name: raw.to_string(),
                },
                other => other,
            })?;
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Wraps a key exactly as the object store reported it.
    ///
    /// Store keys may have been written by other tools, so nothing is trimmed and segments are
    /// not checked against the naming rules. Returns `None` for an empty key or one with an
    /// empty segment, which no virtual path can represent.
    pub fn from_store_key(key: &str) -> Option<Self> {
        if key.is_empty() || key.split(PATH_SEPARATOR).any(str::is_empty) {
            return None;
        }
        Some(Self(key.to_string()))
    }

    /// Appends one already-sanitized segment.
    ///
    /// # Errors
    ///
    /// Returns [`NameError::Invalid`] when `name` contains `/` or `\` and [`NameError::Empty`]
    /// when it is empty.
    pub fn join(&self, name: &str) -> Result<Self, NameError> {
        validate_segment(name)?;
        Ok(Self(format!("{}{PATH_SEPARATOR}{name}", self.0)))
    }

    /// Returns the parent directory. The root is its own parent.
    pub fn parent(&self) -> Self {
        match self.0.rfind(PATH_SEPARATOR) {
            Some(idx) => Self(self.0[..idx].to_string()),
            None => self.clone(),
        }
    }

    /// Returns `true` for the namespace root.
    pub fn is_root(&self) -> bool {
        !self.0.contains(PATH_SEPARATOR)
    }

    /// Last segment of the path.
    pub fn name(&self) -> &str {
        self.0
            .rsplit(PATH_SEPARATOR)
            .next()
            .unwrap_or(self.0.as_str())
    }

    /// Root segment of the path.
    pub fn root_name(&self) -> &str {
        self.0.split(PATH_SEPARATOR).next().unwrap_or(self.0.as_str())
    }

    /// Iterates the path segments from the root down.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(PATH_SEPARATOR)
    }

    /// Returns every ancestor from the root down to and including `self` (breadcrumb order).
    pub fn ancestors(&self) -> Vec<VirtualPath> {
        let mut out = Vec::new();
        let mut acc = String::new();
        for segment in self.segments() {
            if !acc.is_empty() {
                acc.push(PATH_SEPARATOR);
            }
            acc.push_str(segment);
            out.push(Self(acc.clone()));
        }
        out
    }

    /// Returns `true` when `self` equals `ancestor` or lives somewhere below it.
    pub fn is_within(&self, ancestor: &VirtualPath) -> bool {
        self.0 == ancestor.0
            || self
                .0
                .strip_prefix(ancestor.0.as_str())
                .is_some_and(|rest| rest.starts_with(PATH_SEPARATOR))
    }

    /// Borrowed string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VirtualPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for VirtualPath {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match Self::from_store_key(&value) {
            Some(path) => Ok(path),
            None if value.is_empty() => Err(NameError::Empty),
            None => Err(NameError::Invalid { name: value }),
        }
    }
}

impl From<VirtualPath> for String {
    fn from(value: VirtualPath) -> Self {
        value.0
    }
}
