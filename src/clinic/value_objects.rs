use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

/// Longest visit description accepted, counted in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 8192;

/// Value object ensuring a visit description stays within
/// [`MAX_DESCRIPTION_LENGTH`] characters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Description {
    value: String,
}

impl Description {
    /// Validates and constructs a new [`Description`].
    ///
    /// Oversized text is rejected, never truncated.
    pub fn new(value: impl Into<String>) -> Result<Self, DescriptionError> {
        let value = value.into();
        let length = value.chars().count();
        if length > MAX_DESCRIPTION_LENGTH {
            return Err(DescriptionError::TooLong {
                length,
                max: MAX_DESCRIPTION_LENGTH,
            });
        }
        Ok(Self { value })
    }

    /// Returns the underlying text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl Display for Description {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Description {
    type Err = DescriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl TryFrom<String> for Description {
    type Error = DescriptionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Errors produced when validating a [`Description`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DescriptionError {
    #[error("description exceeds maximum length of {max} characters (got {length})")]
    TooLong { length: usize, max: usize },
}

/// Set of pet identifiers used by the batched visit lookup.
///
/// Parsed from the comma separated form used on the wire (`"7,8"`).
/// Duplicates collapse and blank input yields an empty set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PetIds {
    ids: BTreeSet<i32>,
}

impl PetIds {
    #[must_use]
    pub fn new(ids: impl IntoIterator<Item = i32>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, id: i32) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Iterates the identifiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.ids.iter().copied()
    }
}

impl FromStr for PetIds {
    type Err = PetIdsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ids = BTreeSet::new();
        for part in s.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            let id = part.parse::<i32>().map_err(|_| PetIdsError::Invalid {
                value: part.to_string(),
            })?;
            ids.insert(id);
        }
        Ok(Self { ids })
    }
}

impl FromIterator<i32> for PetIds {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Errors produced when parsing [`PetIds`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PetIdsError {
    #[error("invalid pet identifier: {value}")]
    Invalid { value: String },
}
