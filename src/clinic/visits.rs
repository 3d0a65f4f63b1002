use chrono::NaiveDate;
use thiserror::Error;

use super::{
    today,
    value_objects::{Description, DescriptionError},
};

/// A recorded visit of a pet to the clinic.
///
/// The pet is referenced by identifier only; visits live apart from the
/// owner/pet records and nothing checks that the pet exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Visit {
    id: Option<i32>,
    date: NaiveDate,
    description: Option<Description>,
    pet_id: i32,
}

impl Default for Visit {
    fn default() -> Self {
        Self {
            id: None,
            date: today(),
            description: None,
            pet_id: 0,
        }
    }
}

impl Visit {
    /// Builds a visit from all of its parts. The date falls back to today.
    ///
    /// Both [`VisitBuilder::build`] and the setters end up here or apply the
    /// same checks, so either construction path yields equal values for equal
    /// inputs.
    pub fn new(
        id: Option<i32>,
        date: Option<NaiveDate>,
        description: Option<String>,
        pet_id: i32,
    ) -> Result<Self, VisitError> {
        Ok(Self {
            id,
            date: date.unwrap_or_else(today),
            description: description.map(Description::new).transpose()?,
            pet_id,
        })
    }

    #[must_use]
    pub fn builder() -> VisitBuilder {
        VisitBuilder::default()
    }

    #[must_use]
    pub fn id(&self) -> Option<i32> {
        self.id
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_ref().map(Description::as_str)
    }

    #[must_use]
    pub fn pet_id(&self) -> i32 {
        self.pet_id
    }

    pub fn set_id(&mut self, id: i32) {
        self.id = Some(id);
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    /// Replaces the description, leaving the visit untouched when the text is
    /// too long.
    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), VisitError> {
        self.description = Some(Description::new(description)?);
        Ok(())
    }

    pub fn set_pet_id(&mut self, pet_id: i32) {
        self.pet_id = pet_id;
    }
}

/// Step-wise construction of a [`Visit`].
///
/// ```
/// use petclinic_records::clinic::Visit;
///
/// let visit = Visit::builder()
///     .id(1)
///     .description("Annual checkup")
///     .pet_id(2)
///     .build()
///     .expect("valid visit");
/// assert_eq!(visit.pet_id(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct VisitBuilder {
    id: Option<i32>,
    date: Option<NaiveDate>,
    description: Option<String>,
    pet_id: i32,
}

impl VisitBuilder {
    #[must_use]
    pub fn id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn pet_id(mut self, pet_id: i32) -> Self {
        self.pet_id = pet_id;
        self
    }

    /// Completes the visit, validating the accumulated description.
    pub fn build(self) -> Result<Visit, VisitError> {
        Visit::new(self.id, self.date, self.description, self.pet_id)
    }
}

/// Rejects pet identifiers that cannot name a stored pet.
pub fn ensure_pet_id(pet_id: i32) -> Result<i32, VisitError> {
    if pet_id > 0 {
        Ok(pet_id)
    } else {
        Err(VisitError::InvalidPetId { pet_id })
    }
}

/// Errors raised while constructing a visit.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum VisitError {
    #[error("description exceeds maximum length of {max} characters")]
    DescriptionTooLong { length: usize, max: usize },
    #[error("pet identifier must be positive, got {pet_id}")]
    InvalidPetId { pet_id: i32 },
}

impl From<DescriptionError> for VisitError {
    fn from(err: DescriptionError) -> Self {
        match err {
            DescriptionError::TooLong { length, max } => Self::DescriptionTooLong { length, max },
        }
    }
}
