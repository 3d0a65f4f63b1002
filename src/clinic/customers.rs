use std::fmt::{self, Display, Formatter};

use chrono::NaiveDate;

use super::today;

/// Kind of animal a pet is, shared reference data.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PetType {
    id: Option<i32>,
    name: String,
}

impl PetType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<i32> {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_id(&mut self, id: i32) {
        self.id = Some(id);
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

/// Back reference from a pet to the owner holding it.
///
/// Pets are owned by their [`Owner`]; the reference only carries the values a
/// pet needs to describe its owner.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct OwnerRef {
    pub id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
}

impl OwnerRef {
    /// Returns `"First Last"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A pet registered with the clinic.
///
/// Equality is structural over id, name, type and owner. Two distinct pets
/// holding the same values compare equal; the birth date does not take part.
#[derive(Clone, Debug)]
pub struct Pet {
    id: Option<i32>,
    name: String,
    birth_date: NaiveDate,
    pet_type: PetType,
    owner: Option<OwnerRef>,
}

impl Pet {
    /// Creates an unsaved pet born today.
    #[must_use]
    pub fn new(name: impl Into<String>, pet_type: PetType) -> Self {
        Self {
            id: None,
            name: name.into(),
            birth_date: today(),
            pet_type,
            owner: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = birth_date;
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<i32> {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    #[must_use]
    pub fn pet_type(&self) -> &PetType {
        &self.pet_type
    }

    /// Returns the owner reference, `None` until the pet is added to an owner.
    #[must_use]
    pub fn owner(&self) -> Option<&OwnerRef> {
        self.owner.as_ref()
    }

    pub fn set_id(&mut self, id: i32) {
        self.id = Some(id);
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_birth_date(&mut self, birth_date: NaiveDate) {
        self.birth_date = birth_date;
    }

    pub fn set_pet_type(&mut self, pet_type: PetType) {
        self.pet_type = pet_type;
    }

    pub fn set_owner(&mut self, owner: OwnerRef) {
        self.owner = Some(owner);
    }
}

impl PartialEq for Pet {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.pet_type == other.pet_type
            && self.owner == other.owner
    }
}

impl Eq for Pet {}

impl Display for Pet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Pet[id={}, name={}", display_id(self.id), self.name)?;
        write!(f, ", birthDate={}, type={}", self.birth_date, self.pet_type.name)?;
        match &self.owner {
            Some(owner) => write!(f, ", owner={}]", owner.full_name()),
            None => f.write_str("]"),
        }
    }
}

/// Clinic customer and aggregate root of their pets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Owner {
    id: Option<i32>,
    first_name: String,
    last_name: String,
    address: String,
    city: String,
    telephone: String,
    pets: Vec<Pet>,
}

impl Owner {
    #[must_use]
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: i32) -> Self {
        self.set_id(id);
        self
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    #[must_use]
    pub fn with_telephone(mut self, telephone: impl Into<String>) -> Self {
        self.telephone = telephone.into();
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<i32> {
        self.id
    }

    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    #[must_use]
    pub fn telephone(&self) -> &str {
        &self.telephone
    }

    /// Returns the pets ordered by name.
    #[must_use]
    pub fn pets(&self) -> Vec<&Pet> {
        let mut pets: Vec<&Pet> = self.pets.iter().collect();
        pets.sort_by(|left, right| left.name.cmp(&right.name));
        pets
    }

    /// Returns the pets in the order they were added.
    #[must_use]
    pub fn pets_internal(&self) -> &[Pet] {
        &self.pets
    }

    /// Returns a reference to this owner suitable for stamping onto pets.
    #[must_use]
    pub fn reference(&self) -> OwnerRef {
        OwnerRef {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }

    /// Takes ownership of a pet and points it back at this owner.
    pub fn add_pet(&mut self, mut pet: Pet) {
        pet.owner = Some(self.reference());
        self.pets.push(pet);
    }

    pub fn set_id(&mut self, id: i32) {
        self.id = Some(id);
        self.refresh_pets();
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = first_name.into();
        self.refresh_pets();
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = last_name.into();
        self.refresh_pets();
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    pub fn set_telephone(&mut self, telephone: impl Into<String>) {
        self.telephone = telephone.into();
    }

    pub(crate) fn pets_mut(&mut self) -> &mut Vec<Pet> {
        &mut self.pets
    }

    fn refresh_pets(&mut self) {
        let reference = self.reference();
        for pet in &mut self.pets {
            pet.owner = Some(reference.clone());
        }
    }
}

impl Display for Owner {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Owner[id={}, lastName={}, firstName={}, address={}, city={}, telephone={}]",
            display_id(self.id),
            self.last_name,
            self.first_name,
            self.address,
            self.city,
            self.telephone
        )
    }
}

fn display_id(id: Option<i32>) -> String {
    id.map_or_else(|| "new".to_string(), |id| id.to_string())
}
