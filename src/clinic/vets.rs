/// Medical specialty a vet can hold, shared reference data.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Specialty {
    id: Option<i32>,
    name: String,
}

impl Specialty {
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

    /// Returns the identifier, `None` until the specialty is saved.
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

/// Veterinarian and the specialties they hold.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vet {
    id: Option<i32>,
    first_name: String,
    last_name: String,
    specialties: Vec<Specialty>,
}

impl Vet {
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
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_specialty(mut self, specialty: Specialty) -> Self {
        self.add_specialty(specialty);
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

    pub fn set_id(&mut self, id: i32) {
        self.id = Some(id);
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = first_name.into();
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = last_name.into();
    }

    /// Appends a specialty to the membership. Every call counts, duplicates
    /// included.
    pub fn add_specialty(&mut self, specialty: Specialty) {
        self.specialties.push(specialty);
    }

    /// Returns a fresh copy of the specialties sorted by name.
    ///
    /// The sort is case sensitive and compares names only.
    #[must_use]
    pub fn specialties(&self) -> Vec<Specialty> {
        let mut sorted = self.specialties.clone();
        sorted.sort_by(|left, right| left.name.cmp(&right.name));
        sorted
    }

    /// Returns the membership in insertion order.
    #[must_use]
    pub fn specialties_internal(&self) -> &[Specialty] {
        &self.specialties
    }

    #[must_use]
    pub fn nr_of_specialties(&self) -> usize {
        self.specialties.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{Specialty, Vet};

    fn specialty(name: &str) -> Specialty {
        Specialty::new(name)
    }

    #[test]
    fn starts_without_specialties() {
        let vet = Vet::default();
        assert!(vet.specialties().is_empty());
        assert_eq!(vet.nr_of_specialties(), 0);
    }

    #[test]
    fn added_specialty_is_counted_and_listed() {
        let mut vet = Vet::new("James", "Carter");
        vet.add_specialty(specialty("surgery"));
        assert!(vet.specialties_internal().contains(&specialty("surgery")));
        assert_eq!(vet.nr_of_specialties(), 1);
    }

    #[test]
    fn specialties_sorted_by_name() {
        let mut vet = Vet::new("Linda", "Douglas");
        vet.add_specialty(specialty("radiology"));
        vet.add_specialty(specialty("surgery"));
        vet.add_specialty(specialty("dentistry"));

        let names: Vec<_> = vet
            .specialties()
            .iter()
            .map(|specialty| specialty.name().to_string())
            .collect();
        assert_eq!(names, vec!["dentistry", "radiology", "surgery"]);
        assert_eq!(vet.specialties_internal()[0].name(), "radiology");
    }

    #[test]
    fn sorting_is_case_sensitive() {
        let vet = Vet::default()
            .with_specialty(specialty("dentistry"))
            .with_specialty(specialty("Surgery"));
        assert_eq!(vet.specialties()[0].name(), "Surgery");
    }

    #[test]
    fn count_matches_number_of_additions() {
        let mut vet = Vet::default();
        vet.add_specialty(specialty("surgery"));
        vet.add_specialty(specialty("surgery"));
        assert_eq!(vet.nr_of_specialties(), 2);
    }

    #[test]
    fn properties_round_trip() {
        let mut vet = Vet::default();
        vet.set_id(1);
        vet.set_first_name("John");
        vet.set_last_name("Doe");
        assert_eq!(vet.id(), Some(1));
        assert_eq!(vet.first_name(), "John");
        assert_eq!(vet.last_name(), "Doe");
    }

    #[test]
    fn specialty_identifier_is_unset_until_saved() {
        let mut specialty = Specialty::new("surgery");
        assert_eq!(specialty.id(), None);
        specialty.set_name("radiology");
        assert_eq!(specialty.name(), "radiology");
    }
}
