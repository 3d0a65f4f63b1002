//! In-memory repositories built on [`Table`].
//!
//! Rows are stored flat, one table per relation, and aggregates are
//! reassembled on every read so callers never share mutable state with the
//! store.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{
    customers::{Owner, OwnerRef, Pet, PetType},
    repositories::{
        OwnerRepository, PetRepository, PetTypeRepository, SpecialtyRepository, VetRepository,
        VisitRepository,
    },
    value_objects::PetIds,
    vets::{Specialty, Vet},
    visits::Visit,
};
use crate::store::{Record, RecordStore, StoreError, Table};

#[derive(Clone, Debug)]
struct OwnerRow {
    id: Option<i32>,
    first_name: String,
    last_name: String,
    address: String,
    city: String,
    telephone: String,
}

impl From<&Owner> for OwnerRow {
    fn from(owner: &Owner) -> Self {
        Self {
            id: owner.id(),
            first_name: owner.first_name().to_string(),
            last_name: owner.last_name().to_string(),
            address: owner.address().to_string(),
            city: owner.city().to_string(),
            telephone: owner.telephone().to_string(),
        }
    }
}

impl OwnerRow {
    fn reference(&self) -> OwnerRef {
        OwnerRef {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

#[derive(Clone, Debug)]
struct PetRow {
    id: Option<i32>,
    name: String,
    birth_date: NaiveDate,
    type_id: i32,
    owner_id: i32,
}

#[derive(Clone, Debug)]
struct VetRow {
    id: Option<i32>,
    first_name: String,
    last_name: String,
    specialty_ids: Vec<i32>,
}

macro_rules! impl_record {
    ($($row:ty),+ $(,)?) => {
        $(
            impl Record for $row {
                fn id(&self) -> Option<i32> {
                    self.id
                }

                fn assign_id(&mut self, id: i32) {
                    self.id = Some(id);
                }
            }
        )+
    };
}

impl_record!(OwnerRow, PetRow, VetRow);

macro_rules! impl_entity_record {
    ($($entity:ty),+ $(,)?) => {
        $(
            impl Record for $entity {
                fn id(&self) -> Option<i32> {
                    <$entity>::id(self)
                }

                fn assign_id(&mut self, id: i32) {
                    self.set_id(id);
                }
            }
        )+
    };
}

impl_entity_record!(PetType, Specialty, Visit);

/// Owner, pet and pet type tables of the customers service.
#[derive(Default)]
pub struct InMemoryCustomers {
    owners: Table<OwnerRow>,
    pets: Table<PetRow>,
    types: Table<PetType>,
}

impl InMemoryCustomers {
    fn assemble_pet(&self, row: PetRow, owner: OwnerRef) -> Result<Pet, StoreError> {
        let pet_type = self.types.get(row.type_id).ok_or_else(|| {
            StoreError::constraint(format!("pet type {} does not exist", row.type_id))
        })?;
        let mut pet = Pet::new(row.name, pet_type).with_birth_date(row.birth_date);
        if let Some(id) = row.id {
            pet.set_id(id);
        }
        pet.set_owner(owner);
        Ok(pet)
    }

    fn assemble_owner(&self, row: OwnerRow) -> Result<Owner, StoreError> {
        let reference = row.reference();
        let mut owner = Owner::new(row.first_name, row.last_name)
            .with_address(row.address)
            .with_city(row.city)
            .with_telephone(row.telephone);
        if let Some(id) = row.id {
            owner.set_id(id);
        }
        for pet in self.pets.filter(|pet| Some(pet.owner_id) == row.id) {
            let pet = self.assemble_pet(pet, reference.clone())?;
            owner.add_pet(pet);
        }
        Ok(owner)
    }

    fn store_pet(&self, mut pet: Pet) -> Result<Pet, StoreError> {
        let owner_id = pet
            .owner()
            .and_then(|owner| owner.id)
            .ok_or_else(|| StoreError::constraint("pet must belong to a saved owner"))?;
        if self.owners.get(owner_id).is_none() {
            return Err(StoreError::constraint(format!(
                "owner {owner_id} does not exist"
            )));
        }
        let type_id = self.saved_type_id(pet.pet_type())?;

        let row = self.pets.save(PetRow {
            id: pet.id(),
            name: pet.name().to_string(),
            birth_date: pet.birth_date(),
            type_id,
            owner_id,
        })?;
        if let Some(id) = row.id {
            pet.set_id(id);
        }
        Ok(pet)
    }

    fn saved_type_id(&self, pet_type: &PetType) -> Result<i32, StoreError> {
        pet_type
            .id()
            .filter(|id| self.types.get(*id).is_some())
            .ok_or_else(|| StoreError::constraint("pet type must be saved before its pets"))
    }

    fn store_owner(
        &self,
        owner: &mut Owner,
        written_pets: &mut Vec<(i32, Option<PetRow>)>,
    ) -> Result<(), StoreError> {
        let row = self.owners.save(OwnerRow::from(&*owner))?;
        if let Some(id) = row.id {
            owner.set_id(id);
        }
        let pets = std::mem::take(owner.pets_mut());
        let mut stored = Vec::with_capacity(pets.len());
        for pet in pets {
            let previous = pet.id().and_then(|id| self.pets.get(id));
            let pet = self.store_pet(pet)?;
            if let Some(id) = pet.id() {
                written_pets.push((id, previous));
            }
            stored.push(pet);
        }
        *owner.pets_mut() = stored;
        Ok(())
    }

    fn roll_back_owner(
        &self,
        owner_id: Option<i32>,
        previous: Option<OwnerRow>,
        written_pets: Vec<(i32, Option<PetRow>)>,
    ) {
        for (id, row) in written_pets.into_iter().rev() {
            match row {
                Some(row) => self.pets.restore(id, row),
                None => {
                    self.pets.delete(id);
                }
            }
        }
        match (owner_id, previous) {
            (Some(id), Some(row)) => self.owners.restore(id, row),
            (Some(id), None) => {
                self.owners.delete(id);
            }
            (None, _) => {}
        }
    }
}

#[async_trait]
impl OwnerRepository for InMemoryCustomers {
    type Error = StoreError;

    async fn find_all(&self) -> Result<Vec<Owner>, Self::Error> {
        self.owners
            .all()
            .into_iter()
            .map(|row| self.assemble_owner(row))
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Owner>, Self::Error> {
        self.owners
            .get(id)
            .map(|row| self.assemble_owner(row))
            .transpose()
    }

    async fn save(&self, mut owner: Owner) -> Result<Owner, Self::Error> {
        for pet in owner.pets_internal() {
            self.saved_type_id(pet.pet_type())?;
        }

        let previous = owner.id().and_then(|id| self.owners.get(id));
        let mut written_pets = Vec::new();
        if let Err(err) = self.store_owner(&mut owner, &mut written_pets) {
            tracing::debug!(err.msg = %err, "owner_save_rolled_back");
            self.roll_back_owner(owner.id(), previous, written_pets);
            return Err(err);
        }
        Ok(owner)
    }

    async fn delete(&self, id: i32) -> Result<bool, Self::Error> {
        let removed = self.owners.delete(id).is_some();
        if removed {
            self.pets.delete_where(|pet| pet.owner_id == id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl PetRepository for InMemoryCustomers {
    type Error = StoreError;

    async fn find_by_id(&self, id: i32) -> Result<Option<Pet>, Self::Error> {
        let Some(row) = self.pets.get(id) else {
            return Ok(None);
        };
        let owner = self.owners.get(row.owner_id).ok_or_else(|| {
            StoreError::constraint(format!("owner {} does not exist", row.owner_id))
        })?;
        self.assemble_pet(row, owner.reference()).map(Some)
    }

    async fn save(&self, pet: Pet) -> Result<Pet, Self::Error> {
        self.store_pet(pet)
    }

    async fn delete(&self, id: i32) -> Result<bool, Self::Error> {
        Ok(self.pets.delete(id).is_some())
    }
}

#[async_trait]
impl PetTypeRepository for InMemoryCustomers {
    type Error = StoreError;

    async fn find_all(&self) -> Result<Vec<PetType>, Self::Error> {
        Ok(self.types.all())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<PetType>, Self::Error> {
        Ok(self.types.get(id))
    }

    async fn save(&self, pet_type: PetType) -> Result<PetType, Self::Error> {
        self.types.save(pet_type)
    }
}

/// Vet, specialty and membership tables of the vets service.
#[derive(Default)]
pub struct InMemoryVets {
    vets: Table<VetRow>,
    specialties: Table<Specialty>,
}

impl InMemoryVets {
    fn assemble(&self, row: VetRow) -> Result<Vet, StoreError> {
        let mut vet = Vet::new(row.first_name, row.last_name);
        if let Some(id) = row.id {
            vet.set_id(id);
        }
        for specialty_id in row.specialty_ids {
            let specialty = self.specialties.get(specialty_id).ok_or_else(|| {
                StoreError::constraint(format!("specialty {specialty_id} does not exist"))
            })?;
            vet.add_specialty(specialty);
        }
        Ok(vet)
    }
}

#[async_trait]
impl VetRepository for InMemoryVets {
    type Error = StoreError;

    async fn find_all(&self) -> Result<Vec<Vet>, Self::Error> {
        self.vets
            .all()
            .into_iter()
            .map(|row| self.assemble(row))
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Vet>, Self::Error> {
        self.vets.get(id).map(|row| self.assemble(row)).transpose()
    }

    async fn save(&self, mut vet: Vet) -> Result<Vet, Self::Error> {
        let mut specialty_ids = Vec::new();
        for specialty in vet.specialties_internal() {
            let id = specialty
                .id()
                .filter(|id| self.specialties.get(*id).is_some())
                .ok_or_else(|| {
                    StoreError::constraint(format!(
                        "specialty `{}` must be saved before it is assigned",
                        specialty.name()
                    ))
                })?;
            if !specialty_ids.contains(&id) {
                specialty_ids.push(id);
            }
        }

        let row = self.vets.save(VetRow {
            id: vet.id(),
            first_name: vet.first_name().to_string(),
            last_name: vet.last_name().to_string(),
            specialty_ids,
        })?;
        if let Some(id) = row.id {
            vet.set_id(id);
        }
        Ok(vet)
    }

    async fn delete(&self, id: i32) -> Result<bool, Self::Error> {
        Ok(self.vets.delete(id).is_some())
    }
}

#[async_trait]
impl SpecialtyRepository for InMemoryVets {
    type Error = StoreError;

    async fn find_all(&self) -> Result<Vec<Specialty>, Self::Error> {
        Ok(self.specialties.all())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Specialty>, Self::Error> {
        Ok(self.specialties.get(id))
    }

    async fn save(&self, specialty: Specialty) -> Result<Specialty, Self::Error> {
        self.specialties.save(specialty)
    }
}

/// Visit table of the visits service.
#[derive(Default)]
pub struct InMemoryVisits {
    visits: Table<Visit>,
}

#[async_trait]
impl VisitRepository for InMemoryVisits {
    type Error = StoreError;

    async fn find_all(&self) -> Result<Vec<Visit>, Self::Error> {
        Ok(self.visits.all())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Visit>, Self::Error> {
        Ok(self.visits.get(id))
    }

    async fn find_by_pet_id(&self, pet_id: i32) -> Result<Vec<Visit>, Self::Error> {
        Ok(self.visits.filter(|visit| visit.pet_id() == pet_id))
    }

    async fn find_by_pet_id_in(&self, pet_ids: &PetIds) -> Result<Vec<Visit>, Self::Error> {
        Ok(self.visits.filter(|visit| pet_ids.contains(visit.pet_id())))
    }

    async fn save(&self, visit: Visit) -> Result<Visit, Self::Error> {
        self.visits.save(visit)
    }

    async fn delete(&self, id: i32) -> Result<bool, Self::Error> {
        Ok(self.visits.delete(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{InMemoryCustomers, InMemoryVets, InMemoryVisits};
    use crate::clinic::{
        customers::{Owner, Pet, PetType},
        repositories::{
            OwnerRepository, PetRepository, PetTypeRepository, SpecialtyRepository,
            VetRepository, VisitRepository,
        },
        value_objects::PetIds,
        vets::{Specialty, Vet},
        visits::Visit,
    };
    use crate::store::StoreError;

    fn visit(pet_id: i32, description: &str) -> Visit {
        Visit::builder()
            .date(NaiveDate::from_ymd_opt(2013, 1, 1).expect("valid date"))
            .description(description)
            .pet_id(pet_id)
            .build()
            .expect("valid visit")
    }

    async fn seeded_visits() -> InMemoryVisits {
        let store = InMemoryVisits::default();
        store.save(visit(111, "Annual checkup")).await.unwrap();
        store.save(visit(222, "Vaccination")).await.unwrap();
        store.save(visit(333, "Dental cleaning")).await.unwrap();
        store.save(visit(222, "Skin condition")).await.unwrap();
        store
    }

    #[tokio::test]
    async fn batch_lookup_is_union_of_single_lookups() {
        let store = seeded_visits().await;
        let batch = store
            .find_by_pet_id_in(&PetIds::new([111, 222]))
            .await
            .unwrap();
        assert_eq!(batch.len(), 3);

        let mut union = store.find_by_pet_id(111).await.unwrap();
        union.extend(store.find_by_pet_id(222).await.unwrap());
        union.sort_by_key(Visit::id);
        assert_eq!(batch, union);

        let descriptions: Vec<_> = batch.iter().filter_map(Visit::description).collect();
        assert_eq!(
            descriptions,
            vec!["Annual checkup", "Vaccination", "Skin condition"]
        );
    }

    #[tokio::test]
    async fn singleton_batch_matches_single_lookup() {
        let store = seeded_visits().await;
        assert_eq!(
            store.find_by_pet_id_in(&PetIds::new([222])).await.unwrap(),
            store.find_by_pet_id(222).await.unwrap()
        );
    }

    #[tokio::test]
    async fn unknown_pet_has_no_visits() {
        let store = seeded_visits().await;
        assert!(store.find_by_pet_id(999).await.unwrap().is_empty());
        assert!(store
            .find_by_pet_id_in(&PetIds::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn saved_visit_can_be_found_by_id() {
        let store = InMemoryVisits::default();
        let saved = store.save(visit(3, "Dental cleaning")).await.unwrap();
        let id = saved.id().expect("identifier assigned");
        assert_eq!(store.find_by_id(id).await.unwrap(), Some(saved));
        assert!(store.delete(id).await.unwrap());
        assert!(store.find_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn owner_save_cascades_to_pets() {
        let store = InMemoryCustomers::default();
        let dog = PetTypeRepository::save(&store, PetType::new("dog"))
            .await
            .unwrap();
        let mut owner = Owner::new("Betty", "Davis").with_city("Sun Prairie");
        owner.add_pet(Pet::new("Basil", dog.clone()));

        let saved = OwnerRepository::save(&store, owner).await.unwrap();
        let owner_id = saved.id().expect("owner id");
        let pet_id = saved.pets_internal()[0].id().expect("pet id");

        let loaded = OwnerRepository::find_by_id(&store, owner_id)
            .await
            .unwrap()
            .expect("owner stored");
        assert_eq!(loaded, saved);

        let pet = PetRepository::find_by_id(&store, pet_id)
            .await
            .unwrap()
            .expect("pet stored");
        assert_eq!(pet.owner().map(|owner| owner.full_name()), Some("Betty Davis".into()));

        assert!(OwnerRepository::delete(&store, owner_id).await.unwrap());
        assert!(PetRepository::find_by_id(&store, pet_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn pet_without_saved_owner_is_rejected() {
        let store = InMemoryCustomers::default();
        let cat = PetTypeRepository::save(&store, PetType::new("cat"))
            .await
            .unwrap();
        let err = PetRepository::save(&store, Pet::new("Leo", cat))
            .await
            .expect_err("orphan pet");
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[tokio::test]
    async fn rejected_owner_save_stores_nothing() {
        let store = InMemoryCustomers::default();
        let mut owner = Owner::new("Betty", "Davis");
        owner.add_pet(Pet::new("Basil", PetType::new("unsaved")));

        let err = OwnerRepository::save(&store, owner)
            .await
            .expect_err("pet type was never saved");
        assert!(matches!(err, StoreError::Constraint(_)));
        assert!(OwnerRepository::find_all(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_owner_update_keeps_stored_owner() {
        let store = InMemoryCustomers::default();
        let owner = Owner::new("Betty", "Davis").with_city("Madison");
        let saved = OwnerRepository::save(&store, owner).await.unwrap();
        let owner_id = saved.id().expect("owner id");

        let mut changed = saved.clone();
        changed.set_city("Sun Prairie");
        changed.add_pet(Pet::new("Basil", PetType::new("unsaved")));
        assert!(OwnerRepository::save(&store, changed).await.is_err());

        let loaded = OwnerRepository::find_by_id(&store, owner_id)
            .await
            .unwrap()
            .expect("owner still stored");
        assert_eq!(loaded.city(), "Madison");
        assert!(loaded.pets().is_empty());
    }

    #[tokio::test]
    async fn exhausted_visit_identifiers_are_rejected() {
        let store = InMemoryVisits::default();
        let last = Visit::builder()
            .id(i32::MAX)
            .pet_id(1)
            .build()
            .expect("valid visit");
        store.save(last).await.unwrap();

        let err = store
            .save(visit(1, "Follow-up"))
            .await
            .expect_err("no identifier left");
        assert!(matches!(err, StoreError::Constraint(_)));
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn vet_membership_round_trips() {
        let store = InMemoryVets::default();
        let surgery = SpecialtyRepository::save(&store, Specialty::new("surgery"))
            .await
            .unwrap();
        let dentistry = SpecialtyRepository::save(&store, Specialty::new("dentistry"))
            .await
            .unwrap();
        let vet = Vet::new("Linda", "Douglas")
            .with_specialty(surgery.clone())
            .with_specialty(dentistry.clone());
        let saved = VetRepository::save(&store, vet).await.unwrap();

        let loaded = VetRepository::find_by_id(&store, saved.id().expect("vet id"))
            .await
            .unwrap()
            .expect("vet stored");
        assert_eq!(loaded.nr_of_specialties(), 2);
        assert_eq!(loaded.specialties(), vec![dentistry, surgery]);
    }

    #[tokio::test]
    async fn unsaved_specialty_is_rejected() {
        let store = InMemoryVets::default();
        let vet = Vet::new("Helen", "Leary").with_specialty(Specialty::new("radiology"));
        assert!(VetRepository::save(&store, vet).await.is_err());
        assert!(VetRepository::find_all(&store).await.unwrap().is_empty());
    }
}
