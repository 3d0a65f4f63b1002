use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    clinic::{
        customers::{Owner, Pet, PetType},
        memory::{InMemoryCustomers, InMemoryVets, InMemoryVisits},
        repositories::{
            OwnerRepository, PetRepository, PetTypeRepository, SpecialtyRepository,
            VetRepository, VisitRepository,
        },
        value_objects::PetIds,
        vets::{Specialty, Vet},
        visits::{ensure_pet_id, Visit, VisitError},
    },
    store::StoreError,
};

/// Type aliases simplifying repository trait object usage inside the services.
pub type OwnerHandle = dyn OwnerRepository<Error = StoreError> + Send + Sync + 'static;
pub type PetHandle = dyn PetRepository<Error = StoreError> + Send + Sync + 'static;
pub type PetTypeHandle = dyn PetTypeRepository<Error = StoreError> + Send + Sync + 'static;
pub type VetHandle = dyn VetRepository<Error = StoreError> + Send + Sync + 'static;
pub type SpecialtyHandle = dyn SpecialtyRepository<Error = StoreError> + Send + Sync + 'static;
pub type VisitHandle = dyn VisitRepository<Error = StoreError> + Send + Sync + 'static;

/// Errors raised by the clinic services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The store failed; nothing is retried.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A visit could not be constructed from the request.
    #[error(transparent)]
    Visit(#[from] VisitError),
    /// A pet referenced a type that is not in the reference table.
    #[error("pet type {type_id} does not exist")]
    UnknownPetType { type_id: i32 },
}

/// Owner fields accepted from callers when creating or updating an owner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OwnerDetails {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub telephone: String,
}

impl OwnerDetails {
    fn apply(self, owner: &mut Owner) {
        owner.set_first_name(self.first_name);
        owner.set_last_name(self.last_name);
        owner.set_address(self.address);
        owner.set_city(self.city);
        owner.set_telephone(self.telephone);
    }
}

/// Pet fields accepted from callers. A missing birth date means today.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PetDraft {
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub type_id: i32,
}

/// Visit fields accepted from callers. A missing date means today.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisitDraft {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Visit history of several pets, in store order.
///
/// Items are not bucketed per pet; each carries its own pet identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Visits {
    pub items: Vec<Visit>,
}

/// Customers service: owners, their pets, and pet types.
#[derive(Clone)]
pub struct CustomersService {
    owners: Arc<OwnerHandle>,
    pets: Arc<PetHandle>,
    pet_types: Arc<PetTypeHandle>,
}

impl CustomersService {
    /// Creates a new [`CustomersService`] from trait object handles.
    pub fn new(
        owners: Arc<OwnerHandle>,
        pets: Arc<PetHandle>,
        pet_types: Arc<PetTypeHandle>,
    ) -> Self {
        Self {
            owners,
            pets,
            pet_types,
        }
    }

    /// Creates a service over a fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryCustomers::default());
        Self::new(store.clone(), store.clone(), store)
    }

    /// Returns a clone of the owner repository handle.
    pub fn owners(&self) -> Arc<OwnerHandle> {
        Arc::clone(&self.owners)
    }

    /// Returns a clone of the pet repository handle.
    pub fn pets(&self) -> Arc<PetHandle> {
        Arc::clone(&self.pets)
    }

    /// Returns a clone of the pet type repository handle.
    pub fn pet_types(&self) -> Arc<PetTypeHandle> {
        Arc::clone(&self.pet_types)
    }

    pub async fn list_owners(&self) -> Result<Vec<Owner>, ServiceError> {
        Ok(self.owners.find_all().await?)
    }

    pub async fn find_owner(&self, id: i32) -> Result<Option<Owner>, ServiceError> {
        Ok(self.owners.find_by_id(id).await?)
    }

    pub async fn create_owner(&self, details: OwnerDetails) -> Result<Owner, ServiceError> {
        let mut owner = Owner::default();
        details.apply(&mut owner);
        let owner = self.owners.save(owner).await?;
        tracing::info!(owner.id = ?owner.id(), "owner_created");
        Ok(owner)
    }

    /// Overwrites an owner's fields, returning `None` when no such owner exists.
    pub async fn update_owner(
        &self,
        id: i32,
        details: OwnerDetails,
    ) -> Result<Option<Owner>, ServiceError> {
        let Some(mut owner) = self.owners.find_by_id(id).await? else {
            return Ok(None);
        };
        details.apply(&mut owner);
        let owner = self.owners.save(owner).await?;
        tracing::info!(owner.id = id, "owner_updated");
        Ok(Some(owner))
    }

    pub async fn list_pet_types(&self) -> Result<Vec<PetType>, ServiceError> {
        Ok(self.pet_types.find_all().await?)
    }

    pub async fn find_pet(&self, id: i32) -> Result<Option<Pet>, ServiceError> {
        Ok(self.pets.find_by_id(id).await?)
    }

    /// Registers a new pet for an owner, returning `None` when the owner does
    /// not exist.
    pub async fn create_pet(
        &self,
        owner_id: i32,
        draft: PetDraft,
    ) -> Result<Option<Pet>, ServiceError> {
        let Some(owner) = self.owners.find_by_id(owner_id).await? else {
            return Ok(None);
        };
        let pet_type = self.resolve_pet_type(draft.type_id).await?;
        let mut pet = Pet::new(draft.name, pet_type);
        if let Some(birth_date) = draft.birth_date {
            pet.set_birth_date(birth_date);
        }
        pet.set_owner(owner.reference());
        let pet = self.pets.save(pet).await?;
        tracing::info!(owner.id = owner_id, pet.id = ?pet.id(), "pet_created");
        Ok(Some(pet))
    }

    /// Updates a pet, returning `None` when no such pet exists.
    pub async fn update_pet(&self, id: i32, draft: PetDraft) -> Result<Option<Pet>, ServiceError> {
        let Some(mut pet) = self.pets.find_by_id(id).await? else {
            return Ok(None);
        };
        let pet_type = self.resolve_pet_type(draft.type_id).await?;
        pet.set_name(draft.name);
        pet.set_pet_type(pet_type);
        if let Some(birth_date) = draft.birth_date {
            pet.set_birth_date(birth_date);
        }
        let pet = self.pets.save(pet).await?;
        tracing::info!(pet.id = id, "pet_updated");
        Ok(Some(pet))
    }

    async fn resolve_pet_type(&self, type_id: i32) -> Result<PetType, ServiceError> {
        self.pet_types
            .find_by_id(type_id)
            .await?
            .ok_or(ServiceError::UnknownPetType { type_id })
    }
}

/// Vets service: the staff directory.
#[derive(Clone)]
pub struct VetsService {
    vets: Arc<VetHandle>,
    specialties: Arc<SpecialtyHandle>,
}

impl VetsService {
    /// Creates a new [`VetsService`] from trait object handles.
    pub fn new(vets: Arc<VetHandle>, specialties: Arc<SpecialtyHandle>) -> Self {
        Self { vets, specialties }
    }

    /// Creates a service over a fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryVets::default());
        Self::new(store.clone(), store)
    }

    /// Returns a clone of the vet repository handle.
    pub fn vets(&self) -> Arc<VetHandle> {
        Arc::clone(&self.vets)
    }

    /// Returns a clone of the specialty repository handle.
    pub fn specialties(&self) -> Arc<SpecialtyHandle> {
        Arc::clone(&self.specialties)
    }

    pub async fn list_vets(&self) -> Result<Vec<Vet>, ServiceError> {
        Ok(self.vets.find_all().await?)
    }

    pub async fn find_vet(&self, id: i32) -> Result<Option<Vet>, ServiceError> {
        Ok(self.vets.find_by_id(id).await?)
    }

    pub async fn list_specialties(&self) -> Result<Vec<Specialty>, ServiceError> {
        Ok(self.specialties.find_all().await?)
    }
}

/// Visits service: visit history and its aggregation across pets.
#[derive(Clone)]
pub struct VisitsService {
    visits: Arc<VisitHandle>,
}

impl VisitsService {
    /// Creates a new [`VisitsService`] from a trait object handle.
    pub fn new(visits: Arc<VisitHandle>) -> Self {
        Self { visits }
    }

    /// Creates a service over a fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryVisits::default()))
    }

    /// Returns a clone of the visit repository handle.
    pub fn visits(&self) -> Arc<VisitHandle> {
        Arc::clone(&self.visits)
    }

    /// Visits of a single pet, in store order. Unknown pets have none.
    pub async fn visits_for_pet(&self, pet_id: i32) -> Result<Vec<Visit>, ServiceError> {
        Ok(self.visits.find_by_pet_id(pet_id).await?)
    }

    /// Visits of every pet in the set, gathered with one batched lookup.
    ///
    /// For a singleton set the items equal [`VisitsService::visits_for_pet`].
    pub async fn visits_for_pets(&self, pet_ids: &PetIds) -> Result<Visits, ServiceError> {
        if pet_ids.is_empty() {
            return Ok(Visits::default());
        }
        let items = self.visits.find_by_pet_id_in(pet_ids).await?;
        tracing::debug!(pets = pet_ids.len(), visits = items.len(), "visits_aggregated");
        Ok(Visits { items })
    }

    /// Records a new visit.
    ///
    /// The pet identifier and description are validated before the store is
    /// touched.
    pub async fn create_visit(&self, pet_id: i32, draft: VisitDraft) -> Result<Visit, ServiceError> {
        let pet_id = ensure_pet_id(pet_id)?;
        let mut builder = Visit::builder().pet_id(pet_id);
        if let Some(date) = draft.date {
            builder = builder.date(date);
        }
        if let Some(description) = draft.description {
            builder = builder.description(description);
        }
        let visit = self.visits.save(builder.build()?).await?;
        tracing::info!(pet.id = pet_id, visit.id = ?visit.id(), "visit_created");
        Ok(visit)
    }
}

/// The three clinic services sharing one store configuration.
#[derive(Clone)]
pub struct ClinicServices {
    pub customers: CustomersService,
    pub vets: VetsService,
    pub visits: VisitsService,
}

impl ClinicServices {
    /// Creates services over fresh in-memory stores.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            customers: CustomersService::in_memory(),
            vets: VetsService::in_memory(),
            visits: VisitsService::in_memory(),
        }
    }

    /// Creates services over a relational database connection.
    #[cfg(feature = "with-db")]
    #[must_use]
    pub fn from_database(db: &sea_orm::DatabaseConnection) -> Self {
        use crate::models::{DbCustomers, DbVets, DbVisits};

        let customers = Arc::new(DbCustomers::new(db.clone()));
        let vets = Arc::new(DbVets::new(db.clone()));
        Self {
            customers: CustomersService::new(customers.clone(), customers.clone(), customers),
            vets: VetsService::new(vets.clone(), vets),
            visits: VisitsService::new(Arc::new(DbVisits::new(db.clone()))),
        }
    }
}
