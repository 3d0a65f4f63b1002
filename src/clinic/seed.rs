//! Loads the bundled clinic fixture into the configured stores.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;

use super::{
    customers::{Owner, Pet, PetType},
    repositories::{
        OwnerRepository, PetRepository, PetTypeRepository, SpecialtyRepository, VetRepository,
        VisitRepository,
    },
    service::ClinicServices,
    vets::{Specialty, Vet},
    visits::Visit,
};
use crate::{Error, Result};

const CLINIC_FIXTURE: &str = include_str!("../fixtures/clinic.yaml");

#[derive(Debug, Deserialize)]
struct Fixture {
    pet_types: Vec<NamedRow>,
    specialties: Vec<NamedRow>,
    vets: Vec<VetRow>,
    owners: Vec<OwnerRow>,
    pets: Vec<PetRow>,
    visits: Vec<VisitRow>,
}

#[derive(Debug, Deserialize)]
struct NamedRow {
    id: i32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct VetRow {
    first_name: String,
    last_name: String,
    #[serde(default)]
    specialties: Vec<i32>,
}

#[derive(Debug, Deserialize)]
struct OwnerRow {
    id: i32,
    first_name: String,
    last_name: String,
    address: String,
    city: String,
    telephone: String,
}

#[derive(Debug, Deserialize)]
struct PetRow {
    id: i32,
    name: String,
    birth_date: NaiveDate,
    type_id: i32,
    owner_id: i32,
}

#[derive(Debug, Deserialize)]
struct VisitRow {
    pet_id: i32,
    date: NaiveDate,
    description: String,
}

/// Counts of the records written by [`run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub pet_types: usize,
    pub specialties: usize,
    pub vets: usize,
    pub owners: usize,
    pub pets: usize,
    pub visits: usize,
}

impl SeedSummary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn lookup<T: Clone>(map: &HashMap<i32, T>, kind: &str, id: i32) -> Result<T> {
    map.get(&id)
        .cloned()
        .ok_or_else(|| Error::Message(format!("fixture references unknown {kind} {id}")))
}

/// Seeds the stores with the bundled fixture.
///
/// Seeding is skipped, and an empty summary returned, when the customers store
/// already holds pet types.
///
/// # Errors
/// Fails when the fixture is malformed or a store rejects a record.
pub async fn run(services: &ClinicServices) -> Result<SeedSummary> {
    let pet_type_repo = services.customers.pet_types();
    if !pet_type_repo.find_all().await?.is_empty() {
        tracing::info!("seed_skipped_store_not_empty");
        return Ok(SeedSummary::default());
    }

    let fixture: Fixture = serde_yaml::from_str(CLINIC_FIXTURE)?;
    let mut summary = SeedSummary::default();

    let mut pet_types = HashMap::new();
    for row in fixture.pet_types {
        let saved = pet_type_repo.save(PetType::new(row.name)).await?;
        pet_types.insert(row.id, saved);
        summary.pet_types += 1;
    }

    let specialty_repo = services.vets.specialties();
    let mut specialties = HashMap::new();
    for row in fixture.specialties {
        let saved = specialty_repo.save(Specialty::new(row.name)).await?;
        specialties.insert(row.id, saved);
        summary.specialties += 1;
    }

    let vet_repo = services.vets.vets();
    for row in fixture.vets {
        let mut vet = Vet::new(row.first_name, row.last_name);
        for id in row.specialties {
            vet.add_specialty(lookup(&specialties, "specialty", id)?);
        }
        vet_repo.save(vet).await?;
        summary.vets += 1;
    }

    let owner_repo = services.customers.owners();
    let mut owners = HashMap::new();
    for row in fixture.owners {
        let owner = Owner::new(row.first_name, row.last_name)
            .with_address(row.address)
            .with_city(row.city)
            .with_telephone(row.telephone);
        let saved = owner_repo.save(owner).await?;
        owners.insert(row.id, saved.reference());
        summary.owners += 1;
    }

    let pet_repo = services.customers.pets();
    let mut pets = HashMap::new();
    for row in fixture.pets {
        let mut pet = Pet::new(row.name, lookup(&pet_types, "pet type", row.type_id)?)
            .with_birth_date(row.birth_date);
        pet.set_owner(lookup(&owners, "owner", row.owner_id)?);
        let saved = pet_repo.save(pet).await?;
        let id = saved
            .id()
            .ok_or_else(|| Error::Message("store returned a pet without identifier".into()))?;
        pets.insert(row.id, id);
        summary.pets += 1;
    }

    let visit_repo = services.visits.visits();
    for row in fixture.visits {
        let visit = Visit::builder()
            .pet_id(lookup(&pets, "pet", row.pet_id)?)
            .date(row.date)
            .description(row.description)
            .build()?;
        visit_repo.save(visit).await?;
        summary.visits += 1;
    }

    tracing::info!(
        pet_types = summary.pet_types,
        specialties = summary.specialties,
        vets = summary.vets,
        owners = summary.owners,
        pets = summary.pets,
        visits = summary.visits,
        "seed_completed"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::clinic::{service::ClinicServices, value_objects::PetIds};

    #[tokio::test]
    async fn loads_fixture_once() {
        let services = ClinicServices::in_memory();
        let summary = run(&services).await.expect("seed");
        assert_eq!(summary.pet_types, 6);
        assert_eq!(summary.specialties, 3);
        assert_eq!(summary.vets, 6);
        assert_eq!(summary.owners, 10);
        assert_eq!(summary.pets, 13);
        assert_eq!(summary.visits, 4);

        let again = run(&services).await.expect("second seed");
        assert!(again.is_empty());
    }

    #[tokio::test]
    async fn seeded_records_are_linked() {
        let services = ClinicServices::in_memory();
        run(&services).await.expect("seed");

        let jean = services
            .customers
            .find_owner(6)
            .await
            .unwrap()
            .expect("Jean Coleman");
        let names: Vec<_> = jean.pets().iter().map(|pet| pet.name().to_string()).collect();
        assert_eq!(names, vec!["Max", "Samantha"]);

        let history = services
            .visits
            .visits_for_pets(&PetIds::new([7, 8]))
            .await
            .unwrap();
        assert_eq!(history.items.len(), 4);

        let linda = services.vets.find_vet(3).await.unwrap().expect("Linda");
        let specialties: Vec<_> = linda
            .specialties()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(specialties, vec!["dentistry", "surgery"]);
    }
}
