pub use super::{
    owners::Entity as Owners, pets::Entity as Pets, specialties::Entity as Specialties,
    types::Entity as Types, vet_specialties::Entity as VetSpecialties, vets::Entity as Vets,
    visits::Entity as Visits,
};
