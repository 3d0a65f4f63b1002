use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use super::_entities::{owners, pets, types};
use crate::{
    clinic::{
        customers::{Owner, Pet, PetType},
        repositories::{OwnerRepository, PetRepository, PetTypeRepository},
    },
    store::StoreError,
};

/// Owners, pets and pet types stored in the `owners`, `pets` and `types`
/// tables.
#[derive(Clone, Debug)]
pub struct DbCustomers {
    db: DatabaseConnection,
}

impl DbCustomers {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn assemble(&self, rows: Vec<owners::Model>) -> Result<Vec<Owner>, StoreError> {
        let pet_types = type_map(&self.db).await?;
        let owner_ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let mut pets_by_owner: HashMap<i32, Vec<pets::Model>> = HashMap::new();
        for pet in pets::Entity::find()
            .filter(pets::Column::OwnerId.is_in(owner_ids))
            .order_by_asc(pets::Column::Id)
            .all(&self.db)
            .await?
        {
            pets_by_owner.entry(pet.owner_id).or_default().push(pet);
        }

        rows.into_iter()
            .map(|row| {
                let mut owner = Owner::new(row.first_name, row.last_name)
                    .with_id(row.id)
                    .with_address(row.address)
                    .with_city(row.city)
                    .with_telephone(row.telephone);
                for pet in pets_by_owner.remove(&row.id).unwrap_or_default() {
                    let pet_type = lookup_type(&pet_types, pet.type_id)?;
                    owner.add_pet(
                        Pet::new(pet.name, pet_type)
                            .with_id(pet.id)
                            .with_birth_date(pet.birth_date),
                    );
                }
                Ok(owner)
            })
            .collect()
    }
}

async fn type_map<C: ConnectionTrait>(db: &C) -> Result<HashMap<i32, PetType>, StoreError> {
    Ok(types::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|row| (row.id, PetType::new(row.name).with_id(row.id)))
        .collect())
}

fn lookup_type(pet_types: &HashMap<i32, PetType>, id: i32) -> Result<PetType, StoreError> {
    pet_types
        .get(&id)
        .cloned()
        .ok_or_else(|| StoreError::constraint(format!("pet type {id} does not exist")))
}

async fn store_owner<C: ConnectionTrait>(db: &C, owner: &Owner) -> Result<i32, StoreError> {
    let mut model = owners::ActiveModel {
        first_name: Set(owner.first_name().to_string()),
        last_name: Set(owner.last_name().to_string()),
        address: Set(owner.address().to_string()),
        city: Set(owner.city().to_string()),
        telephone: Set(owner.telephone().to_string()),
        ..Default::default()
    };
    let exists = match owner.id() {
        Some(id) => {
            model.id = Set(id);
            owners::Entity::find_by_id(id).one(db).await?.is_some()
        }
        None => false,
    };
    let saved = if exists {
        model.update(db).await?
    } else {
        let row = model.insert(db).await?;
        super::sync_id_sequence(db, owners::Entity, owner.id()).await?;
        row
    };
    Ok(saved.id)
}

async fn store_pet<C: ConnectionTrait>(db: &C, mut pet: Pet) -> Result<Pet, StoreError> {
    let owner_id = pet
        .owner()
        .and_then(|owner| owner.id)
        .ok_or_else(|| StoreError::constraint("pet must belong to a saved owner"))?;
    if owners::Entity::find_by_id(owner_id).one(db).await?.is_none() {
        return Err(StoreError::constraint(format!(
            "owner {owner_id} does not exist"
        )));
    }
    let type_id = pet
        .pet_type()
        .id()
        .ok_or_else(|| StoreError::constraint("pet type must be saved before its pets"))?;
    if types::Entity::find_by_id(type_id).one(db).await?.is_none() {
        return Err(StoreError::constraint(format!(
            "pet type {type_id} does not exist"
        )));
    }

    let mut model = pets::ActiveModel {
        name: Set(pet.name().to_string()),
        birth_date: Set(pet.birth_date()),
        type_id: Set(type_id),
        owner_id: Set(owner_id),
        ..Default::default()
    };
    let exists = match pet.id() {
        Some(id) => {
            model.id = Set(id);
            pets::Entity::find_by_id(id).one(db).await?.is_some()
        }
        None => false,
    };
    let saved = if exists {
        model.update(db).await?
    } else {
        let row = model.insert(db).await?;
        super::sync_id_sequence(db, pets::Entity, pet.id()).await?;
        row
    };
    pet.set_id(saved.id);
    Ok(pet)
}

#[async_trait]
impl OwnerRepository for DbCustomers {
    type Error = StoreError;

    async fn find_all(&self) -> Result<Vec<Owner>, Self::Error> {
        let rows = owners::Entity::find()
            .order_by_asc(owners::Column::Id)
            .all(&self.db)
            .await?;
        self.assemble(rows).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Owner>, Self::Error> {
        let Some(row) = owners::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(self.assemble(vec![row]).await?.pop())
    }

    async fn save(&self, mut owner: Owner) -> Result<Owner, Self::Error> {
        let txn = self.db.begin().await?;
        let id = store_owner(&txn, &owner).await?;
        owner.set_id(id);
        let pets = std::mem::take(owner.pets_mut());
        let mut stored = Vec::with_capacity(pets.len());
        for pet in pets {
            stored.push(store_pet(&txn, pet).await?);
        }
        txn.commit().await?;
        *owner.pets_mut() = stored;
        Ok(owner)
    }

    async fn delete(&self, id: i32) -> Result<bool, Self::Error> {
        let txn = self.db.begin().await?;
        pets::Entity::delete_many()
            .filter(pets::Column::OwnerId.eq(id))
            .exec(&txn)
            .await?;
        let result = owners::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl PetRepository for DbCustomers {
    type Error = StoreError;

    async fn find_by_id(&self, id: i32) -> Result<Option<Pet>, Self::Error> {
        let Some((row, owner)) = pets::Entity::find_by_id(id)
            .find_also_related(owners::Entity)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let owner = owner.ok_or_else(|| {
            StoreError::constraint(format!("owner {} does not exist", row.owner_id))
        })?;
        let pet_type = types::Entity::find_by_id(row.type_id)
            .one(&self.db)
            .await?
            .map(|model| PetType::new(model.name).with_id(model.id))
            .ok_or_else(|| {
                StoreError::constraint(format!("pet type {} does not exist", row.type_id))
            })?;

        let mut pet = Pet::new(row.name, pet_type)
            .with_id(row.id)
            .with_birth_date(row.birth_date);
        pet.set_owner(
            Owner::new(owner.first_name, owner.last_name)
                .with_id(owner.id)
                .reference(),
        );
        Ok(Some(pet))
    }

    async fn save(&self, pet: Pet) -> Result<Pet, Self::Error> {
        store_pet(&self.db, pet).await
    }

    async fn delete(&self, id: i32) -> Result<bool, Self::Error> {
        let result = pets::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl PetTypeRepository for DbCustomers {
    type Error = StoreError;

    async fn find_all(&self) -> Result<Vec<PetType>, Self::Error> {
        Ok(types::Entity::find()
            .order_by_asc(types::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| PetType::new(row.name).with_id(row.id))
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<PetType>, Self::Error> {
        Ok(types::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(|row| PetType::new(row.name).with_id(row.id)))
    }

    async fn save(&self, mut pet_type: PetType) -> Result<PetType, Self::Error> {
        let mut model = types::ActiveModel {
            name: Set(pet_type.name().to_string()),
            ..Default::default()
        };
        let exists = match pet_type.id() {
            Some(id) => {
                model.id = Set(id);
                types::Entity::find_by_id(id).one(&self.db).await?.is_some()
            }
            None => false,
        };
        let saved = if exists {
            model.update(&self.db).await?
        } else {
            let row = model.insert(&self.db).await?;
            super::sync_id_sequence(&self.db, types::Entity, pet_type.id()).await?;
            row
        };
        pet_type.set_id(saved.id);
        Ok(pet_type)
    }
}

#[cfg(test)]
mod tests {
    use super::DbCustomers;
    use crate::{
        clinic::{
            customers::{Owner, Pet, PetType},
            repositories::{OwnerRepository, PetRepository, PetTypeRepository},
        },
        models::tests::sqlite,
        store::StoreError,
    };

    #[tokio::test]
    async fn owner_round_trips_with_pets() {
        let store = DbCustomers::new(sqlite().await);
        let cat = PetTypeRepository::save(&store, PetType::new("cat"))
            .await
            .unwrap();

        let mut owner = Owner::new("Jean", "Coleman").with_telephone("6085552654");
        owner.add_pet(Pet::new("Samantha", cat.clone()));
        owner.add_pet(Pet::new("Max", cat));
        let saved = OwnerRepository::save(&store, owner).await.unwrap();
        let id = saved.id().expect("owner id");

        let loaded = OwnerRepository::find_by_id(&store, id)
            .await
            .unwrap()
            .expect("owner stored");
        assert_eq!(loaded, saved);
        let names: Vec<_> = loaded.pets().iter().map(|pet| pet.name()).collect();
        assert_eq!(names, vec!["Max", "Samantha"]);

        let pet_id = loaded.pets_internal()[0].id().expect("pet id");
        let pet = PetRepository::find_by_id(&store, pet_id)
            .await
            .unwrap()
            .expect("pet stored");
        assert_eq!(pet.owner().map(|owner| owner.full_name()), Some("Jean Coleman".into()));
    }

    #[tokio::test]
    async fn deleting_owner_removes_pets() {
        let store = DbCustomers::new(sqlite().await);
        let dog = PetTypeRepository::save(&store, PetType::new("dog"))
            .await
            .unwrap();
        let mut owner = Owner::new("Carlos", "Estaban");
        owner.add_pet(Pet::new("Lucky", dog));
        let saved = OwnerRepository::save(&store, owner).await.unwrap();
        let pet_id = saved.pets_internal()[0].id().expect("pet id");

        assert!(OwnerRepository::delete(&store, saved.id().expect("id"))
            .await
            .unwrap());
        assert!(PetRepository::find_by_id(&store, pet_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn pet_without_owner_is_rejected() {
        let store = DbCustomers::new(sqlite().await);
        let dog = PetTypeRepository::save(&store, PetType::new("dog"))
            .await
            .unwrap();
        let err = PetRepository::save(&store, Pet::new("Stray", dog))
            .await
            .expect_err("orphan pet");
        assert!(matches!(err, StoreError::Constraint(_)));
    }
}
