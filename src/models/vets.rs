use std::collections::BTreeSet;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::_entities::{specialties, vet_specialties, vets};
use crate::{
    clinic::{
        repositories::{SpecialtyRepository, VetRepository},
        vets::{Specialty, Vet},
    },
    store::StoreError,
};

/// Vets and specialties stored in the `vets`, `specialties` and
/// `vet_specialties` tables.
#[derive(Clone, Debug)]
pub struct DbVets {
    db: DatabaseConnection,
}

impl DbVets {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_vet(row: vets::Model, specialties: Vec<specialties::Model>) -> Vet {
    let mut vet = Vet::new(row.first_name, row.last_name).with_id(row.id);
    for specialty in specialties {
        vet.add_specialty(Specialty::new(specialty.name).with_id(specialty.id));
    }
    vet
}

#[async_trait]
impl VetRepository for DbVets {
    type Error = StoreError;

    async fn find_all(&self) -> Result<Vec<Vet>, Self::Error> {
        Ok(vets::Entity::find()
            .order_by_asc(vets::Column::Id)
            .find_with_related(specialties::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(row, specialties)| to_vet(row, specialties))
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Vet>, Self::Error> {
        Ok(vets::Entity::find_by_id(id)
            .find_with_related(specialties::Entity)
            .all(&self.db)
            .await?
            .pop()
            .map(|(row, specialties)| to_vet(row, specialties)))
    }

    async fn save(&self, mut vet: Vet) -> Result<Vet, Self::Error> {
        let mut membership = BTreeSet::new();
        for specialty in vet.specialties_internal() {
            let id = specialty.id().ok_or_else(|| {
                StoreError::constraint(format!(
                    "specialty {} must be saved before it is assigned",
                    specialty.name()
                ))
            })?;
            membership.insert(id);
        }

        let txn = self.db.begin().await?;
        let mut model = vets::ActiveModel {
            first_name: Set(vet.first_name().to_string()),
            last_name: Set(vet.last_name().to_string()),
            ..Default::default()
        };
        let exists = match vet.id() {
            Some(id) => {
                model.id = Set(id);
                vets::Entity::find_by_id(id).one(&txn).await?.is_some()
            }
            None => false,
        };
        let saved = if exists {
            model.update(&txn).await?
        } else {
            let row = model.insert(&txn).await?;
            super::sync_id_sequence(&txn, vets::Entity, vet.id()).await?;
            row
        };

        vet_specialties::Entity::delete_many()
            .filter(vet_specialties::Column::VetId.eq(saved.id))
            .exec(&txn)
            .await?;
        for specialty_id in membership {
            if specialties::Entity::find_by_id(specialty_id)
                .one(&txn)
                .await?
                .is_none()
            {
                return Err(StoreError::constraint(format!(
                    "specialty {specialty_id} does not exist"
                )));
            }
            vet_specialties::ActiveModel {
                vet_id: Set(saved.id),
                specialty_id: Set(specialty_id),
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;

        vet.set_id(saved.id);
        Ok(vet)
    }

    async fn delete(&self, id: i32) -> Result<bool, Self::Error> {
        let txn = self.db.begin().await?;
        vet_specialties::Entity::delete_many()
            .filter(vet_specialties::Column::VetId.eq(id))
            .exec(&txn)
            .await?;
        let result = vets::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl SpecialtyRepository for DbVets {
    type Error = StoreError;

    async fn find_all(&self) -> Result<Vec<Specialty>, Self::Error> {
        Ok(specialties::Entity::find()
            .order_by_asc(specialties::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| Specialty::new(row.name).with_id(row.id))
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Specialty>, Self::Error> {
        Ok(specialties::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(|row| Specialty::new(row.name).with_id(row.id)))
    }

    async fn save(&self, mut specialty: Specialty) -> Result<Specialty, Self::Error> {
        let mut model = specialties::ActiveModel {
            name: Set(specialty.name().to_string()),
            ..Default::default()
        };
        let exists = match specialty.id() {
            Some(id) => {
                model.id = Set(id);
                specialties::Entity::find_by_id(id)
                    .one(&self.db)
                    .await?
                    .is_some()
            }
            None => false,
        };
        let saved = if exists {
            model.update(&self.db).await?
        } else {
            let row = model.insert(&self.db).await?;
            super::sync_id_sequence(&self.db, specialties::Entity, specialty.id()).await?;
            row
        };
        specialty.set_id(saved.id);
        Ok(specialty)
    }
}
