use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::_entities::visits;
use crate::{
    clinic::{repositories::VisitRepository, value_objects::PetIds, visits::Visit},
    store::StoreError,
};

/// Visits stored in the `visits` table.
#[derive(Clone, Debug)]
pub struct DbVisits {
    db: DatabaseConnection,
}

impl DbVisits {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_visit(row: visits::Model) -> Result<Visit, StoreError> {
    Visit::new(Some(row.id), Some(row.visit_date), row.description, row.pet_id)
        .map_err(|err| StoreError::constraint(format!("visit {}: {err}", row.id)))
}

fn to_visits(rows: Vec<visits::Model>) -> Result<Vec<Visit>, StoreError> {
    rows.into_iter().map(to_visit).collect()
}

#[async_trait]
impl VisitRepository for DbVisits {
    type Error = StoreError;

    async fn find_all(&self) -> Result<Vec<Visit>, Self::Error> {
        to_visits(
            visits::Entity::find()
                .order_by_asc(visits::Column::Id)
                .all(&self.db)
                .await?,
        )
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Visit>, Self::Error> {
        visits::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(to_visit)
            .transpose()
    }

    async fn find_by_pet_id(&self, pet_id: i32) -> Result<Vec<Visit>, Self::Error> {
        to_visits(
            visits::Entity::find()
                .filter(visits::Column::PetId.eq(pet_id))
                .order_by_asc(visits::Column::Id)
                .all(&self.db)
                .await?,
        )
    }

    async fn find_by_pet_id_in(&self, pet_ids: &PetIds) -> Result<Vec<Visit>, Self::Error> {
        if pet_ids.is_empty() {
            return Ok(Vec::new());
        }
        to_visits(
            visits::Entity::find()
                .filter(visits::Column::PetId.is_in(pet_ids.iter()))
                .order_by_asc(visits::Column::Id)
                .all(&self.db)
                .await?,
        )
    }

    async fn save(&self, mut visit: Visit) -> Result<Visit, Self::Error> {
        let mut model = visits::ActiveModel {
            pet_id: Set(visit.pet_id()),
            visit_date: Set(visit.date()),
            description: Set(visit.description().map(ToString::to_string)),
            ..Default::default()
        };
        let exists = match visit.id() {
            Some(id) => {
                model.id = Set(id);
                visits::Entity::find_by_id(id).one(&self.db).await?.is_some()
            }
            None => false,
        };
        let saved = if exists {
            model.update(&self.db).await?
        } else {
            let row = model.insert(&self.db).await?;
            super::sync_id_sequence(&self.db, visits::Entity, visit.id()).await?;
            row
        };
        visit.set_id(saved.id);
        Ok(visit)
    }

    async fn delete(&self, id: i32) -> Result<bool, Self::Error> {
        let result = visits::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
