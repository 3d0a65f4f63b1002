//! Relational store backed by `sea-orm`.
//!
//! Each service gets its own repository adapter over a shared connection:
//! [`DbCustomers`] for owners, pets and pet types, [`DbVets`] for vets and
//! specialties, and [`DbVisits`] for visit history.

use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, EntityName,
    EntityTrait, Schema, Statement,
};

use crate::{config, store::StoreError};

pub mod _entities;
mod customers;
mod vets;
mod visits;

pub use customers::DbCustomers;
pub use vets::DbVets;
pub use visits::DbVisits;

use _entities::prelude::*;

/// Opens a connection pool from the database configuration, creating the
/// tables first when `auto_migrate` is set.
///
/// # Errors
/// Fails when the database cannot be reached or a table cannot be created.
pub async fn connect(config: &config::Database) -> Result<DatabaseConnection, StoreError> {
    let mut opt = ConnectOptions::new(&config.uri);
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_millis(config.connect_timeout))
        .idle_timeout(Duration::from_millis(config.idle_timeout))
        .sqlx_logging(config.enable_logging);

    let db = Database::connect(opt).await?;
    tracing::info!(backend = ?db.get_database_backend(), "database_connected");
    if config.auto_migrate {
        ensure_schema(&db).await?;
    }
    Ok(db)
}

async fn create_table<C, E>(db: &C, schema: &Schema, entity: E) -> Result<(), StoreError>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    for mut index in schema.create_index_from_entity(entity) {
        index.if_not_exists();
        db.execute(backend.build(&index)).await?;
    }
    Ok(())
}

/// Moves the id sequence of `entity`'s table past the largest stored id after
/// a row was inserted with an explicit identifier.
///
/// Only Postgres needs this: a `SERIAL` sequence does not see explicit ids,
/// while SQLite assigns past the largest rowid on its own.
pub(crate) async fn sync_id_sequence<C, E>(
    db: &C,
    entity: E,
    explicit_id: Option<i32>,
) -> Result<(), StoreError>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    if explicit_id.is_none() || backend != DbBackend::Postgres {
        return Ok(());
    }
    let sql = sequence_sync_sql(entity.table_name());
    db.execute(Statement::from_string(backend, sql)).await?;
    tracing::debug!(table = entity.table_name(), "id_sequence_synced");
    Ok(())
}

fn sequence_sync_sql(table: &str) -> String {
    format!(
        "SELECT setval(pg_get_serial_sequence('\"{table}\"', 'id'), (SELECT MAX(id) FROM \"{table}\"))"
    )
}

/// Creates every clinic table that does not exist yet.
///
/// Referenced tables are created before the tables pointing at them.
///
/// # Errors
/// Fails when a statement is rejected by the database.
pub async fn ensure_schema<C: ConnectionTrait>(db: &C) -> Result<(), StoreError> {
    let schema = Schema::new(db.get_database_backend());
    create_table(db, &schema, Types).await?;
    create_table(db, &schema, Owners).await?;
    create_table(db, &schema, Pets).await?;
    create_table(db, &schema, Specialties).await?;
    create_table(db, &schema, Vets).await?;
    create_table(db, &schema, VetSpecialties).await?;
    create_table(db, &schema, Visits).await?;
    tracing::debug!("schema_ensured");
    Ok(())
}
