//! Database configuration module for Murakami Viz.
//!
//! This module handles database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs: unique columns become unique constraints and every `belongs_to`
//! relation becomes a cascading foreign key.

use crate::entities::{
    Device, Faq, Glossary, Group, Library, LibraryDevice, LibraryNetwork, LibraryNote, LibraryRun,
    LibrarySystem, LibraryUser, Network, Note, Run, Setting, System, User, UserGroup,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info};

/// Default `SQLite` file, created on first start.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://murakami_viz.sqlite?mode=rwc";

/// Establishes a connection to the database at `url`.
///
/// `SQLite` connections enforce foreign keys, which the cascading
/// association tables rely on.
pub async fn create_connection(url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    Database::connect(url).await.map_err(Into::into)
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates every table that does not exist yet.
///
/// Parent tables are created before the association tables that reference them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, Library).await?;
    create_table(db, &schema, Device).await?;
    create_table(db, &schema, Network).await?;
    create_table(db, &schema, Run).await?;
    create_table(db, &schema, User).await?;
    create_table(db, &schema, Group).await?;
    create_table(db, &schema, Note).await?;
    create_table(db, &schema, System).await?;
    create_table(db, &schema, Setting).await?;
    create_table(db, &schema, Faq).await?;
    create_table(db, &schema, Glossary).await?;

    create_table(db, &schema, LibraryDevice).await?;
    create_table(db, &schema, LibraryNetwork).await?;
    create_table(db, &schema, LibraryRun).await?;
    create_table(db, &schema, LibraryUser).await?;
    create_table(db, &schema, LibraryNote).await?;
    create_table(db, &schema, LibrarySystem).await?;
    create_table(db, &schema, UserGroup).await?;

    info!("Database tables ready");
    Ok(())
}
