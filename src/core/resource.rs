//! Generic resource manager.
//!
//! Every entity with an integer id implements [`Resource`]; entities that can
//! be attached to libraries additionally implement [`LibraryScoped`]. The
//! functions here provide create/find/upsert/delete and library linking once,
//! and the per-entity modules wrap them with their own payload types.
//!
//! Multi-statement operations run inside a single database transaction. An
//! early return drops the transaction, which rolls it back.

use crate::{
    core::{query::ListFilter, validate::Validate},
    entities::Library,
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, JoinType, QueryFilter, QuerySelect, RelationDef, Select, TransactionTrait,
};
use serde::Serialize;
use std::str::FromStr;
use tracing::{debug, info, instrument};

/// Creation and modification times for a row being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamps {
    /// Kept across replacements
    pub created_at: DateTime<Utc>,
    /// Always the time of the write
    pub updated_at: DateTime<Utc>,
}

impl Timestamps {
    /// Both timestamps set to now.
    #[must_use]
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    /// Keeps `created_at`, refreshes `updated_at`.
    #[must_use]
    pub fn refreshed(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            updated_at: Utc::now(),
        }
    }
}

/// A table managed through the generic CRUD functions.
pub trait Resource: EntityTrait {
    /// Singular name used in errors and logs (e.g. `"device"`)
    const LABEL: &'static str;

    /// Input accepted by create and upsert
    type Payload: Validate + Send;

    /// Active model written by create and upsert
    type Active: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + Send;

    /// Primary key column, also the default sort column
    fn id_column() -> Self::Column;

    /// Column the `from`/`to` filters apply to
    fn created_at_column() -> Self::Column;

    fn created_at_of(model: &Self::Model) -> DateTime<Utc>;

    /// Builds the row to write. `id` is `None` when the database assigns it.
    fn active_model(payload: Self::Payload, id: Option<i64>, timestamps: Timestamps)
    -> Result<Self::Active>;
}

/// An association table between libraries and one resource type.
pub trait LibraryLink: EntityTrait {
    /// Active model for one association row
    type Active: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + Send;

    fn library_column() -> Self::Column;

    fn resource_column() -> Self::Column;

    fn link(library_id: i64, resource_id: i64) -> <Self as LibraryLink>::Active;
}

/// A resource that can be attached to libraries.
pub trait LibraryScoped: Resource {
    /// The `library_<entity>` association table
    type Link: LibraryLink;

    /// Join from the resource table to its association table
    fn link_relation() -> RelationDef;
}

/// Whether an upsert created a new row or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    /// No row had the requested id
    Created,
    /// An existing row was overwritten
    Replaced,
}

/// Result of an upsert: the written row and how it got there.
#[derive(Debug, Clone, PartialEq)]
pub struct Upserted<T> {
    /// How the row was written
    pub outcome: UpsertOutcome,
    /// The row as stored
    pub row: T,
}

impl<T> Upserted<T> {
    /// True when a row with the requested id existed before the call.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.outcome == UpsertOutcome::Replaced
    }

    /// Converts the row while keeping the outcome.
    pub fn try_map<U>(self, f: impl FnOnce(T) -> Result<U>) -> Result<Upserted<U>> {
        Ok(Upserted {
            outcome: self.outcome,
            row: f(self.row)?,
        })
    }
}

/// Base select with the creation-time bounds of `filter` applied.
pub fn filtered<E>(filter: &ListFilter) -> Select<E>
where
    E: Resource,
{
    let mut select = E::find();
    if let Some(from) = filter.from {
        select = select.filter(E::created_at_column().gt(from));
    }
    if let Some(to) = filter.to {
        select = select.filter(E::created_at_column().lt(to));
    }
    select
}

/// Like [`filtered`], plus the library join when `filter.library` is set.
pub fn scoped<E>(filter: &ListFilter) -> Select<E>
where
    E: LibraryScoped,
{
    let select = filtered::<E>(filter);
    match filter.library {
        Some(library_id) => in_library::<E>(select, library_id),
        None => select,
    }
}

fn in_library<E>(select: Select<E>, library_id: i64) -> Select<E>
where
    E: LibraryScoped,
{
    select
        .join(JoinType::InnerJoin, E::link_relation())
        .filter(E::Link::library_column().eq(library_id))
}

/// Lists rows of a resource that is not library-scoped.
pub async fn find<E>(db: &DatabaseConnection, filter: &ListFilter) -> Result<Vec<E::Model>>
where
    E: Resource,
    E::Column: FromStr,
{
    filter
        .paginate(filtered::<E>(filter), E::id_column())?
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists rows of a library-scoped resource, joined to `filter.library` if set.
pub async fn find_scoped<E>(db: &DatabaseConnection, filter: &ListFilter) -> Result<Vec<E::Model>>
where
    E: LibraryScoped,
    E::Column: FromStr,
{
    filter
        .paginate(scoped::<E>(filter), E::id_column())?
        .all(db)
        .await
        .map_err(Into::into)
}

pub async fn find_by_id<E>(db: &DatabaseConnection, id: i64) -> Result<Option<E::Model>>
where
    E: Resource,
{
    E::find()
        .filter(E::id_column().eq(id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Looks a row up by id, optionally requiring it to be linked to a library.
pub async fn find_by_id_in_library<E>(
    db: &DatabaseConnection,
    id: i64,
    library_id: Option<i64>,
) -> Result<Option<E::Model>>
where
    E: LibraryScoped,
{
    let select = E::find().filter(E::id_column().eq(id));
    let select = match library_id {
        Some(library_id) => in_library::<E>(select, library_id),
        None => select,
    };
    select.one(db).await.map_err(Into::into)
}

/// Validates and inserts a row of a resource that is not library-scoped.
#[instrument(skip(db, payload), fields(entity = E::LABEL))]
pub async fn create<E>(db: &DatabaseConnection, payload: E::Payload) -> Result<E::Model>
where
    E: Resource,
    E::Model: IntoActiveModel<E::Active>,
{
    payload.validate()?;
    let row = E::active_model(payload, None, Timestamps::now())?
        .insert(db)
        .await
        .map_err(Error::write(E::LABEL, "create"))?;
    info!("Created {}", E::LABEL);
    Ok(row)
}

/// Validates and inserts a row, linking it to `library_id` in the same transaction.
///
/// A missing library fails with `NotFound` and leaves nothing behind.
#[instrument(skip(db, payload), fields(entity = E::LABEL))]
pub async fn create_in_library<E>(
    db: &DatabaseConnection,
    payload: E::Payload,
    library_id: Option<i64>,
) -> Result<E::Model>
where
    E: LibraryScoped,
    E::Model: IntoActiveModel<E::Active>,
{
    payload.validate()?;
    let active = E::active_model(payload, None, Timestamps::now())?;

    let txn = db.begin().await?;

    if let Some(library_id) = library_id {
        Library::find_by_id(library_id)
            .one(&txn)
            .await?
            .ok_or_else(|| Error::not_found("library", library_id))?;
    }

    let row = active
        .insert(&txn)
        .await
        .map_err(Error::write(E::LABEL, "create"))?;

    if let Some(library_id) = library_id {
        let id = row_id::<E>(&row)?;
        E::Link::insert(E::Link::link(library_id, id))
            .exec(&txn)
            .await
            .map_err(Error::write(E::LABEL, "link"))?;
        debug!(library_id, id, "Linked new {} to library", E::LABEL);
    }

    txn.commit().await?;
    info!("Created {}", E::LABEL);
    Ok(row)
}

/// Creates the row with the given id, or replaces the row that already has it.
///
/// Replacement keeps the id, `created_at` and every association row, and
/// refreshes `updated_at`. The existence check and the write share one
/// transaction.
#[instrument(skip(db, payload), fields(entity = E::LABEL))]
pub async fn upsert<E>(
    db: &DatabaseConnection,
    id: i64,
    payload: E::Payload,
) -> Result<Upserted<E::Model>>
where
    E: Resource,
    E::Model: IntoActiveModel<E::Active>,
{
    payload.validate()?;

    let txn = db.begin().await?;
    let existing = E::find()
        .filter(E::id_column().eq(id))
        .one(&txn)
        .await?;

    let (outcome, row) = match existing {
        Some(current) => {
            let timestamps = Timestamps::refreshed(E::created_at_of(&current));
            let row = E::active_model(payload, Some(id), timestamps)?
                .update(&txn)
                .await
                .map_err(Error::write(E::LABEL, "update"))?;
            (UpsertOutcome::Replaced, row)
        }
        None => {
            let row = E::active_model(payload, Some(id), Timestamps::now())?
                .insert(&txn)
                .await
                .map_err(Error::write(E::LABEL, "create"))?;
            (UpsertOutcome::Created, row)
        }
    };

    txn.commit().await?;
    info!(id, ?outcome, "Upserted {}", E::LABEL);
    Ok(Upserted { outcome, row })
}

/// Deletes a row by id, returning the number of rows removed.
///
/// Association rows are removed by the cascading foreign keys.
#[instrument(skip(db), fields(entity = E::LABEL))]
pub async fn delete<E>(db: &DatabaseConnection, id: i64) -> Result<u64>
where
    E: Resource,
{
    let result = E::delete_many()
        .filter(E::id_column().eq(id))
        .exec(db)
        .await?;
    debug!(id, rows = result.rows_affected, "Deleted {}", E::LABEL);
    Ok(result.rows_affected)
}

/// Links an existing row to an existing library. Linking twice is a no-op.
#[instrument(skip(db), fields(entity = E::LABEL))]
pub async fn add_to_library<E>(db: &DatabaseConnection, library_id: i64, id: i64) -> Result<()>
where
    E: LibraryScoped,
{
    let txn = db.begin().await?;
    ensure_pair_exists::<E, _>(&txn, library_id, id).await?;

    let linked = E::Link::find()
        .filter(E::Link::library_column().eq(library_id))
        .filter(E::Link::resource_column().eq(id))
        .one(&txn)
        .await?
        .is_some();

    if !linked {
        E::Link::insert(E::Link::link(library_id, id))
            .exec(&txn)
            .await
            .map_err(Error::write(E::LABEL, "link"))?;
    }

    txn.commit().await?;
    debug!(library_id, id, already_linked = linked, "Linked {} to library", E::LABEL);
    Ok(())
}

/// Unlinks a row from a library, returning the number of links removed.
///
/// Both sides must exist; an absent link removes nothing and returns 0.
#[instrument(skip(db), fields(entity = E::LABEL))]
pub async fn remove_from_library<E>(db: &DatabaseConnection, library_id: i64, id: i64) -> Result<u64>
where
    E: LibraryScoped,
{
    let txn = db.begin().await?;
    ensure_pair_exists::<E, _>(&txn, library_id, id).await?;

    let result = E::Link::delete_many()
        .filter(E::Link::library_column().eq(library_id))
        .filter(E::Link::resource_column().eq(id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    debug!(library_id, id, rows = result.rows_affected, "Unlinked {} from library", E::LABEL);
    Ok(result.rows_affected)
}

async fn ensure_pair_exists<E, C>(conn: &C, library_id: i64, id: i64) -> Result<()>
where
    E: LibraryScoped,
    C: sea_orm::ConnectionTrait,
{
    Library::find_by_id(library_id)
        .one(conn)
        .await?
        .ok_or_else(|| Error::not_found("library", library_id))?;
    E::find()
        .filter(E::id_column().eq(id))
        .one(conn)
        .await?
        .ok_or_else(|| Error::not_found(E::LABEL, id))?;
    Ok(())
}

/// Reads the integer primary key back out of a freshly written row.
fn row_id<E>(row: &E::Model) -> Result<i64>
where
    E: Resource,
{
    use sea_orm::ModelTrait;

    match row.get(E::id_column()) {
        sea_orm::Value::BigInt(Some(id)) => Ok(id),
        sea_orm::Value::Int(Some(id)) => Ok(i64::from(id)),
        other => Err(Error::Database(sea_orm::DbErr::Custom(format!(
            "unexpected {} id value {other:?}",
            E::LABEL
        )))),
    }
}
