//! Binds each REST collection to its manager in [`crate::core`].
//!
//! [`ResourceApi`] is what the generic handlers call. Collections that can be
//! nested under `/libraries/:id` also implement [`ScopedApi`].

use crate::{
    core::{
        device::{self, DevicePayload},
        faq::{self, FaqPayload},
        glossary::{self, GlossaryPayload},
        group::{self, GroupPayload},
        library::{self, LibraryPayload},
        network::{self, NetworkPayload, NetworkRecord},
        note::{self, NotePayload},
        query::ListFilter,
        resource::Upserted,
        run::{self, RunPayload},
        setting::{self, SettingPayload},
        system::{self, SystemPayload},
        user::{self, UserPayload},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use serde::{Serialize, de::DeserializeOwned};
use std::{fmt::Display, future::Future};

/// A collection served at `/<name>`.
pub trait ResourceApi: Send + Sync + 'static {
    /// Singular name used in not-found messages
    const LABEL: &'static str;
    /// Path parameter identifying one row
    type Key: DeserializeOwned + Display + Send + Sync + 'static;
    type Payload: DeserializeOwned + Send + 'static;
    type Row: Serialize + Send + 'static;

    fn create(
        db: &DatabaseConnection,
        payload: Self::Payload,
    ) -> impl Future<Output = Result<Self::Row>> + Send;

    fn list(
        db: &DatabaseConnection,
        filter: &ListFilter,
    ) -> impl Future<Output = Result<Vec<Self::Row>>> + Send;

    fn get(
        db: &DatabaseConnection,
        key: Self::Key,
    ) -> impl Future<Output = Result<Option<Self::Row>>> + Send;

    fn put(
        db: &DatabaseConnection,
        key: Self::Key,
        payload: Self::Payload,
    ) -> impl Future<Output = Result<Upserted<Self::Row>>> + Send;

    fn remove(db: &DatabaseConnection, key: Self::Key) -> impl Future<Output = Result<u64>> + Send;
}

/// A collection that can also be served at `/libraries/:id/<name>`.
pub trait ScopedApi: ResourceApi<Key = i64> {
    fn create_in(
        db: &DatabaseConnection,
        payload: Self::Payload,
        library_id: i64,
    ) -> impl Future<Output = Result<Self::Row>> + Send;

    fn get_in(
        db: &DatabaseConnection,
        id: i64,
        library_id: i64,
    ) -> impl Future<Output = Result<Option<Self::Row>>> + Send;

    fn link(db: &DatabaseConnection, library_id: i64, id: i64) -> impl Future<Output = Result<()>> + Send;

    fn unlink(db: &DatabaseConnection, library_id: i64, id: i64) -> impl Future<Output = Result<u64>> + Send;
}

/// `/libraries`
pub struct Libraries;
/// `/devices`
pub struct Devices;
/// `/networks`
pub struct Networks;
/// `/runs`
pub struct Runs;
/// `/users`
pub struct Users;
/// `/groups`
pub struct Groups;
/// `/notes`
pub struct Notes;
/// `/systems`
pub struct Systems;
/// `/faqs`
pub struct Faqs;
/// `/glossaries`
pub struct Glossaries;
/// `/settings`
pub struct Settings;

/// Implements [`ResourceApi`] for a collection whose manager has no library scope.
macro_rules! top_level_api {
    ($api:ty, $module:ident, $label:literal, $payload:ty, $row:ty) => {
        impl ResourceApi for $api {
            const LABEL: &'static str = $label;
            type Key = i64;
            type Payload = $payload;
            type Row = $row;

            async fn create(db: &DatabaseConnection, payload: $payload) -> Result<$row> {
                $module::create(db, payload).await
            }

            async fn list(db: &DatabaseConnection, filter: &ListFilter) -> Result<Vec<$row>> {
                $module::find(db, filter).await
            }

            async fn get(db: &DatabaseConnection, id: i64) -> Result<Option<$row>> {
                $module::find_by_id(db, id).await
            }

            async fn put(db: &DatabaseConnection, id: i64, payload: $payload) -> Result<Upserted<$row>> {
                $module::upsert(db, id, payload).await
            }

            async fn remove(db: &DatabaseConnection, id: i64) -> Result<u64> {
                $module::delete(db, id).await
            }
        }
    };
}

/// Implements [`ResourceApi`] and [`ScopedApi`] for a library-scoped collection.
macro_rules! scoped_api {
    ($api:ty, $module:ident, $label:literal, $payload:ty, $row:ty) => {
        impl ResourceApi for $api {
            const LABEL: &'static str = $label;
            type Key = i64;
            type Payload = $payload;
            type Row = $row;

            async fn create(db: &DatabaseConnection, payload: $payload) -> Result<$row> {
                $module::create(db, payload, None).await
            }

            async fn list(db: &DatabaseConnection, filter: &ListFilter) -> Result<Vec<$row>> {
                $module::find(db, filter).await
            }

            async fn get(db: &DatabaseConnection, id: i64) -> Result<Option<$row>> {
                $module::find_by_id(db, id, None).await
            }

            async fn put(db: &DatabaseConnection, id: i64, payload: $payload) -> Result<Upserted<$row>> {
                $module::upsert(db, id, payload).await
            }

            async fn remove(db: &DatabaseConnection, id: i64) -> Result<u64> {
                $module::delete(db, id).await
            }
        }

        impl ScopedApi for $api {
            async fn create_in(db: &DatabaseConnection, payload: $payload, library_id: i64) -> Result<$row> {
                $module::create(db, payload, Some(library_id)).await
            }

            async fn get_in(db: &DatabaseConnection, id: i64, library_id: i64) -> Result<Option<$row>> {
                $module::find_by_id(db, id, Some(library_id)).await
            }

            async fn link(db: &DatabaseConnection, library_id: i64, id: i64) -> Result<()> {
                $module::add_to_library(db, library_id, id).await
            }

            async fn unlink(db: &DatabaseConnection, library_id: i64, id: i64) -> Result<u64> {
                $module::remove_from_library(db, library_id, id).await
            }
        }
    };
}

top_level_api!(Libraries, library, "library", LibraryPayload, entities::library::Model);
top_level_api!(Groups, group, "group", GroupPayload, entities::group::Model);
top_level_api!(Faqs, faq, "faq", FaqPayload, entities::faq::Model);
top_level_api!(Glossaries, glossary, "glossary", GlossaryPayload, entities::glossary::Model);

scoped_api!(Devices, device, "device", DevicePayload, entities::device::Model);
scoped_api!(Networks, network, "network", NetworkPayload, NetworkRecord);
scoped_api!(Runs, run, "run", RunPayload, entities::run::Model);
scoped_api!(Users, user, "user", UserPayload, entities::user::Model);
scoped_api!(Notes, note, "note", NotePayload, entities::note::Model);
scoped_api!(Systems, system, "system", SystemPayload, entities::system::Model);

impl ResourceApi for Settings {
    const LABEL: &'static str = "setting";
    type Key = String;
    type Payload = SettingPayload;
    type Row = entities::setting::Model;

    async fn create(db: &DatabaseConnection, payload: SettingPayload) -> Result<Self::Row> {
        setting::create(db, payload).await
    }

    async fn list(db: &DatabaseConnection, filter: &ListFilter) -> Result<Vec<Self::Row>> {
        setting::find(db, filter).await
    }

    async fn get(db: &DatabaseConnection, key: String) -> Result<Option<Self::Row>> {
        setting::find_by_key(db, &key).await
    }

    async fn put(db: &DatabaseConnection, key: String, payload: SettingPayload) -> Result<Upserted<Self::Row>> {
        setting::upsert(db, &key, payload.value).await
    }

    async fn remove(db: &DatabaseConnection, key: String) -> Result<u64> {
        setting::delete(db, &key).await
    }
}
