//! Core business logic - framework-agnostic resource managers.
//!
//! Every manager takes a `&DatabaseConnection` and returns [`crate::errors::Result`],
//! so the same functions back the HTTP handlers and the tests.

/// Device manager
pub mod device;
/// FAQ manager
pub mod faq;
/// Glossary manager
pub mod glossary;
/// Group manager and group membership
pub mod group;
/// Library manager
pub mod library;
/// Network manager; decodes the stored IP list
pub mod network;
/// Note manager
pub mod note;
/// List filtering, sorting and pagination
pub mod query;
/// Generic create/find/upsert/delete and library linking
pub mod resource;
/// Run manager
pub mod run;
/// Key/value settings
pub mod setting;
/// System manager
pub mod system;
/// User manager and password hashing
pub mod user;
/// Payload validation helpers
pub mod validate;
