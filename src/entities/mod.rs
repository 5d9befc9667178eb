//! Entity module - Contains all SeaORM entity definitions for the database.
//! Resource tables carry their own data; the `library_*` tables and
//! `user_groups` are pure association tables with composite primary keys.

pub mod device;
pub mod faq;
pub mod glossary;
pub mod group;
pub mod library;
pub mod library_device;
pub mod library_network;
pub mod library_note;
pub mod library_run;
pub mod library_system;
pub mod library_user;
pub mod network;
pub mod note;
pub mod run;
pub mod setting;
pub mod system;
pub mod user;
pub mod user_group;

// Re-export specific types to avoid conflicts
pub use device::{Column as DeviceColumn, Entity as Device, Model as DeviceModel};
pub use faq::{Column as FaqColumn, Entity as Faq, Model as FaqModel};
pub use glossary::{Column as GlossaryColumn, Entity as Glossary, Model as GlossaryModel};
pub use group::{Column as GroupColumn, Entity as Group, Model as GroupModel};
pub use library::{Column as LibraryColumn, Entity as Library, Model as LibraryModel};
pub use library_device::Entity as LibraryDevice;
pub use library_network::Entity as LibraryNetwork;
pub use library_note::Entity as LibraryNote;
pub use library_run::Entity as LibraryRun;
pub use library_system::Entity as LibrarySystem;
pub use library_user::Entity as LibraryUser;
pub use network::{Column as NetworkColumn, Entity as Network, Model as NetworkModel};
pub use note::{Column as NoteColumn, Entity as Note, Model as NoteModel};
pub use run::{Column as RunColumn, Entity as Run, Model as RunModel};
pub use setting::{Column as SettingColumn, Entity as Setting, Model as SettingModel};
pub use system::{Column as SystemColumn, Entity as System, Model as SystemModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
pub use user_group::{Column as UserGroupColumn, Entity as UserGroup, Model as UserGroupModel};
