/// Database connection and table creation
pub mod database;

/// Server and database settings loaded from `config.toml` and the environment
pub mod settings;
