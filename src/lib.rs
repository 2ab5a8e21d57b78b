//! Pet clinic REST backend over one generic PostgreSQL entity engine.

pub mod case;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod repository;
pub mod response;
pub mod routes;
pub mod schema;
pub mod search;
pub mod service;
pub mod sql;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Settings;
pub use db::{DatabaseClient, PgClient, RowStream};
pub use domain::{Entity, Owner, Pet, PetType, Specialty, Vet, Visit};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use repository::{EntityRepository, EntityStream};
pub use routes::{common_routes_with_ready, entity_routes, API_PREFIX};
pub use search::{SearchIndex, UnindexedSearch};
pub use service::EntityService;
pub use state::AppState;
