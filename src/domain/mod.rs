//! Persisted clinic entities and the trait binding each one to its table shape.

mod owners;
mod pets;
mod specialties;
mod types;
mod vets;
mod visits;

pub use owners::Owner;
pub use pets::Pet;
pub use specialties::Specialty;
pub use types::PetType;
pub use vets::Vet;
pub use visits::Visit;

use crate::db::{Record, RowReader};
use crate::error::AppError;
use crate::schema::EntityDescriptor;
use crate::sql::SqlValue;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record type persisted by the generic repository.
///
/// `from_row` and `values` must follow `DESCRIPTOR.columns` order; the row
/// reader enforces it on every read.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    const DESCRIPTOR: &'static EntityDescriptor;

    /// `None` until the database has assigned one.
    fn id(&self) -> Option<i64>;

    fn from_row(row: &mut RowReader<'_>) -> Result<Self, AppError>;

    /// Values of the non-id columns, in descriptor order.
    fn values(&self) -> Vec<SqlValue>;

    /// Same persisted row: both ids present and equal. Unsaved entities are never the same.
    fn same_identity(&self, other: &Self) -> bool {
        matches!((self.id(), other.id()), (Some(a), Some(b)) if a == b)
    }
}

/// Map one record to an entity, requiring every projected column to be consumed.
pub fn map_row<E: Entity>(record: &Record) -> Result<E, AppError> {
    let mut reader = RowReader::new(record, E::DESCRIPTOR)?;
    let entity = E::from_row(&mut reader)?;
    reader.finish()?;
    Ok(entity)
}
