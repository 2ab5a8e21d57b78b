//! All entity descriptors known to the application, keyed by entity name.

use crate::domain::{Entity, Owner, Pet, PetType, Specialty, Vet, Visit};
use crate::error::ConfigError;
use crate::schema::EntityDescriptor;

pub fn descriptors() -> [&'static EntityDescriptor; 6] {
    [
        Owner::DESCRIPTOR,
        Pet::DESCRIPTOR,
        PetType::DESCRIPTOR,
        Specialty::DESCRIPTOR,
        Vet::DESCRIPTOR,
        Visit::DESCRIPTOR,
    ]
}

/// Look up a descriptor by entity name. An unknown name is a setup defect.
pub fn descriptor_for(name: &str) -> Result<&'static EntityDescriptor, ConfigError> {
    descriptors()
        .into_iter()
        .find(|d| d.name == name)
        .ok_or_else(|| ConfigError::UnknownEntity(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_and_tables_are_unique() {
        let names: HashSet<_> = descriptors().iter().map(|d| d.name).collect();
        let tables: HashSet<_> = descriptors().iter().map(|d| d.table).collect();
        assert_eq!(names.len(), 6);
        assert_eq!(tables.len(), 6);
    }

    #[test]
    fn every_descriptor_starts_with_bigint_id() {
        for d in descriptors() {
            assert_eq!(d.id_column().name, "id", "{}", d.name);
            assert_eq!(d.id_column().ty, crate::schema::ColumnType::BigInt);
        }
    }

    #[test]
    fn unknown_entity_is_config_error() {
        assert_eq!(descriptor_for("types").unwrap().table, "types");
        assert!(matches!(descriptor_for("cats"), Err(ConfigError::UnknownEntity(n)) if n == "cats"));
    }
}
