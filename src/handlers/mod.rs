//! REST handlers, generic over the entity type.

pub mod entity;
