//! Entity services: validation in front of the generic repository.

mod crud;
mod validation;
pub use crud::EntityService;
pub use validation::RequestValidator;
