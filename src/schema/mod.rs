//! Entity shapes: one static descriptor per persisted type, looked up by name.

mod descriptor;
mod registry;

pub use descriptor::*;
pub use registry::*;
