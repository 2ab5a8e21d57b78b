//! Safe SQL builder: identifiers from entity descriptors only, values as parameters.

mod builder;
mod page;
pub mod params;
mod projection;
pub use builder::*;
pub use page::*;
pub use params::*;
pub use projection::*;
