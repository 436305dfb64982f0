//! Safe SQL builder: identifiers from descriptors only, values as parameters.

mod builder;
pub mod order;
pub mod params;
pub use builder::*;
pub use order::{parse_order, OrderTerm};
pub use params::*;
