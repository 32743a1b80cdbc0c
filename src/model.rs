//! Wire types for zones, couriers, and the queries that page or search them.

pub mod courier;
pub mod geo;
pub mod page;
pub mod zone;

pub use courier::*;
pub use geo::*;
pub use page::*;
pub use zone::*;
