//! Region intelligence subsystem for Rokto.
//!
//! Provides the static division → district → upazila hierarchy,
//! free-text name-hint matching, and a nearest-neighbor fallback for
//! callers that only have coordinates.

pub mod resolver;
pub mod store;
pub mod types;

pub use resolver::RegionResolver;
pub use store::{RegionStore, StoreStats};
pub use types::{AddressHints, District, Division, RegionError, RegionId, Resolution, Upazila};
