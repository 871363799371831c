//! # Server-Authored Content
//!
//! Binary formats for content a server ships to its peers.
//!
//! ## Components
//! - **Map**: world placement data delivered as one buffered transfer and
//!   decoded at completion
//!
//! ## Wire Format
//! Maps travel as bincode-encoded [`map::ServerMap`] values. The encoding is
//! produced and consumed by the same crate version on both ends of the
//! connection, so no format byte or version negotiation is carried.

pub mod map;

pub use map::{MapObject, PickupSpawn, ServerMap, VehicleSpawn};
