//! Server map payloads.
//!
//! A map is the world-content half of a resource: static object placements
//! plus vehicle and pickup spawns, authored on the server and streamed to the
//! peer as a single buffered transfer. The transfer coordinator decodes the
//! accumulated payload with [`ServerMap::from_bytes`] once the final chunk
//! arrives and hands the result to the world registry collaborator.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A fixed world position and orientation, in game-world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
}

/// A static prop placed by the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    /// Model hash the game resolves to an asset
    pub model: i32,
    pub placement: Placement,
}

/// A vehicle spawned when the map loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSpawn {
    pub model: i32,
    pub placement: Placement,
    /// Primary/secondary color indices
    pub colors: (u8, u8),
}

/// A pickup placed by the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupSpawn {
    pub pickup_type: i32,
    pub amount: i32,
    pub placement: Placement,
}

/// World content registered with the game when a `Map` transfer completes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServerMap {
    /// Display name, empty when the authoring resource did not set one
    pub name: String,
    pub objects: Vec<MapObject>,
    pub vehicles: Vec<VehicleSpawn>,
    pub pickups: Vec<PickupSpawn>,
}

impl ServerMap {
    /// Decode a map from the bytes accumulated by a `Map` transfer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Encode a map into the binary transfer format.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Total number of entities this map will introduce into the world.
    pub fn entity_count(&self) -> usize {
        self.objects.len() + self.vehicles.len() + self.pickups.len()
    }
}
