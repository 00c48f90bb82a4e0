//! Shared identity and coordinate types for Tidefront.
//!
//! Everything here is a plain value type: catalog entries and match state
//! live in `tidefront-core`, this crate only defines how they are addressed.

mod coord;
mod ids;

pub use crate::coord::Coord;
pub use crate::ids::{
    BuildingKindId, BuildingKindTag, DataId, PlayerId, RuntimeId, TerrainId, TerrainTag,
    UnitKindId, UnitKindTag,
};
