use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// Data IDs are the string keys used in YAML catalog files (human-readable,
/// stable across versions).
pub type DataId = String;

/// Runtime IDs are integers assigned at catalog-load (fast, deterministic).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuntimeId<T> {
    pub raw: u16,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T> RuntimeId<T> {
    #[inline]
    pub const fn new(raw: u16) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }
}

// Type-safe runtime IDs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitKindTag;
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildingKindTag;
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TerrainTag;

pub type UnitKindId = RuntimeId<UnitKindTag>;
pub type BuildingKindId = RuntimeId<BuildingKindTag>;
pub type TerrainId = RuntimeId<TerrainTag>;

/// Player ID is a simple index (max 16 players per match).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);
