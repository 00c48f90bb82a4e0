use serde::{Deserialize, Serialize};
use tidefront_protocol::{Coord, PlayerId, UnitKindId};

use crate::catalog::Catalog;

/// Upper bound of a unit's health. Health is always within `[0, MAX_HEALTH]`.
pub const MAX_HEALTH: i32 = 100;

/// A produced unit's current state. Owned by the match; the decision core
/// only reads it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Unit {
    pub kind: UnitKindId,
    pub owner: PlayerId,
    pub position: Coord,
    pub health: i32,
    pub fuel: i32,
    pub ammo: Option<i32>,
}

impl Unit {
    /// A freshly produced unit: full health, full fuel, full ammo.
    pub fn new(kind: UnitKindId, owner: PlayerId, position: Coord, catalog: &Catalog) -> Self {
        let info = catalog.unit_kind(kind);
        Self {
            kind,
            owner,
            position,
            health: MAX_HEALTH,
            fuel: info.fuel,
            ammo: info.ammo,
        }
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health.clamp(0, MAX_HEALTH);
        self
    }

    pub fn with_fuel(mut self, fuel: i32) -> Self {
        self.fuel = fuel.max(0);
        self
    }
}
