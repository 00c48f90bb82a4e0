use serde::{Deserialize, Serialize};
use tidefront_protocol::{BuildingKindId, Coord, PlayerId, UnitKindId};

use crate::catalog::Catalog;

/// A building placed on the map. Its position is its identity: the map keys
/// buildings by position and two buildings never share one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Building {
    pub kind: BuildingKindId,
    pub owner: Option<PlayerId>,
    pub position: Coord,
}

impl Building {
    pub fn neutral(kind: BuildingKindId, position: Coord) -> Self {
        Self {
            kind,
            owner: None,
            position,
        }
    }

    pub fn owned(kind: BuildingKindId, position: Coord, owner: PlayerId) -> Self {
        Self {
            kind,
            owner: Some(owner),
            position,
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.owner.is_none()
    }

    /// The unit kinds this building can currently produce for `player`:
    /// the kind's production list when owned by that player, nothing
    /// otherwise.
    pub fn buildable_units<'a>(&self, catalog: &'a Catalog, player: PlayerId) -> &'a [UnitKindId] {
        if self.owner == Some(player) {
            &catalog.building_kind(self.kind).units
        } else {
            &[]
        }
    }
}
