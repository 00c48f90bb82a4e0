use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tidefront_protocol::{BuildingKindId, DataId, TerrainId, UnitKindId};

/// Broad movement/targeting category of a unit kind. Healers and suppliers
/// declare which classes they can target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitClass {
    Infantry,
    Ground,
    Naval,
    Air,
}

/// Fixed capability tags a unit kind may carry. The set is closed;
/// membership tests replace any dynamic ability lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    Capture,
    Heal,
    CreateBuildings,
    Supply,
}

/// The compiled static game data: unit, building, and terrain catalogs plus
/// the data-id lookup tables assigned at load.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub terrains: Vec<TerrainKind>,
    pub unit_kinds: Vec<UnitKind>,
    pub building_kinds: Vec<BuildingKind>,

    pub terrain_ids: HashMap<DataId, TerrainId>,
    pub unit_kind_ids: HashMap<DataId, UnitKindId>,
    pub building_kind_ids: HashMap<DataId, BuildingKindId>,
}

impl Catalog {
    pub fn terrain(&self, id: TerrainId) -> &TerrainKind {
        &self.terrains[id.raw as usize]
    }

    pub fn unit_kind(&self, id: UnitKindId) -> &UnitKind {
        &self.unit_kinds[id.raw as usize]
    }

    pub fn building_kind(&self, id: BuildingKindId) -> &BuildingKind {
        &self.building_kinds[id.raw as usize]
    }

    pub fn terrain_id(&self, data_id: &str) -> Option<TerrainId> {
        self.terrain_ids.get(data_id).copied()
    }

    pub fn unit_kind_id(&self, data_id: &str) -> Option<UnitKindId> {
        self.unit_kind_ids.get(data_id).copied()
    }

    pub fn building_kind_id(&self, data_id: &str) -> Option<BuildingKindId> {
        self.building_kind_ids.get(data_id).copied()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawUnitKind {
    pub name: String,
    pub class: UnitClass,
    pub cost: i32,
    #[serde(default)]
    pub abilities: Vec<Ability>,
    #[serde(default)]
    pub heal_types: Option<Vec<UnitClass>>,
    #[serde(default)]
    pub supply_types: Option<Vec<UnitClass>>,
    #[serde(default)]
    pub transport_capacity: u8,
    #[serde(default = "default_fuel")]
    pub fuel: i32,
    #[serde(default)]
    pub ammo: Option<i32>,
}

fn default_fuel() -> i32 {
    40
}

impl RawUnitKind {
    pub fn compile(self) -> UnitKind {
        UnitKind {
            name: self.name,
            class: self.class,
            cost: self.cost.max(0),
            abilities: self.abilities,
            heal_types: self.heal_types,
            supply_types: self.supply_types,
            transport_capacity: self.transport_capacity,
            fuel: self.fuel.max(0),
            ammo: self.ammo.map(|a| a.max(0)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UnitKind {
    pub name: String,
    pub class: UnitClass,
    pub cost: i32,
    pub abilities: Vec<Ability>,
    pub heal_types: Option<Vec<UnitClass>>,
    pub supply_types: Option<Vec<UnitClass>>,
    pub transport_capacity: u8,
    pub fuel: i32,
    pub ammo: Option<i32>,
}

impl UnitKind {
    pub fn has_ability(&self, ability: Ability) -> bool {
        self.abilities.contains(&ability)
    }

    pub fn can_transport_units(&self) -> bool {
        self.transport_capacity > 0
    }

    pub fn heals_class(&self, class: UnitClass) -> bool {
        self.heal_types
            .as_ref()
            .is_some_and(|types| types.contains(&class))
    }

    pub fn supplies_class(&self, class: UnitClass) -> bool {
        self.supply_types
            .as_ref()
            .is_some_and(|types| types.contains(&class))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawBuildingKind {
    pub name: String,
    /// Structures are map infrastructure: never capturable, never counted as
    /// expansion targets.
    #[serde(default)]
    pub is_structure: bool,
    /// Funds income per round while owned.
    #[serde(default)]
    pub funds: i32,
    /// Data ids of the unit kinds this building can produce.
    #[serde(default)]
    pub units: Vec<String>,
}

impl RawBuildingKind {
    pub fn compile(
        self,
        unit_kind_ids: &HashMap<DataId, UnitKindId>,
    ) -> Result<BuildingKind, crate::catalog::CatalogError> {
        let units = self
            .units
            .into_iter()
            .map(|id| {
                unit_kind_ids
                    .get(&id)
                    .copied()
                    .ok_or(crate::catalog::CatalogError::MissingId(id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BuildingKind {
            name: self.name,
            is_structure: self.is_structure,
            funds: self.funds.max(0),
            units,
        })
    }
}

#[derive(Clone, Debug)]
pub struct BuildingKind {
    pub name: String,
    pub is_structure: bool,
    pub funds: i32,
    pub units: Vec<UnitKindId>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawTerrainKind {
    pub name: String,
    /// Whether new buildings may be constructed on this terrain.
    #[serde(default)]
    pub buildable: bool,
}

impl RawTerrainKind {
    pub fn compile(self) -> TerrainKind {
        TerrainKind {
            name: self.name,
            buildable: self.buildable,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TerrainKind {
    pub name: String,
    pub buildable: bool,
}
