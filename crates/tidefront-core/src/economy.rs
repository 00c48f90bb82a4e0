use tidefront_protocol::PlayerId;

use crate::catalog::Catalog;
use crate::map::MatchMap;
use crate::unit::{Unit, MAX_HEALTH};

/// Smallest meaningful per-round income step. Used as the income unit when
/// sizing capture pressure against the whole map's economy.
pub const MIN_FUNDS: i32 = 100;

/// The player's currently available funds.
pub fn current_funds(map: &MatchMap, player: PlayerId) -> i32 {
    map.player(player).map(|p| p.funds).unwrap_or(0)
}

/// The theoretical per-round income of the whole map: the income of every
/// funds-producing building, regardless of owner.
pub fn total_possible_funds(map: &MatchMap, catalog: &Catalog) -> i32 {
    map.buildings()
        .map(|building| catalog.building_kind(building.kind).funds)
        .sum()
}

/// Cost of healing `unit` back to full: its kind's cost scaled by missing
/// health.
pub fn heal_cost(unit: &Unit, catalog: &Catalog) -> i32 {
    let kind = catalog.unit_kind(unit.kind);
    let missing = (MAX_HEALTH - unit.health).clamp(0, MAX_HEALTH);
    kind.cost * missing / MAX_HEALTH
}
