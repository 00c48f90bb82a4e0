use crate::catalog::Catalog;
use crate::unit::Unit;

/// Whether a unit is low enough on consumables to want a resupply: fuel at or
/// below a third of its tank, or ammo exhausted on a kind that carries ammo.
pub fn needs_supply(unit: &Unit, catalog: &Catalog) -> bool {
    let kind = catalog.unit_kind(unit.kind);
    if kind.fuel > 0 && unit.fuel * 3 <= kind.fuel {
        return true;
    }
    matches!((unit.ammo, kind.ammo), (Some(0), Some(capacity)) if capacity > 0)
}
