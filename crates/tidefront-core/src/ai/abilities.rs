use std::collections::BTreeSet;

use tidefront_protocol::PlayerId;

use crate::building::Building;
use crate::catalog::{Ability, Catalog, UnitKind};

/// Which production capabilities are reachable this turn. Recomputed per
/// decision, never persisted. Flags are monotone OR-accumulations, so the
/// result is independent of visitation order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PotentialUnitAbilities {
    pub can_create_build_units: bool,
    pub can_create_capture_units: bool,
    pub can_create_healing_units: bool,
    pub can_create_supply_units: bool,
    pub can_create_transport_units: bool,
}

impl PotentialUnitAbilities {
    /// The permissive default used when a caller has not pre-computed
    /// restrictions.
    pub const fn all() -> Self {
        Self {
            can_create_build_units: true,
            can_create_capture_units: true,
            can_create_healing_units: true,
            can_create_supply_units: true,
            can_create_transport_units: true,
        }
    }

    fn is_complete(&self) -> bool {
        self.can_create_build_units
            && self.can_create_capture_units
            && self.can_create_healing_units
            && self.can_create_supply_units
            && self.can_create_transport_units
    }
}

/// Aggregates the capability flags over a set of unit kinds. Empty input
/// yields all-false. Visitation stops early once every flag is set; the
/// result is identical with or without the short-circuit.
pub fn possible_unit_abilities<'a>(
    kinds: impl IntoIterator<Item = &'a UnitKind>,
) -> PotentialUnitAbilities {
    let mut abilities = PotentialUnitAbilities::default();

    for kind in kinds {
        if kind.has_ability(Ability::Capture) {
            abilities.can_create_capture_units = true;
        }
        if kind.has_ability(Ability::Heal) {
            abilities.can_create_healing_units = true;
        }
        if kind.has_ability(Ability::CreateBuildings) {
            abilities.can_create_build_units = true;
        }
        if kind.has_ability(Ability::Supply) {
            abilities.can_create_supply_units = true;
        }
        if kind.can_transport_units() {
            abilities.can_create_transport_units = true;
        }

        if abilities.is_complete() {
            break;
        }
    }

    abilities
}

/// Aggregates over every unit kind the given buildings can currently produce
/// for `player`. Buildings are deduplicated by identity (position); later
/// duplicates are discarded so a building's production list is never counted
/// twice.
pub fn possible_unit_abilities_for_buildings<'a>(
    buildings: impl IntoIterator<Item = &'a Building>,
    player: PlayerId,
    catalog: &Catalog,
) -> PotentialUnitAbilities {
    let mut seen = BTreeSet::new();
    let mut kinds = Vec::new();
    for building in buildings {
        if !seen.insert(building.position) {
            continue;
        }
        for &kind_id in building.buildable_units(catalog, player) {
            kinds.push(catalog.unit_kind(kind_id));
        }
    }
    possible_unit_abilities(kinds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{load_catalog, CatalogSource};
    use tidefront_protocol::Coord;

    fn catalog() -> Catalog {
        load_catalog(CatalogSource::Embedded).expect("catalog load")
    }

    fn kinds_by_name<'a>(catalog: &'a Catalog, names: &[&str]) -> Vec<&'a UnitKind> {
        names
            .iter()
            .map(|name| catalog.unit_kind(catalog.unit_kind_id(name).expect("known unit")))
            .collect()
    }

    #[test]
    fn empty_input_yields_no_capabilities() {
        assert_eq!(
            possible_unit_abilities(Vec::<&UnitKind>::new()),
            PotentialUnitAbilities::default()
        );
    }

    #[test]
    fn result_is_independent_of_visitation_order() {
        let catalog = catalog();
        let forward = kinds_by_name(&catalog, &["medic", "rifleman", "engineer", "tank"]);
        let mut backward = forward.clone();
        backward.reverse();

        assert_eq!(
            possible_unit_abilities(forward),
            possible_unit_abilities(backward)
        );
    }

    #[test]
    fn adding_kinds_never_clears_a_flag() {
        let catalog = catalog();
        let base = possible_unit_abilities(kinds_by_name(&catalog, &["medic", "rifleman"]));
        let extended = possible_unit_abilities(kinds_by_name(
            &catalog,
            &["medic", "rifleman", "engineer", "supply_truck", "tank"],
        ));

        assert!(!base.can_create_build_units && extended.can_create_build_units);
        assert!(base.can_create_capture_units && extended.can_create_capture_units);
        assert!(base.can_create_healing_units && extended.can_create_healing_units);
    }

    #[test]
    fn a_full_roster_sets_every_flag() {
        let catalog = catalog();
        let kinds = kinds_by_name(
            &catalog,
            &[
                "rifleman",
                "medic",
                "engineer",
                "supply_truck",
                "landing_craft",
            ],
        );
        assert_eq!(possible_unit_abilities(kinds), PotentialUnitAbilities::all());
    }

    #[test]
    fn duplicate_buildings_are_counted_once() {
        let catalog = catalog();
        let factory = catalog.building_kind_id("factory").unwrap();
        let building = Building::owned(factory, Coord::new(2, 3), PlayerId(1));

        let once =
            possible_unit_abilities_for_buildings([&building], PlayerId(1), &catalog);
        let twice = possible_unit_abilities_for_buildings(
            [&building, &building],
            PlayerId(1),
            &catalog,
        );

        assert_eq!(once, twice);
        assert!(once.can_create_capture_units);
        assert!(once.can_create_healing_units);
        assert!(!once.can_create_transport_units);
    }

    #[test]
    fn buildings_owned_by_others_contribute_nothing() {
        let catalog = catalog();
        let harbor = catalog.building_kind_id("harbor").unwrap();
        let building = Building::owned(harbor, Coord::new(0, 0), PlayerId(2));

        let abilities =
            possible_unit_abilities_for_buildings([&building], PlayerId(1), &catalog);
        assert_eq!(abilities, PotentialUnitAbilities::default());
    }
}
