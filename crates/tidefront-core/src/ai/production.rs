use std::collections::HashSet;

use tracing::debug;

use tidefront_protocol::{PlayerId, UnitKindId};

use crate::ai::abilities::PotentialUnitAbilities;
use crate::catalog::{Ability, Catalog, UnitClass, UnitKind};
use crate::economy::{self, MIN_FUNDS};
use crate::map::MatchMap;
use crate::supply::needs_supply;
use crate::unit::{Unit, MAX_HEALTH};

/// Derived quantities of one decision call, each computed at most once.
/// Call-scoped only; nothing is cached across calls.
struct Derived<'a> {
    map: &'a MatchMap,
    catalog: &'a Catalog,
    player: PlayerId,
    available_tiles: Option<i32>,
    neutral_sites: Option<usize>,
    total_possible_funds: Option<i32>,
    current_funds: Option<i32>,
}

impl<'a> Derived<'a> {
    fn new(map: &'a MatchMap, catalog: &'a Catalog, player: PlayerId) -> Self {
        Self {
            map,
            catalog,
            player,
            available_tiles: None,
            neutral_sites: None,
            total_possible_funds: None,
            current_funds: None,
        }
    }

    /// Tiles that are buildable terrain and not already occupied.
    fn available_tiles(&mut self) -> i32 {
        if let Some(count) = self.available_tiles {
            return count;
        }
        let count = self.map.fold_tiles(0, |sum, coord, tile| {
            if self.catalog.terrain(tile.terrain).buildable
                && self.map.building_at(coord).is_none()
            {
                sum + 1
            } else {
                sum
            }
        });
        self.available_tiles = Some(count);
        count
    }

    /// Neutral, capturable (non-structure) buildings.
    fn neutral_sites(&mut self) -> usize {
        if let Some(count) = self.neutral_sites {
            return count;
        }
        let count = self
            .map
            .buildings()
            .filter(|building| {
                building.is_neutral() && !self.catalog.building_kind(building.kind).is_structure
            })
            .count();
        self.neutral_sites = Some(count);
        count
    }

    fn total_possible_funds(&mut self) -> i32 {
        if let Some(total) = self.total_possible_funds {
            return total;
        }
        let total = economy::total_possible_funds(self.map, self.catalog);
        self.total_possible_funds = Some(total);
        total
    }

    fn current_funds(&mut self) -> i32 {
        if let Some(funds) = self.current_funds {
            return funds;
        }
        let funds = economy::current_funds(self.map, self.player);
        self.current_funds = Some(funds);
        funds
    }

    /// Capture pressure: the player's share of the map economy is small and
    /// their capture roster is thin relative to what the map offers. False
    /// whenever the map has no income at all or no active players, so the
    /// ratios stay well-defined.
    fn should_build_capture_units(&mut self, owned_capturers: usize) -> bool {
        let total = self.total_possible_funds();
        let active = self.map.players().len();
        if total <= 0 || active == 0 {
            return false;
        }

        let min_capturers =
            (self.neutral_sites() as f64).max(total as f64 / MIN_FUNDS as f64) * 0.2;

        (self.current_funds() as f64 / total as f64) < 0.4 / active as f64
            && (owned_capturers as f64) < min_capturers
    }
}

/// Selects which of the buildable unit kinds the player should produce next.
///
/// A strict priority cascade: healers when the roster is hurt, suppliers when
/// units run dry, capture/construction units on the expansion cadence,
/// transports on the ferry cadence, and the unfiltered input when nothing is
/// urgent. Pure over the snapshot; `None` abilities means "no restriction".
pub fn select_units_to_build(
    map: &MatchMap,
    catalog: &Catalog,
    player: PlayerId,
    player_units: &[Unit],
    buildable: &[UnitKindId],
    abilities: Option<PotentialUnitAbilities>,
) -> Vec<UnitKindId> {
    if buildable.is_empty() {
        return Vec::new();
    }
    let abilities = abilities.unwrap_or(PotentialUnitAbilities::all());
    let mut derived = Derived::new(map, catalog, player);
    let round = map.round;

    let count_with_ability = |ability: Ability| {
        player_units
            .iter()
            .filter(|unit| catalog.unit_kind(unit.kind).has_ability(ability))
            .count()
    };
    let buildable_has = |predicate: &dyn Fn(&UnitKind) -> bool| {
        buildable.iter().any(|&id| predicate(catalog.unit_kind(id)))
    };

    // 1. Medic: field healer for the ground roster.
    if abilities.can_create_healing_units {
        if let Some(choice) = healer_priority(
            map,
            catalog,
            player,
            player_units,
            buildable,
            &mut derived,
            "medic",
            false,
            true,
        ) {
            debug!(branch = "medic", "production priority fired");
            return choice;
        }

        // 2. Support ship: the same urgency check for the non-infantry fleet.
        if let Some(choice) = healer_priority(
            map,
            catalog,
            player,
            player_units,
            buildable,
            &mut derived,
            "support_ship",
            true,
            false,
        ) {
            debug!(branch = "support_ship", "production priority fired");
            return choice;
        }
    }

    // 3. Supply: units are running dry and almost nobody can refill them.
    if abilities.can_create_supply_units {
        let units_needing_supply: Vec<&Unit> = player_units
            .iter()
            .filter(|unit| needs_supply(unit, catalog))
            .collect();
        if !units_needing_supply.is_empty() {
            let classes_needing_supply: HashSet<UnitClass> = units_needing_supply
                .iter()
                .map(|unit| catalog.unit_kind(unit.kind).class)
                .collect();
            let owned_suppliers = count_with_ability(Ability::Supply);
            let useful_supplier_buildable = buildable_has(&|kind| {
                kind.has_ability(Ability::Supply)
                    && classes_needing_supply
                        .iter()
                        .any(|&class| kind.supplies_class(class))
            });

            if owned_suppliers as f64 <= player_units.len() as f64 * 0.05
                && useful_supplier_buildable
            {
                debug!(branch = "supply", "production priority fired");
                return filter_buildable(catalog, buildable, |kind| {
                    kind.has_ability(Ability::Supply)
                });
            }
        }
    }

    // 4. Expansion: claim neutral buildings, or construct new ones while
    // there is room. If there are many neutral buildings, prefer units that
    // can capture; otherwise prefer units that can build, if there is space.
    let owned_capturers = count_with_ability(Ability::Capture);
    let owned_builders = count_with_ability(Ability::CreateBuildings);
    if (abilities.can_create_build_units || abilities.can_create_capture_units)
        && (derived.available_tiles() > 0 || derived.neutral_sites() > 0)
        && (round <= 2
            || (round > 4 && round % 4 == 0)
            || (owned_builders == 0 && derived.available_tiles() > 3))
        && (derived.should_build_capture_units(owned_capturers)
            || buildable_has(&|kind| {
                kind.has_ability(Ability::Capture) || kind.has_ability(Ability::CreateBuildings)
            }))
    {
        if (owned_capturers as f64) < derived.neutral_sites() as f64 * 0.3
            && (round <= 2 || buildable_has(&|kind| kind.has_ability(Ability::Capture)))
        {
            debug!(branch = "capture", "production priority fired");
            return filter_buildable(catalog, buildable, |kind| {
                kind.has_ability(Ability::Capture)
            });
        }

        if (owned_builders as i32) < derived.available_tiles()
            && (round <= 2 || buildable_has(&|kind| kind.has_ability(Ability::CreateBuildings)))
        {
            debug!(branch = "construction", "production priority fired");
            return filter_buildable(catalog, buildable, |kind| {
                kind.has_ability(Ability::CreateBuildings)
            });
        }

        // Neither expansion urgency held; fall through to the transport
        // check below.
    }

    // 5. Transport: early or on the ferry cadence, on large or naval maps,
    // while the roster is small and short on carriers.
    if abilities.can_create_transport_units
        && (player_units.len() as u32) < round * 2
        && (round == 3 || round == 4 || (round > 5 && round % 5 == 0))
        && (map.area() >= 250 || buildable_has(&|kind| kind.class == UnitClass::Naval))
        && (player_units
            .iter()
            .filter(|unit| catalog.unit_kind(unit.kind).can_transport_units())
            .count() as f64)
            < player_units.len() as f64 * 0.15
    {
        debug!(branch = "transport", "production priority fired");
        return filter_buildable(catalog, buildable, |kind| kind.can_transport_units());
    }

    // 6. Nothing urgent: leave the choice unrestricted.
    buildable.to_vec()
}

fn filter_buildable(
    catalog: &Catalog,
    buildable: &[UnitKindId],
    predicate: impl Fn(&UnitKind) -> bool,
) -> Vec<UnitKindId> {
    buildable
        .iter()
        .copied()
        .filter(|&id| predicate(catalog.unit_kind(id)))
        .collect()
}

/// Shared shape of the two healer branches. Fires when the named healer kind
/// is buildable, some unit it can heal exists, the player can afford the
/// healer plus healing its most-injured target, and the urgency score clears
/// the threshold. Returns the healer entries of `buildable` when it fires.
#[allow(clippy::too_many_arguments)]
fn healer_priority(
    map: &MatchMap,
    catalog: &Catalog,
    player: PlayerId,
    player_units: &[Unit],
    buildable: &[UnitKindId],
    derived: &mut Derived<'_>,
    healer_data_id: &str,
    exclude_infantry: bool,
    count_shelters: bool,
) -> Option<Vec<UnitKindId>> {
    let healer_id = catalog.unit_kind_id(healer_data_id)?;
    if !buildable.contains(&healer_id) {
        return None;
    }
    let healer = catalog.unit_kind(healer_id);

    let mut raw_score = 0;
    let mut most_injured: Option<&Unit> = None;
    for unit in player_units {
        let class = catalog.unit_kind(unit.kind).class;
        if exclude_infantry && class == UnitClass::Infantry {
            continue;
        }
        if !healer.heals_class(class) {
            continue;
        }
        raw_score += 20 + MAX_HEALTH - unit.health;
        if most_injured.is_none_or(|m| unit.health < m.health) {
            most_injured = Some(unit);
        }
    }
    let most_injured = most_injured?;

    let owned_healers = player_units
        .iter()
        .filter(|unit| unit.kind == healer_id)
        .count();
    let owned_shelters = if count_shelters {
        match catalog.building_kind_id("shelter") {
            Some(shelter_id) => map
                .buildings()
                .filter(|building| {
                    building.kind == shelter_id && building.owner == Some(player)
                })
                .count(),
            None => 0,
        }
    } else {
        0
    };

    let score = raw_score - 100 * (owned_healers + owned_shelters) as i32;
    let affordable =
        derived.current_funds() > healer.cost + economy::heal_cost(most_injured, catalog);

    if affordable && score >= 100 {
        Some(buildable.iter().copied().filter(|&id| id == healer_id).collect())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::Building;
    use crate::catalog::{load_catalog, CatalogSource};
    use crate::map::PlayerState;
    use tidefront_protocol::Coord;

    const P1: PlayerId = PlayerId(1);
    const P2: PlayerId = PlayerId(2);

    fn catalog() -> Catalog {
        load_catalog(CatalogSource::Embedded).expect("catalog load")
    }

    /// A 5x5 all-forest map (no buildable tiles) with two active players.
    fn forest_map(catalog: &Catalog) -> MatchMap {
        let forest = catalog.terrain_id("forest").unwrap();
        let mut map = MatchMap::new(5, 5, forest);
        map.add_player(PlayerState::new(P1, 10_000));
        map.add_player(PlayerState::new(P2, 10_000));
        map
    }

    fn kind(catalog: &Catalog, name: &str) -> UnitKindId {
        catalog.unit_kind_id(name).expect("known unit kind")
    }

    fn unit(catalog: &Catalog, name: &str, health: i32) -> Unit {
        Unit::new(kind(catalog, name), P1, Coord::new(0, 0), catalog).with_health(health)
    }

    #[test]
    fn empty_buildable_returns_empty() {
        let catalog = catalog();
        let map = forest_map(&catalog);
        let selected = select_units_to_build(&map, &catalog, P1, &[], &[], None);
        assert!(selected.is_empty());
    }

    #[test]
    fn injured_ground_roster_demands_a_medic() {
        let catalog = catalog();
        let map = forest_map(&catalog);
        // urgency: (20+40) + (20+30) + (20+20) = 150 >= 100
        let roster = vec![
            unit(&catalog, "tank", 60),
            unit(&catalog, "tank", 70),
            unit(&catalog, "tank", 80),
        ];
        let buildable = [kind(&catalog, "medic"), kind(&catalog, "tank")];

        let selected = select_units_to_build(&map, &catalog, P1, &roster, &buildable, None);
        assert_eq!(selected, vec![kind(&catalog, "medic")]);
    }

    #[test]
    fn owned_medics_suppress_the_medic_priority() {
        let catalog = catalog();
        let map = forest_map(&catalog);
        let mut roster = vec![
            unit(&catalog, "tank", 60),
            unit(&catalog, "tank", 70),
            unit(&catalog, "tank", 80),
        ];
        // two healthy medics push the score to 150 + 40 - 200 < 100
        roster.push(unit(&catalog, "medic", MAX_HEALTH));
        roster.push(unit(&catalog, "medic", MAX_HEALTH));
        let buildable = [kind(&catalog, "medic"), kind(&catalog, "tank")];

        let selected = select_units_to_build(&map, &catalog, P1, &roster, &buildable, None);
        assert_eq!(selected, buildable.to_vec());
    }

    #[test]
    fn owned_shelters_suppress_the_medic_priority() {
        let catalog = catalog();
        let mut map = forest_map(&catalog);
        let shelter = catalog.building_kind_id("shelter").unwrap();
        map.add_building(Building::owned(shelter, Coord::new(0, 0), P1));
        // a rival's shelter must not count against us
        map.add_building(Building::owned(shelter, Coord::new(1, 0), P2));

        let roster = vec![
            unit(&catalog, "tank", 60),
            unit(&catalog, "tank", 70),
            unit(&catalog, "tank", 80),
        ];
        let buildable = [kind(&catalog, "medic"), kind(&catalog, "tank")];

        // 150 - 100 = 50 < 100: one owned shelter is enough to suppress
        let selected = select_units_to_build(&map, &catalog, P1, &roster, &buildable, None);
        assert_eq!(selected, buildable.to_vec());
    }

    #[test]
    fn medic_priority_requires_funds_for_unit_and_heal() {
        let catalog = catalog();
        let forest = catalog.terrain_id("forest").unwrap();
        let roster = vec![
            unit(&catalog, "tank", 60),
            unit(&catalog, "tank", 70),
            unit(&catalog, "tank", 80),
        ];
        let buildable = [kind(&catalog, "medic"), kind(&catalog, "tank")];

        // medic costs 200, healing the tank at 60 costs another 200: 400 is
        // not enough under the strict comparison, 401 is
        let mut poor = MatchMap::new(5, 5, forest);
        poor.add_player(PlayerState::new(P1, 400));
        let selected = select_units_to_build(&poor, &catalog, P1, &roster, &buildable, None);
        assert_eq!(selected, buildable.to_vec());

        let mut rich = MatchMap::new(5, 5, forest);
        rich.add_player(PlayerState::new(P1, 401));
        let selected = select_units_to_build(&rich, &catalog, P1, &roster, &buildable, None);
        assert_eq!(selected, vec![kind(&catalog, "medic")]);
    }

    #[test]
    fn medic_outranks_supply_when_both_fire() {
        let catalog = catalog();
        let map = forest_map(&catalog);
        // injured tanks satisfy the medic gate; the dry tank also satisfies
        // the supply gate (0 suppliers owned, supply truck buildable)
        let roster = vec![
            unit(&catalog, "tank", 60).with_fuel(0),
            unit(&catalog, "tank", 70),
            unit(&catalog, "tank", 80),
        ];
        let buildable = [kind(&catalog, "medic"), kind(&catalog, "supply_truck")];

        let selected = select_units_to_build(&map, &catalog, P1, &roster, &buildable, None);
        assert_eq!(selected, vec![kind(&catalog, "medic")]);
    }

    #[test]
    fn support_ship_heals_the_fleet_but_ignores_infantry() {
        let catalog = catalog();
        let map = forest_map(&catalog);
        let buildable = [kind(&catalog, "support_ship"), kind(&catalog, "corvette")];

        let fleet = vec![
            unit(&catalog, "corvette", 60),
            unit(&catalog, "corvette", 70),
            unit(&catalog, "corvette", 80),
        ];
        let selected = select_units_to_build(&map, &catalog, P1, &fleet, &buildable, None);
        assert_eq!(selected, vec![kind(&catalog, "support_ship")]);

        // riflemen are in the support ship's heal set but infantry are
        // excluded from its urgency entirely
        let infantry = vec![
            unit(&catalog, "rifleman", 10),
            unit(&catalog, "rifleman", 10),
            unit(&catalog, "rifleman", 10),
        ];
        let selected = select_units_to_build(&map, &catalog, P1, &infantry, &buildable, None);
        assert_eq!(selected, buildable.to_vec());
    }

    #[test]
    fn dry_roster_demands_a_supplier() {
        let catalog = catalog();
        let map = forest_map(&catalog);
        let roster = vec![unit(&catalog, "tank", MAX_HEALTH).with_fuel(0)];
        let buildable = [kind(&catalog, "supply_truck"), kind(&catalog, "tank")];

        let selected = select_units_to_build(&map, &catalog, P1, &roster, &buildable, None);
        assert_eq!(selected, vec![kind(&catalog, "supply_truck")]);
    }

    #[test]
    fn saturated_suppliers_skip_the_supply_priority() {
        let catalog = catalog();
        let map = forest_map(&catalog);
        // one supplier out of two units is far above the 5% cap
        let roster = vec![
            unit(&catalog, "tank", MAX_HEALTH).with_fuel(0),
            unit(&catalog, "supply_truck", MAX_HEALTH),
        ];
        let buildable = [kind(&catalog, "supply_truck"), kind(&catalog, "tank")];

        let selected = select_units_to_build(&map, &catalog, P1, &roster, &buildable, None);
        assert_eq!(selected, buildable.to_vec());
    }

    #[test]
    fn early_capture_outranks_construction() {
        let catalog = catalog();
        let mut map = forest_map(&catalog);
        map.round = 1;
        let plains = catalog.terrain_id("plains").unwrap();
        for x in 0..5 {
            map.set_terrain(Coord::new(x, 0), plains);
        }
        let city = catalog.building_kind_id("city").unwrap();
        map.add_building(Building::neutral(city, Coord::new(0, 4)));
        map.add_building(Building::neutral(city, Coord::new(1, 4)));

        // 0 capture units < 0.3 * 2 neutral sites, so capture wins even
        // though construction's own gate would also pass
        let buildable = [kind(&catalog, "rifleman"), kind(&catalog, "engineer")];
        let selected = select_units_to_build(&map, &catalog, P1, &[], &buildable, None);
        assert_eq!(selected, vec![kind(&catalog, "rifleman")]);
    }

    #[test]
    fn construction_fires_once_capture_is_covered() {
        let catalog = catalog();
        let mut map = forest_map(&catalog);
        map.round = 1;
        let plains = catalog.terrain_id("plains").unwrap();
        for x in 0..5 {
            map.set_terrain(Coord::new(x, 0), plains);
        }
        // no neutral sites: capture urgency can't hold (0 < 0 is false)
        let buildable = [kind(&catalog, "rifleman"), kind(&catalog, "engineer")];
        let selected = select_units_to_build(&map, &catalog, P1, &[], &buildable, None);
        assert_eq!(selected, vec![kind(&catalog, "engineer")]);
    }

    #[test]
    fn no_urgency_returns_the_input_unfiltered() {
        let catalog = catalog();
        let mut map = forest_map(&catalog);
        // round 7 misses every cadence; no tiles, no sites, no injuries
        map.round = 7;
        let roster = vec![unit(&catalog, "tank", MAX_HEALTH)];
        let buildable = [kind(&catalog, "tank"), kind(&catalog, "rifleman")];

        let selected = select_units_to_build(&map, &catalog, P1, &roster, &buildable, None);
        assert_eq!(selected, buildable.to_vec());
    }

    #[test]
    fn expansion_without_urgency_falls_through_to_transport() {
        let catalog = catalog();
        let mut map = forest_map(&catalog);
        // round 20 is on both the expansion (div 4) and ferry (div 5) cadences
        map.round = 20;
        let city = catalog.building_kind_id("city").unwrap();
        map.add_building(Building::neutral(city, Coord::new(0, 4)));
        map.add_building(Building::neutral(city, Coord::new(1, 4)));

        // one capturer covers 0.3 * 2 sites, and zero tiles leave nothing to
        // construct, so the expansion branch matches but returns nothing
        let roster = vec![unit(&catalog, "rifleman", MAX_HEALTH)];
        let buildable = [kind(&catalog, "landing_craft"), kind(&catalog, "rifleman")];

        let selected = select_units_to_build(&map, &catalog, P1, &roster, &buildable, None);
        assert_eq!(selected, vec![kind(&catalog, "landing_craft")]);
    }

    #[test]
    fn transport_cadence_respects_roster_growth() {
        let catalog = catalog();
        let mut map = forest_map(&catalog);
        map.round = 3;
        // 6 units >= round * 2: the roster is already big enough
        let roster: Vec<Unit> = (0..6).map(|_| unit(&catalog, "tank", MAX_HEALTH)).collect();
        let buildable = [kind(&catalog, "landing_craft"), kind(&catalog, "tank")];

        let selected = select_units_to_build(&map, &catalog, P1, &roster, &buildable, None);
        assert_eq!(selected, buildable.to_vec());

        let small_roster = vec![unit(&catalog, "tank", MAX_HEALTH)];
        let selected =
            select_units_to_build(&map, &catalog, P1, &small_roster, &buildable, None);
        assert_eq!(selected, vec![kind(&catalog, "landing_craft")]);
    }

    #[test]
    fn omitted_abilities_behave_as_all_allowed() {
        let catalog = catalog();
        let mut map = forest_map(&catalog);
        map.round = 1;
        let plains = catalog.terrain_id("plains").unwrap();
        for x in 0..5 {
            map.set_terrain(Coord::new(x, 0), plains);
        }
        let city = catalog.building_kind_id("city").unwrap();
        map.add_building(Building::neutral(city, Coord::new(0, 4)));
        let buildable = [kind(&catalog, "rifleman"), kind(&catalog, "engineer")];

        let implicit = select_units_to_build(&map, &catalog, P1, &[], &buildable, None);
        let explicit = select_units_to_build(
            &map,
            &catalog,
            P1,
            &[],
            &buildable,
            Some(PotentialUnitAbilities::all()),
        );
        assert_eq!(implicit, explicit);

        // with every capability denied, no branch may fire
        let restricted = select_units_to_build(
            &map,
            &catalog,
            P1,
            &[],
            &buildable,
            Some(PotentialUnitAbilities::default()),
        );
        assert_eq!(restricted, buildable.to_vec());
    }

    #[test]
    fn zero_map_income_disables_capture_pressure() {
        let catalog = catalog();
        let mut map = forest_map(&catalog);
        // round 8 is on the expansion cadence; the neutral factory is a
        // capture site but yields no income, so total possible funds is zero
        map.round = 8;
        let factory = catalog.building_kind_id("factory").unwrap();
        map.add_building(Building::neutral(factory, Coord::new(2, 2)));

        // buildable has neither capture nor construction kinds, so the gate
        // hinges entirely on capture pressure, which a zero-income map must
        // never report
        let buildable = [kind(&catalog, "tank")];
        let selected = select_units_to_build(&map, &catalog, P1, &[], &buildable, None);
        assert_eq!(selected, buildable.to_vec());
    }
}
