//! Plays a scripted opening through the production advisor and logs what it
//! recommends each round.

use tidefront_core::{
    load_catalog, possible_unit_abilities_for_buildings, select_units_to_build, Building, Catalog,
    CatalogSource, MatchMap, PlayerState, Unit, MAX_HEALTH,
};
use tidefront_protocol::{Coord, PlayerId, UnitKindId};
use tracing::{error, info};

const US: PlayerId = PlayerId(1);
const THEM: PlayerId = PlayerId(2);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tidefront_core=debug".into()),
        )
        .init();

    let catalog = match load_catalog(CatalogSource::Embedded) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("failed to load catalog: {e}");
            std::process::exit(1);
        }
    };

    let mut map = scripted_map(&catalog);
    let mut roster: Vec<Unit> = Vec::new();

    let buildable = owned_production(&map, &catalog);
    info!(kinds = buildable.len(), "production options available");

    for round in 1..=12 {
        map.round = round;

        let abilities = possible_unit_abilities_for_buildings(map.buildings(), US, &catalog);
        let picks = select_units_to_build(&map, &catalog, US, &roster, &buildable, Some(abilities));

        let names: Vec<&str> = picks
            .iter()
            .map(|&id| catalog.unit_kind(id).name.as_str())
            .collect();
        info!(round, recommended = ?names, "advisor recommendation");

        // Produce the first recommendation and rough the roster up a little
        // so later rounds exercise the healing and supply branches.
        if let Some(&pick) = picks.first() {
            let mut produced = Unit::new(pick, US, Coord::new(1, 1), &catalog);
            produced.health = (MAX_HEALTH - 10 * round as i32).max(30);
            if round > 6 {
                produced.fuel = 0;
            }
            roster.push(produced);
        }
    }

    info!(units = roster.len(), "scripted opening finished");
}

/// A 20x14 coastal map: a buildable plain, a few neutral towns, and our
/// factory plus harbor.
fn scripted_map(catalog: &Catalog) -> MatchMap {
    let plains = catalog.terrain_id("plains").expect("plains terrain");
    let sea = catalog.terrain_id("sea").expect("sea terrain");
    let mut map = MatchMap::new(20, 14, plains);

    for y in 0..14 {
        for x in 15..20 {
            map.set_terrain(Coord::new(x, y), sea);
        }
    }

    map.add_player(PlayerState::new(US, 2_000));
    map.add_player(PlayerState::new(THEM, 2_000));

    let city = catalog.building_kind_id("city").expect("city kind");
    let factory = catalog.building_kind_id("factory").expect("factory kind");
    let harbor = catalog.building_kind_id("harbor").expect("harbor kind");

    map.add_building(Building::owned(factory, Coord::new(1, 1), US));
    map.add_building(Building::owned(harbor, Coord::new(14, 7), US));
    map.add_building(Building::owned(city, Coord::new(2, 1), US));
    map.add_building(Building::neutral(city, Coord::new(6, 4)));
    map.add_building(Building::neutral(city, Coord::new(9, 9)));
    map.add_building(Building::neutral(city, Coord::new(12, 3)));
    map.add_building(Building::owned(factory, Coord::new(13, 12), THEM));

    map
}

/// Everything the player's own buildings can currently produce, first
/// occurrence wins.
fn owned_production(map: &MatchMap, catalog: &Catalog) -> Vec<UnitKindId> {
    let mut buildable: Vec<UnitKindId> = Vec::new();
    for building in map.buildings() {
        for &kind in building.buildable_units(catalog, US) {
            if !buildable.contains(&kind) {
                buildable.push(kind);
            }
        }
    }
    buildable
}
