use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tidefront_protocol::{Coord, PlayerId, TerrainId};

use crate::building::Building;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: TerrainId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub funds: i32,
}

impl PlayerState {
    pub fn new(id: PlayerId, funds: i32) -> Self {
        Self { id, funds }
    }
}

/// A read-only snapshot of one match: the tile grid, buildings keyed by
/// position, the active players, and the round counter. Mutators exist for
/// match setup and scenario construction; the decision core only reads.
#[derive(Clone, Debug)]
pub struct MatchMap {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    buildings: BTreeMap<Coord, Building>,
    players: Vec<PlayerState>,
    pub round: u32,
}

impl MatchMap {
    pub fn new(width: u32, height: u32, default_terrain: TerrainId) -> Self {
        let tiles = vec![
            Tile {
                terrain: default_terrain,
            };
            (width as usize) * (height as usize)
        ];
        Self {
            width,
            height,
            tiles,
            buildings: BTreeMap::new(),
            players: Vec::new(),
            round: 1,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total tile count of the grid.
    pub fn area(&self) -> usize {
        self.tiles.len()
    }

    pub fn get(&self, coord: Coord) -> Option<&Tile> {
        self.index_of(coord).map(|i| &self.tiles[i])
    }

    pub fn set_terrain(&mut self, coord: Coord, terrain: TerrainId) {
        if let Some(i) = self.index_of(coord) {
            self.tiles[i].terrain = terrain;
        }
    }

    /// Adds a building at its own position, replacing any previous occupant.
    pub fn add_building(&mut self, building: Building) {
        self.buildings.insert(building.position, building);
    }

    pub fn building_at(&self, coord: Coord) -> Option<&Building> {
        self.buildings.get(&coord)
    }

    pub fn buildings(&self) -> impl Iterator<Item = &Building> {
        self.buildings.values()
    }

    pub fn add_player(&mut self, player: PlayerState) {
        self.players.push(player);
    }

    /// Players still active in the match.
    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Folds an accumulator over every coordinate of the grid in row-major
    /// order.
    pub fn fold_tiles<T>(&self, init: T, mut f: impl FnMut(T, Coord, &Tile) -> T) -> T {
        let mut acc = init;
        for (index, tile) in self.tiles.iter().enumerate() {
            let coord = Coord::new(
                (index % self.width as usize) as i32,
                (index / self.width as usize) as i32,
            );
            acc = f(acc, coord, tile);
        }
        acc
    }

    fn index_of(&self, coord: Coord) -> Option<usize> {
        if coord.x < 0
            || coord.y < 0
            || coord.x >= self.width as i32
            || coord.y >= self.height as i32
        {
            return None;
        }
        Some((coord.y as usize) * (self.width as usize) + (coord.x as usize))
    }
}
