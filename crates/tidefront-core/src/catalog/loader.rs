use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;
use tidefront_protocol::{BuildingKindId, TerrainId, UnitKindId};

use crate::catalog::Catalog;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("missing referenced id: {0}")]
    MissingId(String),
    #[error("utf-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub enum CatalogSource<'a> {
    Embedded,
    Path(String),
    Bytes {
        terrain: &'a [u8],
        units: &'a [u8],
        buildings: &'a [u8],
    },
}

// BTreeMaps so runtime ids are assigned in a deterministic (key-sorted) order.
#[derive(Debug, Deserialize)]
struct RawCatalog {
    terrains: BTreeMap<String, crate::catalog::RawTerrainKind>,
    units: BTreeMap<String, crate::catalog::RawUnitKind>,
    buildings: BTreeMap<String, crate::catalog::RawBuildingKind>,
}

pub fn load_catalog(source: CatalogSource<'_>) -> Result<Catalog, CatalogError> {
    let raw: RawCatalog = match source {
        CatalogSource::Embedded => {
            let terrain_yaml = include_str!("../../data/base/terrain.yaml");
            let units_yaml = include_str!("../../data/base/units.yaml");
            let buildings_yaml = include_str!("../../data/base/buildings.yaml");

            parse_raw_catalog(terrain_yaml, units_yaml, buildings_yaml)?
        }
        CatalogSource::Path(path) => {
            let terrain_yaml = std::fs::read_to_string(format!("{path}/terrain.yaml"))?;
            let units_yaml = std::fs::read_to_string(format!("{path}/units.yaml"))?;
            let buildings_yaml = std::fs::read_to_string(format!("{path}/buildings.yaml"))?;
            parse_raw_catalog(&terrain_yaml, &units_yaml, &buildings_yaml)?
        }
        CatalogSource::Bytes {
            terrain,
            units,
            buildings,
        } => parse_raw_catalog(
            std::str::from_utf8(terrain)?,
            std::str::from_utf8(units)?,
            std::str::from_utf8(buildings)?,
        )?,
    };

    compile_catalog(raw)
}

fn parse_raw_catalog(
    terrain_yaml: &str,
    units_yaml: &str,
    buildings_yaml: &str,
) -> Result<RawCatalog, CatalogError> {
    let terrains = serde_yaml::from_str(terrain_yaml)?;
    let units = serde_yaml::from_str(units_yaml)?;
    let buildings = serde_yaml::from_str(buildings_yaml)?;
    Ok(RawCatalog {
        terrains,
        units,
        buildings,
    })
}

fn compile_catalog(raw: RawCatalog) -> Result<Catalog, CatalogError> {
    let terrain_ids = raw
        .terrains
        .keys()
        .enumerate()
        .map(|(i, k)| (k.clone(), TerrainId::new(i as u16)))
        .collect::<std::collections::HashMap<_, _>>();
    let unit_kind_ids = raw
        .units
        .keys()
        .enumerate()
        .map(|(i, k)| (k.clone(), UnitKindId::new(i as u16)))
        .collect::<std::collections::HashMap<_, _>>();
    let building_kind_ids = raw
        .buildings
        .keys()
        .enumerate()
        .map(|(i, k)| (k.clone(), BuildingKindId::new(i as u16)))
        .collect::<std::collections::HashMap<_, _>>();

    let terrains = raw
        .terrains
        .into_values()
        .map(|t| t.compile())
        .collect::<Vec<_>>();
    let unit_kinds = raw
        .units
        .into_values()
        .map(|u| u.compile())
        .collect::<Vec<_>>();
    let building_kinds = raw
        .buildings
        .into_values()
        .map(|b| b.compile(&unit_kind_ids))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Catalog {
        terrains,
        unit_kinds,
        building_kinds,
        terrain_ids,
        unit_kind_ids,
        building_kind_ids,
    })
}
