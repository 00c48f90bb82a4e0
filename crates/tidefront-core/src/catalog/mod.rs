mod loader;
mod types;

pub use crate::catalog::loader::{load_catalog, CatalogError, CatalogSource};
pub use crate::catalog::types::{
    Ability, BuildingKind, Catalog, RawBuildingKind, RawTerrainKind, RawUnitKind, TerrainKind,
    UnitClass, UnitKind,
};
