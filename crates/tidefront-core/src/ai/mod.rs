mod abilities;
mod production;

pub use crate::ai::abilities::{
    possible_unit_abilities, possible_unit_abilities_for_buildings, PotentialUnitAbilities,
};
pub use crate::ai::production::select_units_to_build;
