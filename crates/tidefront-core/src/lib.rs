//! Tidefront core: the static catalog, the match snapshot, and the
//! deterministic production advisor that decides which kind of unit an
//! AI-controlled player should build next.

mod ai;
mod building;
mod catalog;
mod economy;
mod map;
mod supply;
mod unit;

pub use crate::ai::*;
pub use crate::building::*;
pub use crate::catalog::*;
pub use crate::economy::*;
pub use crate::map::*;
pub use crate::supply::*;
pub use crate::unit::*;
