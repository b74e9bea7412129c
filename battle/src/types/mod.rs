//! Domain types for the battle snapshot schema

mod action;
mod field;
mod pokemon;
mod pokemon_type;
mod side;
mod snapshot;
mod stats;
mod status;

pub use action::{ActionCandidate, ActionMetadata, ActionTag, ActionTarget, DamageEstimate};
pub use field::{Room, Terrain, Weather};
pub use pokemon::PokemonBattleState;
pub use pokemon_type::{is_immune, is_resisted, is_super_effective, Type, TYPE_CHART};
pub use side::SideState;
pub use snapshot::{BattleSnapshot, SideId};
pub use stats::{BaseStats, Stat, StatStages};
pub use status::Status;
