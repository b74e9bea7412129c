//! Battle snapshot schema and domain types for VGC doubles prediction.
//!
//! This crate is the shared type system between upstream collaborators
//! (state rebuilding, action annotation, damage estimation) and the
//! decision engine in `augur-strategist`.
//!
//! # Overview
//!
//! ```text
//! host adapter / state rebuilder (external)
//!        │  builds one snapshot per decision point
//!        ▼
//! augur-battle (snapshot schema) ← THIS CRATE
//!        │
//!        └─> augur-strategist (evaluator + rollout search + hybrid lanes)
//! ```
//!
//! # Main Types
//!
//! - [`BattleSnapshot`] - immutable-per-turn view of the whole battle
//! - [`SideState`] - one player's active Pokemon and reserves
//! - [`PokemonBattleState`] - per-Pokemon estimated battle state
//! - [`ActionCandidate`] - one annotated legal action, with [`ActionTag`]s
//!   and [`ActionMetadata`]
//! - [`Type`], [`Status`], [`StatStages`], [`Weather`], [`Terrain`],
//!   [`Room`] - domain enums and the effectiveness chart
//!
//! Snapshots are read-only to the engine: simulation clones the side
//! states it mutates, so one snapshot can back any number of concurrent
//! rollout trials.

pub mod types;

pub use types::{
    ActionCandidate, ActionMetadata, ActionTag, ActionTarget, BaseStats, BattleSnapshot,
    DamageEstimate, PokemonBattleState, Room, SideId, SideState, Stat, StatStages, Status,
    Terrain, Type, Weather, TYPE_CHART,
};
pub use types::{is_immune, is_resisted, is_super_effective};
