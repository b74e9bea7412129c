//! Flat Monte-Carlo rollout search
//!
//! For every candidate root action the engine plays out many randomized
//! continuations of the battle and counts how often side A wins. Playouts
//! are guided: each simulated turn samples from the heuristic softmax
//! distribution rather than uniformly, so trials spend their budget on
//! plausible lines.
//!
//! The simulation is a coarse model on purpose. It trades per-turn accuracy
//! for trial volume; systematic simplifications (no accuracy rolls, no
//! ability triggers beyond immunities) wash out when both sides are
//! simulated under the same model.

use augur_battle::{
    ActionCandidate, ActionTarget, BattleSnapshot, PokemonBattleState, SideId, Type,
};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::algorithm::EvalAlgorithm;
use crate::error::StrategistError;
use crate::evaluator::HeuristicEvaluator;
use crate::opponent::OpponentModel;

/// Tuning knobs for the rollout search
#[derive(Debug, Clone)]
pub struct MonteCarloConfig {
    /// Total rollout budget, split evenly across root actions
    pub rollouts: usize,
    /// Turn cap per rollout before the tie-break decides the winner
    pub max_turns: u32,
    /// Root actions considered (the rest are dropped, not merged)
    pub max_root_actions: usize,
    /// Guide playouts and break turn-cap ties with the heuristic
    pub use_heuristic: bool,
    /// Fixed seed for reproducible searches; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            rollouts: 1000,
            max_turns: 50,
            max_root_actions: 10,
            use_heuristic: true,
            seed: None,
        }
    }
}

/// What one simulated action does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimActionKind {
    Move,
    Switch,
    Terastallize,
}

/// One simulated action by one slot.
///
/// Targets use absolute board indices: 0-1 are side A's slots, 2-3 side
/// B's. `None` targets default to the first slot across the board.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimAction {
    pub kind: SimActionKind,
    pub slot: usize,
    pub move_name: Option<String>,
    pub target: Option<usize>,
    pub switch_to: Option<String>,
    pub tera_type: Option<Type>,
}

impl SimAction {
    fn using_move(slot: usize, move_name: impl Into<String>, target: Option<usize>) -> Self {
        Self {
            kind: SimActionKind::Move,
            slot,
            move_name: Some(move_name.into()),
            target,
            switch_to: None,
            tera_type: None,
        }
    }

    fn switching(slot: usize, reserve: impl Into<String>) -> Self {
        Self {
            kind: SimActionKind::Switch,
            slot,
            move_name: None,
            target: None,
            switch_to: Some(reserve.into()),
            tera_type: None,
        }
    }

    fn is_protect(&self) -> bool {
        self.kind == SimActionKind::Move
            && self
                .move_name
                .as_deref()
                .is_some_and(|m| m.eq_ignore_ascii_case("protect"))
    }
}

/// Both sides' simulated actions for one turn
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimTurnActions {
    pub player_a: Vec<SimAction>,
    pub player_b: Vec<SimAction>,
}

/// Per-root-action trial tally
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStats {
    pub wins: u32,
    pub trials: u32,
    pub avg_turns: f32,
}

/// Full result of one rollout search
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloutReport {
    /// Side A's win rate when playing the optimal root action
    pub player_a_win_rate: f32,
    pub player_b_win_rate: f32,
    /// Best root action found, if any were considered
    pub optimal_action: Option<SimTurnActions>,
    pub optimal_action_index: Option<usize>,
    pub optimal_action_win_rate: f32,
    /// Win rate per root action, index-aligned with `root_candidates`
    pub action_win_rates: Vec<f32>,
    pub action_stats: Vec<ActionStats>,
    /// The candidates the root actions were built from
    pub root_candidates: Vec<ActionCandidate>,
    pub total_rollouts: usize,
    pub avg_turns_per_rollout: f32,
}

impl RolloutReport {
    fn terminal(win_rate_a: f32) -> Self {
        Self {
            player_a_win_rate: win_rate_a,
            player_b_win_rate: 1.0 - win_rate_a,
            optimal_action: None,
            optimal_action_index: None,
            optimal_action_win_rate: win_rate_a,
            action_win_rates: Vec::new(),
            action_stats: Vec::new(),
            root_candidates: Vec::new(),
            total_rollouts: 0,
            avg_turns_per_rollout: 0.0,
        }
    }

    /// The best root candidate, for recommendation output
    pub fn optimal_candidate(&self) -> Option<&ActionCandidate> {
        self.optimal_action_index
            .and_then(|i| self.root_candidates.get(i))
    }
}

/// Flat Monte-Carlo search over annotated snapshots.
///
/// The strategist is immutable during a search; every call builds its own
/// RNG from the configured seed, so repeated calls with a fixed seed return
/// identical reports.
pub struct MonteCarloStrategist {
    config: MonteCarloConfig,
    evaluator: HeuristicEvaluator,
    opponent_model: Option<Box<dyn OpponentModel>>,
}

impl MonteCarloStrategist {
    pub fn new(config: MonteCarloConfig) -> Self {
        Self {
            config,
            evaluator: HeuristicEvaluator::new(),
            opponent_model: None,
        }
    }

    /// Build a strategist from a configured leaf-algorithm name.
    ///
    /// `heuristic` runs guided playouts; `montecarlo` runs unguided uniform
    /// playouts with coin-flip tie-breaks. Unknown or unimplemented names
    /// are hard errors.
    pub fn with_algorithm(name: &str, mut config: MonteCarloConfig) -> Result<Self, StrategistError> {
        let algorithm = EvalAlgorithm::from_name(name)?;
        algorithm.ensure_available()?;
        config.use_heuristic = algorithm == EvalAlgorithm::Heuristic;
        Ok(Self::new(config))
    }

    pub fn with_evaluator(mut self, evaluator: HeuristicEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_opponent_model(mut self, model: Box<dyn OpponentModel>) -> Self {
        self.opponent_model = Some(model);
        self
    }

    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Run the full search and report per-action win rates.
    ///
    /// A terminal snapshot short-circuits to a zero-rollout report; an
    /// in-progress snapshot always yields at least one root action and one
    /// trial per action.
    pub fn predict_win_rate(&self, snapshot: &BattleSnapshot) -> RolloutReport {
        if snapshot.is_terminal() {
            let win_rate = match snapshot.winner() {
                _ if snapshot.player_a.is_defeated() && snapshot.player_b.is_defeated() => 0.5,
                Some(SideId::A) => 1.0,
                _ => 0.0,
            };
            debug!(win_rate, "terminal snapshot, skipping rollouts");
            return RolloutReport::terminal(win_rate);
        }

        let mut rng = self.make_rng();
        let root_candidates = self.root_candidates(snapshot);
        let roots: Vec<SimTurnActions> = root_candidates
            .iter()
            .map(|c| self.root_turn(snapshot, c))
            .collect();

        let trials_per_action = (self.config.rollouts / roots.len()).max(1);
        debug!(
            roots = roots.len(),
            trials_per_action, "starting rollout search"
        );

        let mut action_win_rates = Vec::with_capacity(roots.len());
        let mut action_stats = Vec::with_capacity(roots.len());
        let mut total_turns = 0u64;
        for root in &roots {
            let mut wins = 0u32;
            let mut turns = 0u64;
            for _ in 0..trials_per_action {
                let (a_won, length) = self.simulate_battle(snapshot, root, &mut rng);
                if a_won {
                    wins += 1;
                }
                turns += u64::from(length);
            }
            total_turns += turns;
            action_win_rates.push(wins as f32 / trials_per_action as f32);
            action_stats.push(ActionStats {
                wins,
                trials: trials_per_action as u32,
                avg_turns: turns as f32 / trials_per_action as f32,
            });
        }

        let best = action_win_rates
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b));
        let (optimal_index, optimal_rate) = match best {
            Some((i, rate)) => (Some(i), rate),
            None => (None, 0.5),
        };
        let total_rollouts = trials_per_action * roots.len();

        debug!(
            ?optimal_index,
            optimal_rate, total_rollouts, "rollout search finished"
        );
        RolloutReport {
            player_a_win_rate: optimal_rate,
            player_b_win_rate: 1.0 - optimal_rate,
            optimal_action: optimal_index.map(|i| roots[i].clone()),
            optimal_action_index: optimal_index,
            optimal_action_win_rate: optimal_rate,
            action_win_rates,
            action_stats,
            root_candidates,
            total_rollouts,
            avg_turns_per_rollout: total_turns as f32 / total_rollouts as f32,
        }
    }

    fn make_rng(&self) -> SmallRng {
        match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }

    /// The root actions to compare, as annotated candidates.
    ///
    /// Prefers the snapshot's legal actions; with none supplied it derives
    /// candidates from the active Pokemon's known moves, and as a last
    /// resort invents a single generic attack so the search never runs on
    /// zero actions.
    fn root_candidates(&self, snapshot: &BattleSnapshot) -> Vec<ActionCandidate> {
        let legal = snapshot.legal_for(SideId::A);
        if !legal.is_empty() {
            return legal
                .iter()
                .take(self.config.max_root_actions)
                .cloned()
                .collect();
        }

        let mut derived = Vec::new();
        for poke in snapshot.player_a.active.iter().filter(|p| p.is_alive()) {
            for move_name in poke.moves.iter().take(2) {
                let mut candidate = ActionCandidate::new(&poke.name, poke.slot, move_name);
                candidate.target = Some(ActionTarget::Opponent(0));
                derived.push(candidate);
            }
        }
        derived.truncate(self.config.max_root_actions);
        if derived.is_empty() {
            let slot = snapshot
                .player_a
                .active
                .iter()
                .find(|p| p.is_alive())
                .map_or(0, |p| p.slot);
            let mut candidate = ActionCandidate::new("unknown", slot, "Tackle");
            candidate.target = Some(ActionTarget::Opponent(0));
            derived.push(candidate);
        }
        derived
    }

    /// Fix one side-A candidate as the root turn, with a generic opposing
    /// action; later turns sample the opponent properly.
    fn root_turn(&self, snapshot: &BattleSnapshot, candidate: &ActionCandidate) -> SimTurnActions {
        let opposing = snapshot
            .player_b
            .active
            .iter()
            .find(|p| p.is_alive())
            .map(|p| SimAction::using_move(p.slot, "Tackle", Some(0)));
        SimTurnActions {
            player_a: vec![candidate_to_sim(candidate, SideId::A)],
            player_b: opposing.into_iter().collect(),
        }
    }

    /// Play one battle to completion (or the turn cap) from the snapshot,
    /// starting with the fixed root turn. Returns whether side A won and
    /// how many turns the trial ran.
    fn simulate_battle(
        &self,
        snapshot: &BattleSnapshot,
        root: &SimTurnActions,
        rng: &mut SmallRng,
    ) -> (bool, u32) {
        let mut state = snapshot.clone();
        self.apply_turn(&mut state, root, rng);

        let mut turns = 1u32;
        loop {
            if let Some(winner) = state.winner() {
                return (winner == SideId::A, turns);
            }
            if turns >= self.config.max_turns {
                return (self.break_tie(&state, rng), turns);
            }

            let mut actions = SimTurnActions {
                player_a: self.sample_side_actions(&state, SideId::A, rng),
                player_b: self.sample_side_actions(&state, SideId::B, rng),
            };
            self.overlay_opponent_model(&state, &mut actions, rng);
            self.apply_turn(&mut state, &actions, rng);
            turns += 1;
        }
    }

    /// Turn-cap decision: side A wins on a strictly positive board score,
    /// side B otherwise. Coin flip only when guidance is disabled.
    fn break_tie(&self, state: &BattleSnapshot, rng: &mut SmallRng) -> bool {
        if self.config.use_heuristic {
            return self.evaluator.board_score(state) > 0.0;
        }
        rng.gen_bool(0.5)
    }

    /// Sample one action per surviving active Pokemon on a side
    fn sample_side_actions(
        &self,
        state: &BattleSnapshot,
        side: SideId,
        rng: &mut SmallRng,
    ) -> Vec<SimAction> {
        let default_target = default_target_for(state, side);
        let mut actions = Vec::new();
        for poke in state.side(side).active.iter().filter(|p| p.is_alive()) {
            let candidates = move_candidates(poke);
            let index = if self.config.use_heuristic {
                self.sample_guided(state, &candidates, rng)
            } else {
                rng.gen_range(0..candidates.len())
            };
            actions.push(SimAction::using_move(
                poke.slot,
                candidates[index].move_name.clone(),
                Some(default_target),
            ));
        }
        actions
    }

    /// Weighted draw from the heuristic softmax; uniform when the
    /// distribution degenerates.
    fn sample_guided(
        &self,
        state: &BattleSnapshot,
        candidates: &[ActionCandidate],
        rng: &mut SmallRng,
    ) -> usize {
        let weights = self.evaluator.action_weights(state, candidates);
        if weights.len() == candidates.len() {
            if let Ok(dist) = WeightedIndex::new(&weights) {
                return dist.sample(rng);
            }
        }
        rng.gen_range(0..candidates.len())
    }

    /// Replace side B's sampled actions where the opponent model says the
    /// slot protects or switches instead.
    fn overlay_opponent_model(
        &self,
        state: &BattleSnapshot,
        actions: &mut SimTurnActions,
        rng: &mut SmallRng,
    ) {
        let Some(model) = &self.opponent_model else {
            return;
        };
        let Some(sample) = model.sample(state, rng) else {
            return;
        };
        for action in &mut actions.player_b {
            let slot = action.slot;
            if slot >= 2 {
                continue;
            }
            if sample.protect[slot] {
                *action = SimAction::using_move(slot, "Protect", None);
            } else if sample.switch[slot] {
                if let Some(reserve) = state.player_b.reserves.first() {
                    *action = SimAction::switching(slot, reserve.clone());
                }
            }
        }
    }

    /// Resolve one simulated turn in place: moves deal modeled damage,
    /// switches and terastallization mutate the acting side, then fainted
    /// Pokemon leave the field and forced replacements come in.
    fn apply_turn(&self, state: &mut BattleSnapshot, actions: &SimTurnActions, rng: &mut SmallRng) {
        let mut protected = [false; 4];
        for (side, list) in [(SideId::A, &actions.player_a), (SideId::B, &actions.player_b)] {
            for action in list {
                if action.is_protect() {
                    protected[absolute_slot(side, action.slot)] = true;
                }
            }
        }

        for (side, list) in [(SideId::A, &actions.player_a), (SideId::B, &actions.player_b)] {
            for action in list {
                match action.kind {
                    SimActionKind::Move => {
                        self.apply_move(state, side, action, &protected, rng);
                    }
                    SimActionKind::Switch => {
                        if let Some(reserve) = &action.switch_to {
                            state.side_mut(side).switch_in(action.slot, reserve);
                        }
                    }
                    SimActionKind::Terastallize => {
                        if let Some(tera) = action.tera_type {
                            let side_state = state.side_mut(side);
                            if let Some(poke) =
                                side_state.active.iter_mut().find(|p| p.slot == action.slot)
                            {
                                poke.tera_type = Some(tera);
                            }
                        }
                    }
                }
            }
        }

        state.remove_fainted();
        refill_from_reserves(state, SideId::A);
        refill_from_reserves(state, SideId::B);
        state.turn += 1;
    }

    fn apply_move(
        &self,
        state: &mut BattleSnapshot,
        side: SideId,
        action: &SimAction,
        protected: &[bool; 4],
        rng: &mut SmallRng,
    ) {
        if action.is_protect() {
            return;
        }
        let Some(move_name) = action.move_name.as_deref() else {
            return;
        };
        let target = action
            .target
            .unwrap_or_else(|| default_target_for(state, side));
        if protected[target] {
            return;
        }
        let (def_side, def_slot) = split_absolute(target);

        let damage = {
            let attacker = state
                .side(side)
                .active
                .iter()
                .find(|p| p.slot == action.slot && p.is_alive());
            let defender = state
                .side(def_side)
                .active
                .iter()
                .find(|p| p.slot == def_slot && p.is_alive());
            match (attacker, defender) {
                (Some(att), Some(def)) => estimate_damage(state, att, def, move_name, rng),
                _ => 0.0,
            }
        };
        if damage > 0.0 {
            let side_state = state.side_mut(def_side);
            if let Some(defender) = side_state.active.iter_mut().find(|p| p.slot == def_slot) {
                defender.apply_damage(damage);
            }
        }
    }
}

/// Convert an annotated candidate to a simulated action for one side
fn candidate_to_sim(candidate: &ActionCandidate, side: SideId) -> SimAction {
    if candidate.metadata.is_switch {
        return SimAction::switching(candidate.slot, candidate.move_name.clone());
    }
    let own_base = match side {
        SideId::A => 0,
        SideId::B => 2,
    };
    let opp_base = match side {
        SideId::A => 2,
        SideId::B => 0,
    };
    let target = match candidate.target {
        Some(ActionTarget::Opponent(slot)) => opp_base + slot.min(1),
        Some(ActionTarget::Ally(slot)) => own_base + slot.min(1),
        Some(ActionTarget::User) => own_base + candidate.slot.min(1),
        None => opp_base,
    };
    SimAction::using_move(candidate.slot, candidate.move_name.clone(), Some(target))
}

/// First alive opposing slot, as an absolute board index
fn default_target_for(state: &BattleSnapshot, side: SideId) -> usize {
    let opponent = side.opponent();
    let base = match opponent {
        SideId::A => 0,
        SideId::B => 2,
    };
    state
        .side(opponent)
        .active
        .iter()
        .find(|p| p.is_alive())
        .map_or(base, |p| base + p.slot.min(1))
}

fn absolute_slot(side: SideId, slot: usize) -> usize {
    match side {
        SideId::A => slot.min(1),
        SideId::B => 2 + slot.min(1),
    }
}

fn split_absolute(target: usize) -> (SideId, usize) {
    if target < 2 {
        (SideId::A, target)
    } else {
        (SideId::B, target - 2)
    }
}

/// Candidates for a playout turn: the Pokemon's known moves, or a generic
/// attack when nothing is revealed yet.
fn move_candidates(poke: &PokemonBattleState) -> Vec<ActionCandidate> {
    if poke.moves.is_empty() {
        return vec![ActionCandidate::new(&poke.name, poke.slot, "Tackle")];
    }
    poke.moves
        .iter()
        .map(|m| ActionCandidate::new(&poke.name, poke.slot, m))
        .collect()
}

/// Forced switch-ins after faints: empty active slots fill from the
/// reserves at full HP.
fn refill_from_reserves(state: &mut BattleSnapshot, side: SideId) {
    let side_state = state.side_mut(side);
    while side_state.active.len() < 2 && !side_state.reserves.is_empty() {
        let slot = if side_state.active.iter().any(|p| p.slot == 0) {
            1
        } else {
            0
        };
        let mut incoming = PokemonBattleState::new(side_state.reserves.remove(0));
        incoming.slot = slot;
        side_state.active.push(incoming);
    }
}

/// Known move powers and types for the damage model; anything unrecognized
/// falls back to a typeless 75-power attack.
fn move_profile(move_name: &str) -> (f32, Option<Type>) {
    match move_name.to_lowercase().as_str() {
        "protect" | "detect" | "wide guard" => (0.0, None),
        "fake out" => (40.0, Some(Type::Normal)),
        "tackle" => (40.0, Some(Type::Normal)),
        "icy wind" => (55.0, Some(Type::Ice)),
        "grassy glide" => (70.0, Some(Type::Grass)),
        "rock slide" => (75.0, Some(Type::Rock)),
        "shadow ball" => (80.0, Some(Type::Ghost)),
        "thunderbolt" => (90.0, Some(Type::Electric)),
        "surf" => (90.0, Some(Type::Water)),
        "heat wave" => (95.0, Some(Type::Fire)),
        "moonblast" => (95.0, Some(Type::Fairy)),
        "earthquake" => (100.0, Some(Type::Ground)),
        "hydro pump" => (110.0, Some(Type::Water)),
        "close combat" => (120.0, Some(Type::Fighting)),
        "flare blitz" => (120.0, Some(Type::Fire)),
        "wood hammer" => (120.0, Some(Type::Grass)),
        _ => (75.0, None),
    }
}

/// Abilities that grant outright immunity to an attacking type
fn ability_grants_immunity(defender: &PokemonBattleState, attacking: Type) -> bool {
    match attacking {
        Type::Ground => defender.has_ability("Levitate"),
        Type::Fire => defender.has_ability("Flash Fire"),
        Type::Electric => {
            defender.has_ability("Volt Absorb") || defender.has_ability("Lightning Rod")
        }
        Type::Water => defender.has_ability("Water Absorb") || defender.has_ability("Storm Drain"),
        _ => false,
    }
}

/// Coarse damage model: fraction of the defender's max HP removed by one
/// hit, with a uniform 0.85-1.0 roll.
fn estimate_damage(
    state: &BattleSnapshot,
    attacker: &PokemonBattleState,
    defender: &PokemonBattleState,
    move_name: &str,
    rng: &mut SmallRng,
) -> f32 {
    let (power, move_type) = move_profile(move_name);
    if power <= 0.0 {
        return 0.0;
    }

    let attack = stats_for(state, attacker).offense() as f32;
    let defense = stats_for(state, defender).bulk() as f32;

    let effectiveness = match move_type {
        Some(attacking) => {
            if ability_grants_immunity(defender, attacking) {
                return 0.0;
            }
            // Terastallization replaces the defensive typing outright
            match defender.tera_type {
                Some(tera) => attacking.effectiveness(tera),
                None => attacking.effectiveness_multi(&defender.types),
            }
        }
        None => 1.0,
    };
    if effectiveness == 0.0 {
        return 0.0;
    }

    let item_modifier = match item_key(attacker) {
        Some("life orb") => 1.3,
        Some("choice band") | Some("choice specs") => 1.5,
        Some("expert belt") if effectiveness > 1.0 => 1.2,
        _ => 1.0,
    };

    let roll: f32 = rng.gen_range(0.85..=1.0);
    (power * attack / defense / 200.0 * effectiveness * item_modifier * roll).min(1.0)
}

fn item_key(poke: &PokemonBattleState) -> Option<&str> {
    // Display-cased names from upstream map onto the lowercase keys
    poke.item.as_deref().map(|i| match i {
        "Life Orb" => "life orb",
        "Choice Band" => "choice band",
        "Choice Specs" => "choice specs",
        "Expert Belt" => "expert belt",
        other => other,
    })
}

fn stats_for(state: &BattleSnapshot, poke: &PokemonBattleState) -> augur_battle::BaseStats {
    if let Some(stats) = &poke.stats {
        return stats.clone();
    }
    state
        .stat_estimates
        .get(&poke.name)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use augur_battle::SideState;

    fn pokemon(name: &str, slot: usize, hp: f32, moves: &[&str]) -> PokemonBattleState {
        let mut p = PokemonBattleState::new(name);
        p.slot = slot;
        p.hp_fraction = hp;
        p.moves = moves.iter().map(|m| m.to_string()).collect();
        p
    }

    fn mid_battle_snapshot() -> BattleSnapshot {
        let mut a = SideState::new("A");
        a.active = vec![
            pokemon("Rillaboom", 0, 1.0, &["Grassy Glide", "Wood Hammer"]),
            pokemon("Heatran", 1, 0.8, &["Heat Wave", "Protect"]),
        ];
        a.reserves = vec!["Urshifu".to_string()];
        let mut b = SideState::new("B");
        b.active = vec![
            pokemon("Incineroar", 0, 0.9, &["Flare Blitz", "Fake Out"]),
            pokemon("Amoonguss", 1, 0.6, &["Protect"]),
        ];
        b.reserves = vec!["Grimmsnarl".to_string()];
        BattleSnapshot::new(a, b)
    }

    fn small_config(seed: u64) -> MonteCarloConfig {
        MonteCarloConfig {
            rollouts: 40,
            max_turns: 20,
            seed: Some(seed),
            ..MonteCarloConfig::default()
        }
    }

    #[test]
    fn test_terminal_snapshot_skips_rollouts() {
        let mut snap = mid_battle_snapshot();
        snap.player_b.active.clear();
        snap.player_b.reserves.clear();
        let report = MonteCarloStrategist::new(small_config(1)).predict_win_rate(&snap);
        assert_eq!(report.player_a_win_rate, 1.0);
        assert_eq!(report.player_b_win_rate, 0.0);
        assert_eq!(report.total_rollouts, 0);
        assert!(report.optimal_action.is_none());
    }

    #[test]
    fn test_double_knockout_is_a_draw() {
        let mut snap = mid_battle_snapshot();
        snap.player_a.active.clear();
        snap.player_a.reserves.clear();
        snap.player_b.active.clear();
        snap.player_b.reserves.clear();
        let report = MonteCarloStrategist::new(small_config(1)).predict_win_rate(&snap);
        assert_eq!(report.player_a_win_rate, 0.5);
        assert_eq!(report.total_rollouts, 0);
    }

    #[test]
    fn test_fixed_seed_is_deterministic() {
        let snap = mid_battle_snapshot();
        let first = MonteCarloStrategist::new(small_config(42)).predict_win_rate(&snap);
        let second = MonteCarloStrategist::new(small_config(42)).predict_win_rate(&snap);
        assert_eq!(first.player_a_win_rate, second.player_a_win_rate);
        assert_eq!(first.action_win_rates, second.action_win_rates);
        assert_eq!(first.optimal_action_index, second.optimal_action_index);
    }

    #[test]
    fn test_every_root_action_gets_at_least_one_trial() {
        let mut config = small_config(3);
        config.rollouts = 1;
        let report = MonteCarloStrategist::new(config).predict_win_rate(&mid_battle_snapshot());
        assert!(!report.action_stats.is_empty());
        for stats in &report.action_stats {
            assert_eq!(stats.trials, 1);
        }
        assert_eq!(report.total_rollouts, report.action_stats.len());
    }

    #[test]
    fn test_overwhelming_position_favors_side_a() {
        let mut a = SideState::new("A");
        a.active = vec![pokemon("Urshifu", 0, 1.0, &["Close Combat"])];
        a.reserves = vec!["Rillaboom".to_string(), "Heatran".to_string()];
        let mut b = SideState::new("B");
        b.active = vec![pokemon("Sliver", 0, 0.05, &["Tackle"])];
        let snap = BattleSnapshot::new(a, b);

        let report = MonteCarloStrategist::new(small_config(7)).predict_win_rate(&snap);
        assert!(report.player_a_win_rate > 0.7, "{}", report.player_a_win_rate);
    }

    #[test]
    fn test_legal_actions_become_roots_in_order() {
        let mut snap = mid_battle_snapshot();
        let mut glide = ActionCandidate::new("Rillaboom", 0, "Grassy Glide");
        glide.target = Some(ActionTarget::Opponent(1));
        let protect = ActionCandidate::new("Heatran", 1, "Protect");
        snap.legal_actions
            .insert(SideId::A, vec![glide.clone(), protect.clone()]);

        let report = MonteCarloStrategist::new(small_config(5)).predict_win_rate(&snap);
        assert_eq!(report.root_candidates, vec![glide, protect]);
        assert_eq!(report.action_win_rates.len(), 2);
        let best = report.optimal_action_index.unwrap();
        assert_eq!(report.action_win_rates[best], report.optimal_action_win_rate);
    }

    #[test]
    fn test_root_actions_truncate_to_limit() {
        let mut snap = mid_battle_snapshot();
        let candidates: Vec<ActionCandidate> = (0..15)
            .map(|i| ActionCandidate::new("Rillaboom", 0, format!("Move{i}")))
            .collect();
        snap.legal_actions.insert(SideId::A, candidates);
        let report = MonteCarloStrategist::new(small_config(5)).predict_win_rate(&snap);
        assert_eq!(report.root_candidates.len(), 10);
    }

    #[test]
    fn test_roots_derive_from_moves_without_legal_actions() {
        let snap = mid_battle_snapshot();
        let report = MonteCarloStrategist::new(small_config(9)).predict_win_rate(&snap);
        // Two actives with two and two known moves
        assert_eq!(report.root_candidates.len(), 4);
        assert_eq!(report.root_candidates[0].move_name, "Grassy Glide");
        assert!(report.optimal_action.is_some());
    }

    #[test]
    fn test_switch_candidate_becomes_switch_action() {
        let mut candidate = ActionCandidate::new("Rillaboom", 0, "Urshifu");
        candidate.metadata.is_switch = true;
        let sim = candidate_to_sim(&candidate, SideId::A);
        assert_eq!(sim.kind, SimActionKind::Switch);
        assert_eq!(sim.switch_to.as_deref(), Some("Urshifu"));
    }

    #[test]
    fn test_target_mapping_is_side_relative() {
        let mut candidate = ActionCandidate::new("Rillaboom", 0, "Grassy Glide");
        candidate.target = Some(ActionTarget::Opponent(1));
        assert_eq!(candidate_to_sim(&candidate, SideId::A).target, Some(3));
        assert_eq!(candidate_to_sim(&candidate, SideId::B).target, Some(1));
        candidate.target = Some(ActionTarget::Ally(1));
        assert_eq!(candidate_to_sim(&candidate, SideId::A).target, Some(1));
    }

    #[test]
    fn test_protect_blocks_damage_for_the_turn() {
        let mut snap = mid_battle_snapshot();
        snap.player_b.active.truncate(1);
        let strategist = MonteCarloStrategist::new(small_config(11));
        let mut rng = SmallRng::seed_from_u64(11);
        let turn = SimTurnActions {
            player_a: vec![SimAction::using_move(0, "Wood Hammer", Some(2))],
            player_b: vec![SimAction::using_move(0, "Protect", None)],
        };
        let before = snap.player_b.active[0].hp_fraction;
        let mut state = snap.clone();
        strategist.apply_turn(&mut state, &turn, &mut rng);
        assert_eq!(state.player_b.active[0].hp_fraction, before);
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn test_faint_triggers_forced_replacement() {
        let mut snap = mid_battle_snapshot();
        snap.player_b.active[1].hp_fraction = 0.0;
        let strategist = MonteCarloStrategist::new(small_config(13));
        let mut rng = SmallRng::seed_from_u64(13);
        let mut state = snap.clone();
        strategist.apply_turn(&mut state, &SimTurnActions::default(), &mut rng);
        assert_eq!(state.player_b.active.len(), 2);
        assert!(state.player_b.active.iter().any(|p| p.name == "Grimmsnarl"));
        assert!(state.player_b.reserves.is_empty());
    }

    #[test]
    fn test_immune_defender_takes_no_damage() {
        let snap = mid_battle_snapshot();
        let mut defender = pokemon("Rotom", 0, 1.0, &[]);
        defender.ability = Some("Levitate".to_string());
        let attacker = pokemon("Landorus", 0, 1.0, &[]);
        let mut rng = SmallRng::seed_from_u64(17);
        let damage = estimate_damage(&snap, &attacker, &defender, "Earthquake", &mut rng);
        assert_eq!(damage, 0.0);
    }

    #[test]
    fn test_type_chart_scales_damage() {
        let snap = mid_battle_snapshot();
        let attacker = pokemon("Urshifu", 0, 1.0, &[]);
        let mut water_weak = pokemon("Incineroar", 0, 1.0, &[]);
        water_weak.types = vec![Type::Fire];
        let mut water_resist = pokemon("Amoonguss", 0, 1.0, &[]);
        water_resist.types = vec![Type::Grass];

        let mut rng = SmallRng::seed_from_u64(19);
        let strong = estimate_damage(&snap, &attacker, &water_weak, "Surf", &mut rng);
        let mut rng = SmallRng::seed_from_u64(19);
        let weak = estimate_damage(&snap, &attacker, &water_resist, "Surf", &mut rng);
        assert!(strong > weak);
        assert!(strong <= 1.0);
    }

    #[test]
    fn test_turn_cap_on_level_board_awards_side_b() {
        let mut a = SideState::new("A");
        a.active = vec![pokemon("Mirror", 0, 1.0, &["Tackle"])];
        let mut b = SideState::new("B");
        b.active = vec![pokemon("Mirror", 0, 1.0, &["Tackle"])];
        let snap = BattleSnapshot::new(a, b);

        let strategist = MonteCarloStrategist::new(small_config(29));
        for seed in 0..8 {
            let mut rng = SmallRng::seed_from_u64(seed);
            assert!(!strategist.break_tie(&snap, &mut rng));
        }
    }

    #[test]
    fn test_algorithm_selection() {
        let config = small_config(23);
        assert!(MonteCarloStrategist::with_algorithm("heuristic", config.clone())
            .unwrap()
            .config()
            .use_heuristic);
        assert!(!MonteCarloStrategist::with_algorithm("montecarlo", config.clone())
            .unwrap()
            .config()
            .use_heuristic);
        assert!(MonteCarloStrategist::with_algorithm("ml", config.clone()).is_err());
        assert!(MonteCarloStrategist::with_algorithm("quantum", config).is_err());
    }
}
