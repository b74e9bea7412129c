//! Hand-tuned board and action scoring
//!
//! The evaluator is stateless: it holds only weights and an optional game
//! plan, so one instance is safe to share across concurrent rollout trials
//! without synchronization.

use augur_battle::{
    ActionCandidate, ActionTag, ActionTarget, BattleSnapshot, SideId, SideState,
};
use serde::Serialize;

/// Weights for the board-score terms
#[derive(Debug, Clone)]
pub struct EvalWeights {
    pub hp: f32,
    pub status: f32,
    pub reserves: f32,
    pub speed: f32,
    pub field: f32,
    pub threat: f32,
    pub plan_progress: f32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            hp: 3.0,
            status: 0.75,
            reserves: 0.5,
            speed: 0.25,
            field: 0.4,
            threat: 1.0,
            plan_progress: 0.8,
        }
    }
}

/// Match-level plan handed down by the planner: which opposing Pokemon are
/// the biggest threats, and which the team intends to knock out.
#[derive(Debug, Clone, Default)]
pub struct GamePlan {
    pub primary_threats: Vec<String>,
    pub ko_targets: Vec<String>,
}

/// Normalized score for one suggested action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionScore {
    #[serde(rename = "move")]
    pub move_name: String,
    pub target: Option<ActionTarget>,
    pub score: f32,
}

/// Ranked suggestions for one active Pokemon; scores sum to 1
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonRecommendation {
    pub name: String,
    pub suggested_moves: Vec<ActionScore>,
}

/// Win rate and per-Pokemon suggestions for one side
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEvaluation {
    pub win_rate: f32,
    pub active: Vec<PokemonRecommendation>,
}

/// Full evaluation: both sides' win rates sum to exactly 1
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub player_a: PlayerEvaluation,
    pub player_b: PlayerEvaluation,
}

/// Softmax temperature for playout sampling; below 1 sharpens toward the
/// best-scoring actions while keeping exploration alive.
const PLAYOUT_TEMPERATURE: f32 = 0.5;

/// Score floor so no candidate is ever sampled with probability zero
const SCORE_FLOOR: f32 = 0.01;

/// Pure-function scorer over battle snapshots.
///
/// Used three ways: as the externally reported recommendation, as the
/// turn-cap tie-break inside rollouts, and as the sampling bias for guided
/// playouts.
#[derive(Debug, Clone, Default)]
pub struct HeuristicEvaluator {
    weights: EvalWeights,
    game_plan: Option<GamePlan>,
}

impl HeuristicEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: EvalWeights) -> Self {
        Self {
            weights,
            game_plan: None,
        }
    }

    pub fn with_game_plan(mut self, plan: GamePlan) -> Self {
        self.game_plan = Some(plan);
        self
    }

    /// Win rates and action suggestions for both sides
    pub fn evaluate(&self, snapshot: &BattleSnapshot) -> EvaluationResult {
        let board = self.board_score(snapshot);
        let win_rate_a = sigmoid(board);
        EvaluationResult {
            player_a: PlayerEvaluation {
                win_rate: win_rate_a,
                active: self.score_side_actions(SideId::A, snapshot),
            },
            player_b: PlayerEvaluation {
                win_rate: 1.0 - win_rate_a,
                active: self.score_side_actions(SideId::B, snapshot),
            },
        }
    }

    /// Raw board score: positive favors side A, negative side B.
    ///
    /// Also used as the sign-based tie-break when a rollout hits the turn
    /// cap without a terminal state.
    pub fn board_score(&self, snapshot: &BattleSnapshot) -> f32 {
        let a = &snapshot.player_a;
        let b = &snapshot.player_b;

        let mut field_bonus = 0.0;
        if snapshot.room.is_some_and(|r| r.is_speed_control()) {
            field_bonus += 0.3;
        }
        if snapshot
            .weather
            .is_some_and(|w| matches!(w, augur_battle::Weather::Rain | augur_battle::Weather::Sun))
        {
            field_bonus += 0.1;
        }

        let mut value = 0.0;
        value += self.weights.hp * (a.total_active_hp() - b.total_active_hp());
        value += self.weights.status * (b.status_count() as f32 - a.status_count() as f32);
        value += self.weights.reserves * (a.reserves.len() as f32 - b.reserves.len() as f32);
        value += self.weights.speed * (a.speed_boost_sum() - b.speed_boost_sum()) as f32;
        value += self.weights.field * field_bonus;
        value += a.score_bias - b.score_bias;

        if let Some(plan) = &self.game_plan {
            value -= self.weights.threat * threat_penalty(plan, b);
            value += self.weights.plan_progress * plan_progress(plan, b);
        }

        value
    }

    /// Additive score for one annotated candidate (before normalization)
    pub fn score_candidate(&self, action: &ActionCandidate) -> f32 {
        // Base prior keeps every candidate off zero
        let mut score = 0.1;

        for tag in &action.tags {
            score += tag_bonus(*tag);
        }

        let meta = &action.metadata;
        if meta.is_stab {
            score += 0.2;
        }
        if meta.is_super_effective {
            score += 0.35;
        }
        if let Some(coverage) = meta.coverage_multiplier {
            score += 0.1 * coverage;
        }
        if let Some(damage) = &meta.estimated_damage {
            score += 0.4 * damage.ko_chance;
            score += 0.1 * (damage.max_percent / 100.0);
            score += 0.05 * damage.hit_chance;
        }
        // Encourage spread coverage on the second opposing slot
        if action.target == Some(ActionTarget::Opponent(1)) {
            score += 0.05;
        }

        // Switching out at high HP reads as a panic switch
        if meta.is_switch {
            let actor_hp = meta.actor_hp_fraction.unwrap_or(1.0);
            if actor_hp > 0.7 {
                score -= 0.4;
            } else if actor_hp > 0.4 {
                score -= 0.15;
            } else {
                score -= 0.05;
            }
        }

        // Back-to-back protects fail more often the longer the streak
        if action.is_protect() && meta.consecutive_protects > 0 {
            score -= 0.3 * meta.consecutive_protects as f32;
        }

        if meta.is_immune {
            score -= 1.0;
        }
        if meta.is_not_very_effective {
            score -= 0.15;
        }

        score.max(SCORE_FLOOR)
    }

    /// Sampling distribution for guided playouts: candidate scores with
    /// rollout-specific adjustments, pushed through a sharpened softmax.
    ///
    /// Returns an empty vector for an empty action list; falls back to a
    /// uniform distribution if the normalizer degenerates.
    pub fn action_weights(
        &self,
        snapshot: &BattleSnapshot,
        actions: &[ActionCandidate],
    ) -> Vec<f32> {
        if actions.is_empty() {
            return Vec::new();
        }

        let scores: Vec<f32> = actions
            .iter()
            .map(|action| {
                let mut score = self.score_candidate(action);

                let actor_hp = snapshot
                    .player_a
                    .find_active(&action.actor)
                    .map_or(1.0, |p| p.hp_fraction);

                // A priority move is worth more when the actor may not
                // survive a normal-speed exchange
                if action.has_tag(ActionTag::Priority) && actor_hp < 0.4 {
                    score += 0.3;
                }
                // First protect in a streak is strong; the streak penalty
                // in score_candidate handles repeats
                if action.is_protect() {
                    score += 0.15;
                }
                if matches!(action.target, Some(ActionTarget::Ally(_))) {
                    score -= 0.3;
                }

                score.max(SCORE_FLOOR)
            })
            .collect();

        let exp_scores: Vec<f32> = scores
            .iter()
            .map(|s| (s / PLAYOUT_TEMPERATURE).exp())
            .collect();
        let total: f32 = exp_scores.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            let uniform = 1.0 / actions.len() as f32;
            return vec![uniform; actions.len()];
        }
        exp_scores.into_iter().map(|s| s / total).collect()
    }

    fn score_side_actions(&self, side: SideId, snapshot: &BattleSnapshot) -> Vec<PokemonRecommendation> {
        let actions = snapshot.legal_for(side);
        if actions.is_empty() {
            return fallback_recommendations(snapshot.side(side));
        }

        // Group scores per actor, preserving first-seen order
        let mut per_actor: Vec<(String, Vec<ActionScore>)> = Vec::new();
        for action in actions {
            let score = self.score_candidate(action);
            let entry = ActionScore {
                move_name: action.move_name.clone(),
                target: action.target,
                score,
            };
            match per_actor.iter_mut().find(|(name, _)| *name == action.actor) {
                Some((_, list)) => list.push(entry),
                None => per_actor.push((action.actor.clone(), vec![entry])),
            }
        }

        per_actor
            .into_iter()
            .map(|(name, scores)| PokemonRecommendation {
                name,
                suggested_moves: normalize_scores(scores),
            })
            .collect()
    }
}

fn tag_bonus(tag: ActionTag) -> f32 {
    match tag {
        ActionTag::Protect => 0.5,
        ActionTag::Spread => 0.35,
        ActionTag::Priority => 0.2,
        ActionTag::SpeedControl => 0.35,
        ActionTag::Boost => 0.3,
        ActionTag::Pivot => 0.25,
    }
}

/// Penalty for opposing primary threats still in play: a healthy active
/// threat weighs more than one waiting in the back.
fn threat_penalty(plan: &GamePlan, opponent: &SideState) -> f32 {
    let mut penalty = 0.0;
    for threat in &plan.primary_threats {
        let active = opponent
            .active
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(threat) && p.is_alive());
        if let Some(poke) = active {
            penalty += poke.hp_fraction * 0.5;
        } else if opponent.reserves.iter().any(|r| r.eq_ignore_ascii_case(threat)) {
            penalty += 0.3;
        }
    }
    penalty
}

/// Bonus per designated knock-out target already removed from play
fn plan_progress(plan: &GamePlan, opponent: &SideState) -> f32 {
    let mut progress = 0.0;
    for target in &plan.ko_targets {
        let still_active = opponent
            .active
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(target) && p.is_alive());
        let in_reserve = opponent.reserves.iter().any(|r| r.eq_ignore_ascii_case(target));
        if !still_active && !in_reserve {
            progress += 0.5;
        }
    }
    progress
}

/// Normalize scores to sum to 1; uniform fallback when everything is
/// non-positive.
fn normalize_scores(scores: Vec<ActionScore>) -> Vec<ActionScore> {
    let total: f32 = scores.iter().map(|s| s.score.max(0.0)).sum();
    if total <= 0.0 {
        let uniform = if scores.is_empty() {
            0.0
        } else {
            1.0 / scores.len() as f32
        };
        return scores
            .into_iter()
            .map(|s| ActionScore { score: uniform, ..s })
            .collect();
    }
    scores
        .into_iter()
        .map(|s| ActionScore {
            score: s.score.max(0.0) / total,
            ..s
        })
        .collect()
}

/// With no legal actions supplied, every active Pokemon can only Struggle
fn fallback_recommendations(side: &SideState) -> Vec<PokemonRecommendation> {
    side.active
        .iter()
        .map(|poke| PokemonRecommendation {
            name: poke.name.clone(),
            suggested_moves: vec![ActionScore {
                move_name: "Struggle".to_string(),
                target: None,
                score: 1.0,
            }],
        })
        .collect()
}

fn sigmoid(value: f32) -> f32 {
    1.0 / (1.0 + (-value).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use augur_battle::{
        is_immune, is_super_effective, ActionMetadata, DamageEstimate, PokemonBattleState, Room,
        Status, Type,
    };

    fn pokemon(name: &str, slot: usize, hp: f32) -> PokemonBattleState {
        let mut p = PokemonBattleState::new(name);
        p.slot = slot;
        p.hp_fraction = hp;
        p
    }

    fn snapshot() -> BattleSnapshot {
        let mut a = SideState::new("A");
        a.active = vec![pokemon("Rillaboom", 0, 1.0), pokemon("Heatran", 1, 0.8)];
        a.reserves = vec!["Urshifu".to_string()];
        let mut b = SideState::new("B");
        b.active = vec![pokemon("Incineroar", 0, 0.9), pokemon("Amoonguss", 1, 0.6)];
        b.reserves = vec!["Grimmsnarl".to_string()];
        BattleSnapshot::new(a, b)
    }

    #[test]
    fn test_win_rates_sum_to_one() {
        let evaluator = HeuristicEvaluator::new();
        let result = evaluator.evaluate(&snapshot());
        let sum = result.player_a.win_rate + result.player_b.win_rate;
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let evaluator = HeuristicEvaluator::new();
        let snap = snapshot();
        let first = evaluator.evaluate(&snap);
        let second = evaluator.evaluate(&snap);
        assert_eq!(first.player_a.win_rate, second.player_a.win_rate);
        assert_eq!(first.player_b.win_rate, second.player_b.win_rate);
    }

    #[test]
    fn test_board_score_hp_monotonicity() {
        let evaluator = HeuristicEvaluator::new();
        let low = snapshot();
        let mut high = low.clone();
        high.player_a.active[1].hp_fraction = 1.0;
        assert!(evaluator.board_score(&high) >= evaluator.board_score(&low));
    }

    #[test]
    fn test_status_hurts_the_afflicted_side() {
        let evaluator = HeuristicEvaluator::new();
        let clean = snapshot();
        let mut burned = clean.clone();
        burned.player_a.active[0].status = Some(Status::Burn);
        assert!(evaluator.board_score(&burned) < evaluator.board_score(&clean));
    }

    #[test]
    fn test_trick_room_adds_field_bonus() {
        let evaluator = HeuristicEvaluator::new();
        let plain = snapshot();
        let mut room = plain.clone();
        room.room = Some(Room::Trick);
        assert!(evaluator.board_score(&room) > evaluator.board_score(&plain));
    }

    #[test]
    fn test_game_plan_threat_penalty() {
        let plain = HeuristicEvaluator::new();
        let planned = HeuristicEvaluator::new().with_game_plan(GamePlan {
            primary_threats: vec!["Incineroar".to_string()],
            ko_targets: Vec::new(),
        });
        let snap = snapshot();
        assert!(planned.board_score(&snap) < plain.board_score(&snap));
    }

    #[test]
    fn test_game_plan_progress_bonus() {
        let planned = HeuristicEvaluator::new().with_game_plan(GamePlan {
            primary_threats: Vec::new(),
            ko_targets: vec!["Dragonite".to_string()],
        });
        let plain = HeuristicEvaluator::new();
        // Dragonite is nowhere on side B, so the target counts as defeated
        let snap = snapshot();
        assert!(planned.board_score(&snap) > plain.board_score(&snap));
    }

    #[test]
    fn test_suggested_scores_sum_to_one_per_pokemon() {
        let evaluator = HeuristicEvaluator::new();
        let mut snap = snapshot();
        let mut protect = ActionCandidate::new("Rillaboom", 0, "Protect");
        protect.tags = vec![ActionTag::Protect];
        let mut glide = ActionCandidate::new("Rillaboom", 0, "Grassy Glide");
        glide.target = Some(ActionTarget::Opponent(0));
        let mut lava = ActionCandidate::new("Heatran", 1, "Heat Wave");
        lava.target = Some(ActionTarget::Opponent(1));
        snap.legal_actions.insert(SideId::A, vec![protect, glide, lava]);

        let result = evaluator.evaluate(&snap);
        assert_eq!(result.player_a.active.len(), 2);
        for rec in &result.player_a.active {
            let sum: f32 = rec.suggested_moves.iter().map(|m| m.score).sum();
            assert!((sum - 1.0).abs() < 1e-5, "{} sums to {sum}", rec.name);
        }
    }

    #[test]
    fn test_fallback_recommendation_is_struggle() {
        let evaluator = HeuristicEvaluator::new();
        let result = evaluator.evaluate(&snapshot());
        for rec in &result.player_a.active {
            assert_eq!(rec.suggested_moves.len(), 1);
            assert_eq!(rec.suggested_moves[0].move_name, "Struggle");
            assert_eq!(rec.suggested_moves[0].score, 1.0);
        }
    }

    #[test]
    fn test_consecutive_protect_scores_strictly_lower() {
        let evaluator = HeuristicEvaluator::new();
        let mut first = ActionCandidate::new("Incineroar", 0, "Protect");
        first.tags = vec![ActionTag::Protect];
        let mut second = first.clone();
        second.metadata.consecutive_protects = 1;
        assert!(evaluator.score_candidate(&second) < evaluator.score_candidate(&first));
    }

    #[test]
    fn test_immune_action_ranks_at_the_bottom() {
        let evaluator = HeuristicEvaluator::new();
        let mut snap = snapshot();
        // Annotate against a Ground/Water target the way upstream does
        let target_types = [Type::Ground, Type::Water];
        let mut immune = ActionCandidate::new("Rillaboom", 0, "Thunderbolt");
        immune.metadata.is_immune = is_immune(&target_types, Type::Electric);
        assert!(immune.metadata.is_immune);
        let mut strong = ActionCandidate::new("Rillaboom", 0, "Wood Hammer");
        strong.metadata = ActionMetadata {
            is_stab: true,
            is_super_effective: is_super_effective(&target_types, Type::Grass),
            estimated_damage: Some(DamageEstimate {
                min_percent: 60.0,
                max_percent: 80.0,
                ko_chance: 0.4,
                hit_chance: 1.0,
            }),
            ..Default::default()
        };
        assert!(strong.metadata.is_super_effective);
        let neutral = ActionCandidate::new("Rillaboom", 0, "U-turn");
        snap.legal_actions
            .insert(SideId::A, vec![immune.clone(), strong, neutral]);

        let result = evaluator.evaluate(&snap);
        let rec = &result.player_a.active[0];
        let immune_score = rec
            .suggested_moves
            .iter()
            .find(|m| m.move_name == "Thunderbolt")
            .unwrap()
            .score;
        assert!(rec
            .suggested_moves
            .iter()
            .all(|m| m.move_name == "Thunderbolt" || m.score >= immune_score));
    }

    #[test]
    fn test_panic_switch_penalty_scales_with_hp() {
        let evaluator = HeuristicEvaluator::new();
        let mut healthy = ActionCandidate::new("Heatran", 1, "Urshifu");
        healthy.metadata.is_switch = true;
        healthy.metadata.actor_hp_fraction = Some(0.9);
        let mut hurt = healthy.clone();
        hurt.metadata.actor_hp_fraction = Some(0.2);
        assert!(evaluator.score_candidate(&hurt) > evaluator.score_candidate(&healthy));
    }

    #[test]
    fn test_action_weights_sum_to_one() {
        let evaluator = HeuristicEvaluator::new();
        let snap = snapshot();
        let actions = vec![
            ActionCandidate::new("Rillaboom", 0, "Grassy Glide"),
            ActionCandidate::new("Rillaboom", 0, "Protect"),
            ActionCandidate::new("Heatran", 1, "Heat Wave"),
        ];
        let weights = evaluator.action_weights(&snap, &actions);
        assert_eq!(weights.len(), 3);
        let sum: f32 = weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(weights.iter().all(|w| *w > 0.0));
    }

    #[test]
    fn test_action_weights_empty_input() {
        let evaluator = HeuristicEvaluator::new();
        assert!(evaluator.action_weights(&snapshot(), &[]).is_empty());
    }

    #[test]
    fn test_priority_bonus_for_low_hp_actor() {
        let evaluator = HeuristicEvaluator::new();
        let mut snap = snapshot();
        snap.player_a.active[0].hp_fraction = 0.2;
        let mut priority = ActionCandidate::new("Rillaboom", 0, "Grassy Glide");
        priority.tags = vec![ActionTag::Priority];
        let plain = ActionCandidate::new("Rillaboom", 0, "Wood Hammer");

        let weights = evaluator.action_weights(&snap, &[priority, plain]);
        assert!(weights[0] > weights[1]);
    }

    #[test]
    fn test_ally_targeting_is_discouraged() {
        let evaluator = HeuristicEvaluator::new();
        let snap = snapshot();
        let mut friendly_fire = ActionCandidate::new("Heatran", 1, "Heat Wave");
        friendly_fire.target = Some(ActionTarget::Ally(0));
        let mut normal = ActionCandidate::new("Heatran", 1, "Heat Wave");
        normal.target = Some(ActionTarget::Opponent(0));

        let weights = evaluator.action_weights(&snap, &[friendly_fire, normal]);
        assert!(weights[1] > weights[0]);
    }
}
