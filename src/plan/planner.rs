//! The per-turn driver.
//!
//! Each turn: re-weight strategies from the fresh snapshot, walk our units
//! in roster order re-attaching or creating goals, turn each goal's next
//! cell into a move order, and drop goals whose unit did not show up.
//! Earlier units in the roster win contested cells.

use std::collections::HashSet;

use rand::Rng;
use tracing::{debug, info};

use super::goal::Goal;
use super::handlers::{plan_goal, PlanContext};
use super::signals::BattlefieldSignals;
use super::strategy::{Preference, Strategy, StrategyWeights};
use crate::config::PlannerConfig;
use crate::path::PathProvider;
use crate::world::{Location, MoveOrder, WorldState};

/// Nudges applied to Condense after losing units.
const LOSS_CONDENSE_NUDGES: usize = 3;

/// Faults that end a turn early. Orders issued before the fault stand.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("turn budget exhausted with {remaining_ms}ms left")]
    OutOfTime { remaining_ms: u64 },

    #[error("map has no cells ({rows}x{cols})")]
    EmptyMap { rows: usize, cols: usize },
}

/// Planner state that persists across turns.
#[derive(Debug, Clone)]
pub struct PlannerState {
    pub weights: StrategyWeights,
    pub goals: Vec<Goal>,
    /// Cells promised to a unit this turn.
    pub claimed: HashSet<Location>,
}

impl PlannerState {
    /// Fresh state with no goals.
    pub fn new(weights: StrategyWeights) -> Self {
        PlannerState {
            weights,
            goals: Vec::new(),
            claimed: HashSet::new(),
        }
    }

    /// Fresh state seeded with the configured initial weights.
    pub fn from_config(config: &PlannerConfig) -> Self {
        PlannerState::new(StrategyWeights::new(config.initial_weights))
    }
}

/// What happened during one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnReport {
    pub orders_issued: usize,
    pub goals_created: usize,
    pub goals_finished: usize,
    pub goals_lost: usize,
    pub units_blocked: usize,
}

/// Stateless turn driver; all persistent data lives in [`PlannerState`].
#[derive(Debug, Clone)]
pub struct TurnPlanner {
    pub config: PlannerConfig,
}

impl TurnPlanner {
    /// A planner driven by `config`.
    pub fn new(config: PlannerConfig) -> Self {
        TurnPlanner { config }
    }

    /// Plans one turn, appending move orders to `orders` as they are decided.
    ///
    /// On error the orders already appended are still valid and should be
    /// sent; goals of units not yet processed are left untouched.
    pub fn plan_turn<R: Rng>(
        &self,
        state: &mut PlannerState,
        world: &WorldState,
        rng: &mut R,
        orders: &mut Vec<MoveOrder>,
    ) -> Result<TurnReport, TurnError> {
        let size = world.size();
        if size.area() == 0 {
            return Err(TurnError::EmptyMap {
                rows: size.rows,
                cols: size.cols,
            });
        }
        self.check_time(world)?;

        let signals = BattlefieldSignals::compute(world, self.config.signal_range_multiple);
        signals.apply(&mut state.weights);

        state.claimed.clear();
        for goal in &mut state.goals {
            goal.unit_exists = false;
        }

        let paths = PathProvider::for_world(world, self.config.search_node_limit);
        let mut report = TurnReport::default();

        for unit in &world.my_units {
            let here = unit.location;
            self.check_time(world)?;

            let mut slot = None;
            if let Some(i) = state
                .goals
                .iter()
                .position(|g| !g.unit_exists && g.current_point == here)
            {
                if state.goals[i].is_terminated(world) {
                    let done = state.goals.remove(i);
                    debug!(
                        unit = %here,
                        strategy = done.strategy.name(),
                        steps = done.current_step,
                        "goal finished"
                    );
                    report.goals_finished += 1;
                } else {
                    state.goals[i].unit_exists = true;
                    slot = Some(i);
                }
            }

            let i = match slot {
                Some(i) => i,
                None => {
                    let strategy = if world.time_remaining() < self.config.critical_time() {
                        Strategy::Scatter
                    } else {
                        state.weights.sample(rng)
                    };
                    let targeted_food: HashSet<Location> = state
                        .goals
                        .iter()
                        .filter(|g| g.strategy == Strategy::GatherFood)
                        .map(|g| g.end_point())
                        .collect();
                    let ctx = PlanContext {
                        world,
                        paths,
                        signals: &signals,
                        claimed: &state.claimed,
                        targeted_food: &targeted_food,
                        min_time: self.config.min_turn_time(),
                    };
                    let Some(goal) = plan_goal(strategy, &ctx, here, rng) else {
                        debug!(unit = %here, "no goal possible, holding");
                        report.units_blocked += 1;
                        continue;
                    };
                    debug!(
                        unit = %here,
                        strategy = goal.strategy.name(),
                        target = %goal.end_point(),
                        "new goal"
                    );
                    report.goals_created += 1;
                    state.goals.push(goal);
                    state.goals.len() - 1
                }
            };

            match take_step(&mut state.goals[i], world, &mut state.claimed) {
                Some(order) => {
                    orders.push(order);
                    report.orders_issued += 1;
                }
                None => report.units_blocked += 1,
            }
        }

        let before = state.goals.len();
        state.goals.retain(|g| g.unit_exists);
        report.goals_lost = before - state.goals.len();
        if report.goals_lost > 0 {
            for _ in 0..LOSS_CONDENSE_NUDGES {
                state
                    .weights
                    .alter(Strategy::Condense, Preference::StronglyEncourage);
            }
        }

        info!(
            turn = world.turn,
            orders = report.orders_issued,
            created = report.goals_created,
            finished = report.goals_finished,
            lost = report.goals_lost,
            blocked = report.units_blocked,
            "turn planned"
        );
        Ok(report)
    }

    fn check_time(&self, world: &WorldState) -> Result<(), TurnError> {
        let remaining = world.time_remaining();
        if remaining < self.config.min_turn_time() {
            return Err(TurnError::OutOfTime {
                remaining_ms: remaining.as_millis() as u64,
            });
        }
        Ok(())
    }
}

/// Tries the ranked directions toward the goal's next cell and takes the
/// first whose destination is free, passable and unclaimed.
fn take_step(
    goal: &mut Goal,
    world: &WorldState,
    claimed: &mut HashSet<Location>,
) -> Option<MoveOrder> {
    let from = goal.current_point;
    let next = goal.next_step()?;
    for dir in world.directions_towards(from, next) {
        let dest = world.destination(from, dir);
        if world.is_unoccupied(dest) && world.is_passable(dest) && !claimed.contains(&dest) {
            claimed.insert(dest);
            goal.advance(dest);
            return Some(MoveOrder::new(from, dir));
        }
    }
    None
}
