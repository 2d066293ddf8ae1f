//! Strategy-weighted goal planning.
//!
//! Signals re-weight the seven strategies every turn, idle units draw a
//! strategy and get a goal from its handler, and the planner turns each
//! goal's next cell into at most one move order per unit.

pub mod goal;
pub mod handlers;
pub mod planner;
pub mod signals;
pub mod strategy;

pub use goal::{Goal, GoalError, Termination};
pub use handlers::{plan_goal, PlanContext, FALLBACK_CHAIN};
pub use planner::{PlannerState, TurnError, TurnPlanner, TurnReport};
pub use signals::BattlefieldSignals;
pub use strategy::{Preference, Strategy, StrategyWeights, ALL_STRATEGIES, STRATEGY_COUNT};
