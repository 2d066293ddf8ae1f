//! Strategy handlers: turn a chosen strategy into a concrete goal.
//!
//! Each handler either returns a goal or a [`GoalError`] explaining why it
//! could not. [`plan_goal`] walks the fixed fallback chain once and ends
//! with a wander step that succeeds whenever any neighbor is free.

use std::collections::HashSet;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::goal::{Goal, GoalError, Termination};
use super::signals::BattlefieldSignals;
use super::strategy::Strategy;
use crate::path::PathProvider;
use crate::world::{Direction, Location, Tile, WorldState, ALL_DIRECTIONS};

/// Order in which handlers are retried after the chosen one fails.
pub const FALLBACK_CHAIN: [Strategy; 7] = [
    Strategy::GatherFood,
    Strategy::Scout,
    Strategy::Fight,
    Strategy::SpreadOut,
    Strategy::Scatter,
    Strategy::Condense,
    Strategy::Retreat,
];

/// How many of the nearest targets a handler tries before giving up.
const MAX_TARGET_ATTEMPTS: usize = 3;

/// Fight targets may be this many times farther than the signal range.
const FIGHT_RANGE_FACTOR: usize = 4;

/// Everything a handler may read while building a goal.
pub struct PlanContext<'a> {
    pub world: &'a WorldState,
    pub paths: PathProvider,
    pub signals: &'a BattlefieldSignals,
    /// Cells already promised to a unit this turn.
    pub claimed: &'a HashSet<Location>,
    /// Food cells some live goal is already heading for.
    pub targeted_food: &'a HashSet<Location>,
    /// No path search starts once less than this much turn time is left.
    pub min_time: Duration,
}

impl PlanContext<'_> {
    fn out_of_time(&self) -> bool {
        self.world.time_remaining() < self.min_time
    }
}

/// Builds a goal for `unit`, falling back through [`FALLBACK_CHAIN`] and
/// finally a wander step. `None` means every neighbor is blocked.
///
/// Once the turn budget runs low the chain is abandoned and only the
/// search-free wander step is tried.
pub fn plan_goal<R: Rng>(
    strategy: Strategy,
    ctx: &PlanContext<'_>,
    unit: Location,
    rng: &mut R,
) -> Option<Goal> {
    let fallbacks = FALLBACK_CHAIN.into_iter().filter(|s| *s != strategy);
    let chain = std::iter::once(strategy).chain(fallbacks);
    for candidate in chain {
        match build_goal(candidate, ctx, unit, rng) {
            Ok(goal) => return Some(goal),
            Err(GoalError::OutOfTime) => {
                debug!(%unit, strategy = candidate.name(), "out of time, wandering");
                break;
            }
            Err(e) => debug!(%unit, strategy = candidate.name(), "handler failed: {}", e),
        }
    }

    wander(ctx, unit).ok()
}

/// Runs the handler for a single strategy.
pub fn build_goal<R: Rng>(
    strategy: Strategy,
    ctx: &PlanContext<'_>,
    unit: Location,
    rng: &mut R,
) -> Result<Goal, GoalError> {
    match strategy {
        Strategy::Fight => fight(ctx, unit),
        Strategy::Scout => scout(ctx, unit, rng),
        Strategy::GatherFood => gather_food(ctx, unit),
        Strategy::Scatter => scatter(ctx, unit, rng),
        Strategy::Condense => condense(ctx, unit),
        Strategy::Retreat => retreat(ctx, unit),
        Strategy::SpreadOut => spread_out(ctx, unit),
    }
}

/// Heads for the nearest food nobody else is already fetching.
fn gather_food(ctx: &PlanContext<'_>, unit: Location) -> Result<Goal, GoalError> {
    let world = ctx.world;
    let mut candidates: Vec<Location> = world
        .food
        .iter()
        .copied()
        .filter(|f| !ctx.targeted_food.contains(f))
        .collect();
    candidates.sort_by_key(|f| (world.distance(unit, *f), *f));

    try_targets(
        ctx,
        unit,
        &candidates,
        Strategy::GatherFood,
        Termination::FoodGone,
    )
}

/// Heads for the nearest enemy within fighting range.
fn fight(ctx: &PlanContext<'_>, unit: Location) -> Result<Goal, GoalError> {
    let world = ctx.world;
    let range2 = ctx.signals.range2 * FIGHT_RANGE_FACTOR;
    let mut candidates: Vec<Location> = world
        .enemy_units
        .iter()
        .map(|u| u.location)
        .filter(|e| world.distance2(unit, *e) <= range2)
        .collect();
    candidates.sort_by_key(|e| (world.distance(unit, *e), *e));

    try_targets(ctx, unit, &candidates, Strategy::Fight, Termination::EnemyGone)
}

/// Walks toward distant ground, preferring cells never seen and cells away
/// from the rest of the colony.
fn scout<R: Rng>(ctx: &PlanContext<'_>, unit: Location, rng: &mut R) -> Result<Goal, GoalError> {
    let world = ctx.world;
    let reach = (2 * ctx.paths.perception_radius).max(1) as i64;

    let mut targets: Vec<Location> = ALL_DIRECTIONS
        .iter()
        .map(|d| {
            let (dr, dc) = d.delta();
            world.wrap(
                unit.row as i64 + dr * reach,
                unit.col as i64 + dc * reach,
            )
        })
        .filter(|t| *t != unit && world.is_passable(*t))
        .collect();
    targets.shuffle(rng);

    let centroid = ctx.signals.friendly_centroid.unwrap_or(unit);
    targets.sort_by_key(|t| {
        (
            world.was_seen(*t),
            std::cmp::Reverse(world.distance(centroid, *t)),
        )
    });

    try_targets(ctx, unit, &targets, Strategy::Scout, |_| Termination::Never)
}

/// One step in a random free direction.
fn scatter<R: Rng>(
    ctx: &PlanContext<'_>,
    unit: Location,
    rng: &mut R,
) -> Result<Goal, GoalError> {
    let mut dirs = ALL_DIRECTIONS;
    dirs.shuffle(rng);
    step_goal(ctx, unit, &dirs)
}

/// One step to the first free neighbor in fixed order. The last resort.
fn wander(ctx: &PlanContext<'_>, unit: Location) -> Result<Goal, GoalError> {
    step_goal(ctx, unit, &ALL_DIRECTIONS)
}

/// Walks to the free cell nearest the friendly centroid.
fn condense(ctx: &PlanContext<'_>, unit: Location) -> Result<Goal, GoalError> {
    let world = ctx.world;
    let centroid = ctx
        .signals
        .friendly_centroid
        .ok_or(GoalError::NoTarget(Strategy::Condense))?;
    if world.distance(unit, centroid) <= 1 {
        return Err(GoalError::NoTarget(Strategy::Condense));
    }
    let target =
        settle_target(world, unit, centroid).ok_or(GoalError::NoTarget(Strategy::Condense))?;
    try_targets(ctx, unit, &[target], Strategy::Condense, Termination::CellOccupied)
}

/// Backs away from the enemy centroid by the signal range.
fn retreat(ctx: &PlanContext<'_>, unit: Location) -> Result<Goal, GoalError> {
    let world = ctx.world;
    let threat = ctx
        .signals
        .enemy_centroid
        .ok_or(GoalError::NoTarget(Strategy::Retreat))?;
    let reach = ((ctx.signals.range2 as f64).sqrt().round() as i64).max(1);
    let away = away_from(world, unit, threat, reach).ok_or(GoalError::NoTarget(Strategy::Retreat))?;
    let target = settle_target(world, unit, away).ok_or(GoalError::NoTarget(Strategy::Retreat))?;
    try_targets(ctx, unit, &[target], Strategy::Retreat, |_| Termination::Never)
}

/// Moves away from the nearest teammate within sight.
fn spread_out(ctx: &PlanContext<'_>, unit: Location) -> Result<Goal, GoalError> {
    let world = ctx.world;
    let sight2 = world.settings.view_radius2 as usize;
    let nearest = world
        .my_units
        .iter()
        .map(|u| u.location)
        .filter(|l| *l != unit && world.distance2(unit, *l) <= sight2)
        .min_by_key(|l| (world.distance2(unit, *l), *l))
        .ok_or(GoalError::NoTarget(Strategy::SpreadOut))?;

    let reach = ctx.paths.perception_radius.max(1) as i64;
    let away =
        away_from(world, unit, nearest, reach).ok_or(GoalError::NoTarget(Strategy::SpreadOut))?;
    let target =
        settle_target(world, unit, away).ok_or(GoalError::NoTarget(Strategy::SpreadOut))?;
    try_targets(ctx, unit, &[target], Strategy::SpreadOut, |_| Termination::Never)
}

/// Tries the first few targets in order, returning the first goal whose
/// path can be found.
fn try_targets(
    ctx: &PlanContext<'_>,
    unit: Location,
    targets: &[Location],
    strategy: Strategy,
    termination: impl Fn(Location) -> Termination,
) -> Result<Goal, GoalError> {
    let mut last_err = GoalError::NoTarget(strategy);
    for &target in targets.iter().take(MAX_TARGET_ATTEMPTS) {
        if ctx.out_of_time() {
            return Err(GoalError::OutOfTime);
        }
        match ctx.paths.find_path(ctx.world, unit, target) {
            Some(path) => {
                return goal_from_path(ctx.world, unit, path, termination(target), strategy)
            }
            None => {
                last_err = GoalError::NoPath {
                    from: unit,
                    to: target,
                }
            }
        }
    }
    Err(last_err)
}

/// Greedy paths may cross water further on, but never on the first step.
fn goal_from_path(
    world: &WorldState,
    unit: Location,
    path: Vec<Tile>,
    termination: Termination,
    strategy: Strategy,
) -> Result<Goal, GoalError> {
    if path.len() < 2 {
        return Err(GoalError::NoTarget(strategy));
    }
    if !world.is_passable(path[1].location) {
        let to = path[path.len() - 1].location;
        return Err(GoalError::NoPath { from: unit, to });
    }
    Goal::new(unit, path, termination, strategy)
}

/// A one-step Scatter goal onto the first free neighbor in `dirs`.
fn step_goal(
    ctx: &PlanContext<'_>,
    unit: Location,
    dirs: &[Direction],
) -> Result<Goal, GoalError> {
    let world = ctx.world;
    let dest = dirs
        .iter()
        .map(|d| world.destination(unit, *d))
        .find(|dest| is_free(ctx, *dest))
        .ok_or(GoalError::NoTarget(Strategy::Scatter))?;
    let path = vec![world.tile(unit), world.tile(dest)];
    Goal::new(unit, path, Termination::Never, Strategy::Scatter)
}

fn is_free(ctx: &PlanContext<'_>, loc: Location) -> bool {
    ctx.world.is_passable(loc) && ctx.world.is_unoccupied(loc) && !ctx.claimed.contains(&loc)
}

/// The point `reach` cells from `unit` directly away from `from`.
fn away_from(world: &WorldState, unit: Location, from: Location, reach: i64) -> Option<Location> {
    let size = world.size();
    let dr = signed_delta(from.row, unit.row, size.rows);
    let dc = signed_delta(from.col, unit.col, size.cols);
    let magnitude = dr.abs() + dc.abs();
    if magnitude == 0 {
        return None;
    }
    let row = unit.row as i64 + (dr * reach) / magnitude;
    let col = unit.col as i64 + (dc * reach) / magnitude;
    let target = world.wrap(row, col);
    (target != unit).then_some(target)
}

/// `target` if a unit could end there, else its free neighbor closest to
/// `unit`.
fn settle_target(world: &WorldState, unit: Location, target: Location) -> Option<Location> {
    if world.is_unoccupied(target) {
        return Some(target);
    }
    ALL_DIRECTIONS
        .iter()
        .map(|d| world.destination(target, *d))
        .filter(|n| *n != unit && world.is_unoccupied(*n))
        .min_by_key(|n| (world.distance(unit, *n), *n))
}

/// Shortest signed offset from `from` to `to` on a ring of length `len`.
fn signed_delta(from: usize, to: usize, len: usize) -> i64 {
    let len = len as i64;
    let mut d = to as i64 - from as i64;
    if d > len / 2 {
        d -= len;
    } else if d < -(len / 2) {
        d += len;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{loc, open_world};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    struct Fixture {
        world: WorldState,
        signals: BattlefieldSignals,
        claimed: HashSet<Location>,
        targeted: HashSet<Location>,
    }

    impl Fixture {
        fn new(world: WorldState) -> Self {
            let signals = BattlefieldSignals::compute(&world, 3.0);
            Fixture {
                world,
                signals,
                claimed: HashSet::new(),
                targeted: HashSet::new(),
            }
        }

        fn ctx(&self) -> PlanContext<'_> {
            PlanContext {
                world: &self.world,
                paths: PathProvider::for_world(&self.world, 2000),
                signals: &self.signals,
                claimed: &self.claimed,
                targeted_food: &self.targeted,
                min_time: Duration::ZERO,
            }
        }
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(3)
    }

    #[test]
    fn gather_food_targets_nearest_food_across_the_wrap() {
        let mut w = open_world(20, 20);
        w.add_unit(loc(0, 0), 0);
        w.add_food(loc(0, 19));
        w.add_food(loc(5, 5));
        let f = Fixture::new(w);
        let goal = build_goal(Strategy::GatherFood, &f.ctx(), loc(0, 0), &mut rng()).unwrap();
        assert_eq!(goal.end_point(), loc(0, 19));
        assert_eq!(goal.termination, Termination::FoodGone(loc(0, 19)));
        assert_eq!(goal.remaining().len(), 1);
    }

    #[test]
    fn gather_food_skips_targeted_food() {
        let mut w = open_world(20, 20);
        w.add_unit(loc(0, 0), 0);
        w.add_food(loc(0, 2));
        w.add_food(loc(3, 0));
        let mut f = Fixture::new(w);
        f.targeted.insert(loc(0, 2));
        let goal = build_goal(Strategy::GatherFood, &f.ctx(), loc(0, 0), &mut rng()).unwrap();
        assert_eq!(goal.end_point(), loc(3, 0));
    }

    #[test]
    fn gather_food_without_food_has_no_target() {
        let mut w = open_world(20, 20);
        w.add_unit(loc(0, 0), 0);
        let f = Fixture::new(w);
        let err = build_goal(Strategy::GatherFood, &f.ctx(), loc(0, 0), &mut rng()).unwrap_err();
        assert_eq!(err, GoalError::NoTarget(Strategy::GatherFood));
    }

    #[test]
    fn fight_needs_an_enemy_in_range() {
        let mut w = open_world(40, 40);
        w.add_unit(loc(0, 0), 0);
        w.add_unit(loc(20, 20), 1);
        let f = Fixture::new(w);
        assert!(build_goal(Strategy::Fight, &f.ctx(), loc(0, 0), &mut rng()).is_err());

        let mut w = open_world(40, 40);
        w.add_unit(loc(0, 0), 0);
        w.add_unit(loc(0, 4), 1);
        let f = Fixture::new(w);
        let goal = build_goal(Strategy::Fight, &f.ctx(), loc(0, 0), &mut rng()).unwrap();
        assert_eq!(goal.end_point(), loc(0, 4));
        assert_eq!(goal.termination, Termination::EnemyGone(loc(0, 4)));
    }

    #[test]
    fn scout_prefers_unseen_ground() {
        let mut w = WorldState::new(crate::world::GameSettings {
            rows: 60,
            cols: 60,
            view_radius2: 9,
            turn_time_ms: 10_000,
            ..Default::default()
        });
        let unit = loc(30, 30);
        w.add_unit(unit, 0);
        w.update_visibility();
        // Everything except the cell six rows north is already seen.
        for idx in 0..w.size().area() {
            let l = w.size().location_at(idx);
            if l != loc(24, 30) {
                w.mark_seen(l);
            }
        }
        let f = Fixture::new(w);
        let goal = build_goal(Strategy::Scout, &f.ctx(), unit, &mut rng()).unwrap();
        assert_eq!(goal.end_point(), loc(24, 30));
        assert_eq!(goal.termination, Termination::Never);
    }

    #[test]
    fn scatter_avoids_claimed_and_blocked_cells() {
        let mut w = open_world(10, 10);
        let unit = loc(5, 5);
        w.add_unit(unit, 0);
        w.add_water(loc(4, 5));
        w.add_unit(loc(6, 5), 0);
        let mut f = Fixture::new(w);
        f.claimed.insert(loc(5, 6));
        for seed in 0..10 {
            let mut r = SmallRng::seed_from_u64(seed);
            let goal = build_goal(Strategy::Scatter, &f.ctx(), unit, &mut r).unwrap();
            assert_eq!(goal.end_point(), loc(5, 4));
        }
    }

    #[test]
    fn condense_fails_when_already_central() {
        let mut w = open_world(20, 20);
        w.add_unit(loc(5, 5), 0);
        w.add_unit(loc(5, 6), 0);
        let f = Fixture::new(w);
        let err = build_goal(Strategy::Condense, &f.ctx(), loc(5, 5), &mut rng()).unwrap_err();
        assert_eq!(err, GoalError::NoTarget(Strategy::Condense));
    }

    #[test]
    fn condense_walks_toward_centroid() {
        let mut w = open_world(20, 20);
        w.add_unit(loc(2, 2), 0);
        w.add_unit(loc(2, 8), 0);
        w.add_unit(loc(8, 5), 0);
        let f = Fixture::new(w);
        let goal = build_goal(Strategy::Condense, &f.ctx(), loc(2, 2), &mut rng()).unwrap();
        assert_eq!(goal.end_point(), loc(4, 5));
        assert_eq!(goal.termination, Termination::CellOccupied(loc(4, 5)));
    }

    #[test]
    fn retreat_moves_away_from_enemies() {
        let mut w = open_world(40, 40);
        w.add_unit(loc(20, 20), 0);
        w.add_unit(loc(20, 23), 1);
        let f = Fixture::new(w);
        let goal = build_goal(Strategy::Retreat, &f.ctx(), loc(20, 20), &mut rng()).unwrap();
        assert!(goal.end_point().col < 20);
        assert_eq!(goal.end_point().row, 20);
    }

    #[test]
    fn retreat_without_enemies_has_no_target() {
        let mut w = open_world(20, 20);
        w.add_unit(loc(2, 2), 0);
        let f = Fixture::new(w);
        let err = build_goal(Strategy::Retreat, &f.ctx(), loc(2, 2), &mut rng()).unwrap_err();
        assert_eq!(err, GoalError::NoTarget(Strategy::Retreat));
    }

    #[test]
    fn spread_out_moves_away_from_nearest_friend() {
        let mut w = open_world(40, 40);
        w.add_unit(loc(20, 20), 0);
        w.add_unit(loc(22, 20), 0);
        let f = Fixture::new(w);
        let goal = build_goal(Strategy::SpreadOut, &f.ctx(), loc(20, 20), &mut rng()).unwrap();
        assert!(goal.end_point().row < 20);
    }

    #[test]
    fn spread_out_alone_has_no_target() {
        let mut w = open_world(40, 40);
        w.add_unit(loc(20, 20), 0);
        let f = Fixture::new(w);
        assert!(build_goal(Strategy::SpreadOut, &f.ctx(), loc(20, 20), &mut rng()).is_err());
    }

    #[test]
    fn chain_falls_back_to_a_wander_step() {
        // Tiny map where only the east neighbor is free and nothing else applies.
        let mut w = open_world(20, 20);
        let unit = loc(5, 5);
        w.add_unit(unit, 0);
        for l in [loc(4, 5), loc(6, 5), loc(5, 4)] {
            w.add_water(l);
        }
        let f = Fixture::new(w);
        let goal = plan_goal(Strategy::Fight, &f.ctx(), unit, &mut rng()).unwrap();
        assert!(goal.next_step().is_some());
    }

    #[test]
    fn boxed_in_unit_gets_no_goal() {
        let mut w = open_world(20, 20);
        let unit = loc(5, 5);
        w.add_unit(unit, 0);
        for dir in ALL_DIRECTIONS {
            let n = w.destination(unit, dir);
            w.add_water(n);
        }
        let f = Fixture::new(w);
        assert!(plan_goal(Strategy::Condense, &f.ctx(), unit, &mut rng()).is_none());
    }

    #[test]
    fn low_budget_skips_searches_and_wanders() {
        let mut w = WorldState::new(crate::world::GameSettings {
            rows: 20,
            cols: 20,
            turn_time_ms: 0,
            ..Default::default()
        });
        let unit = loc(5, 5);
        w.add_unit(unit, 0);
        w.add_food(loc(5, 8));
        w.update_visibility();
        let f = Fixture::new(w);
        let ctx = PlanContext {
            min_time: Duration::from_millis(10),
            ..f.ctx()
        };

        let err = build_goal(Strategy::GatherFood, &ctx, unit, &mut rng()).unwrap_err();
        assert_eq!(err, GoalError::OutOfTime);

        let goal = plan_goal(Strategy::GatherFood, &ctx, unit, &mut rng()).unwrap();
        assert_eq!(goal.strategy, Strategy::Scatter);
        assert_eq!(goal.remaining().len(), 1);
        assert_eq!(goal.next_step(), Some(loc(4, 5)));
    }

    #[test]
    fn signed_delta_takes_the_short_way() {
        assert_eq!(signed_delta(0, 19, 20), -1);
        assert_eq!(signed_delta(19, 0, 20), 1);
        assert_eq!(signed_delta(3, 7, 20), 4);
        assert_eq!(signed_delta(7, 3, 20), -4);
    }
}
