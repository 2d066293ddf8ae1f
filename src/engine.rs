//! Engine state management.
//!
//! Holds the game settings, the current world snapshot, the planner state
//! and the RNG between judge commands, and answers `ready` and `go`.

use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::config::PlannerConfig;
use crate::plan::{PlannerState, TurnPlanner};
use crate::protocol::{write_go, write_orders, Command};
use crate::world::{GameSettings, MoveOrder, WorldState};

/// Holds the mutable state of the bot between commands.
pub struct Engine {
    pub settings: GameSettings,
    pub world: Option<WorldState>,
    pub state: PlannerState,
    planner: TurnPlanner,
    rng: SmallRng,
    /// Fixed seed from the command line; overrides the judge's seed.
    seed: Option<u64>,
    finished: bool,
}

impl Engine {
    /// Creates an engine waiting for the turn 0 settings.
    pub fn new(config: PlannerConfig) -> Self {
        Engine {
            settings: GameSettings::default(),
            world: None,
            state: PlannerState::from_config(&config),
            planner: TurnPlanner::new(config),
            rng: SmallRng::from_entropy(),
            seed: None,
            finished: false,
        }
    }

    /// Fixes the RNG seed. Zero keeps the default seeding.
    pub fn with_seed(mut self, seed: u64) -> Self {
        if seed != 0 {
            self.seed = Some(seed);
            self.rng = SmallRng::seed_from_u64(seed);
        }
        self
    }

    /// True once the judge has sent `end`.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Applies one judge command, writing any response to `out`.
    pub fn handle<W: Write>(&mut self, cmd: Command, out: &mut W) -> io::Result<()> {
        match cmd {
            Command::Turn(n) => self.start_turn(n),
            Command::Setting { key, value } => {
                if !self.settings.apply(&key, value) {
                    debug!(%key, value, "ignoring unknown setting");
                }
            }
            Command::Ready => return self.handle_ready(out),
            Command::Go => return self.handle_go(out),
            Command::End => self.finished = true,
            update => self.apply_update(update),
        }
        Ok(())
    }

    fn start_turn(&mut self, turn: u32) {
        if turn == 0 {
            self.settings = GameSettings::default();
            self.world = None;
            self.state = PlannerState::from_config(&self.planner.config);
            return;
        }
        match self.world.as_mut() {
            Some(world) => world.start_new_turn(turn),
            None => warn!(turn, "turn started before ready"),
        }
    }

    /// Handles `ready`: builds the empty world and answers `go`.
    pub fn handle_ready<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if self.seed.is_none() && self.settings.player_seed != 0 {
            self.rng = SmallRng::seed_from_u64(self.settings.player_seed);
        }
        self.world = Some(WorldState::new(self.settings.clone()));
        write_go(out)
    }

    fn apply_update(&mut self, cmd: Command) {
        let Some(world) = self.world.as_mut() else {
            warn!(?cmd, "map update before ready");
            return;
        };
        if world.size().area() == 0 {
            warn!(?cmd, "map update on a map with no cells");
            return;
        }
        match cmd {
            Command::Water { row, col } => world.add_water(world.wrap(row, col)),
            Command::Food { row, col } => world.add_food(world.wrap(row, col)),
            Command::RemoveFood { row, col } => world.remove_food(world.wrap(row, col)),
            Command::Unit { row, col, owner } => world.add_unit(world.wrap(row, col), owner),
            Command::Dead { row, col, .. } => world.add_dead(world.wrap(row, col)),
            // Hills are not tracked.
            _ => {}
        }
    }

    /// Handles `go`: plans the turn and writes the orders and `go`.
    pub fn handle_go<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let orders = self.play_turn();
        write_orders(out, &orders)
    }

    /// Plans the current turn. Faults and panics inside the planner are
    /// logged; whatever orders were issued before them are returned.
    pub fn play_turn(&mut self) -> Vec<MoveOrder> {
        let Some(world) = self.world.as_mut() else {
            warn!("go before ready");
            return Vec::new();
        };
        world.update_visibility();
        let world = &*world;

        let planner = &self.planner;
        let state = &mut self.state;
        let rng = &mut self.rng;
        let mut orders = Vec::new();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            planner.plan_turn(state, world, rng, &mut orders)
        }));

        match outcome {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!(turn = world.turn, issued = orders.len(), "turn cut short: {}", e),
            Err(_) => warn!(turn = world.turn, issued = orders.len(), "planner panicked"),
        }
        orders
    }
}
