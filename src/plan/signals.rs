//! Battlefield signals and the fixed rule table that turns them into
//! strategy weight nudges.

use super::strategy::{Preference, Strategy, StrategyWeights};
use crate::world::{Location, WorldState};

/// A summary of the local balance of forces around our units.
///
/// "Nearby" means within `range_multiple` attack radii (squared Euclidean,
/// wrap-aware) of the friendly centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct BattlefieldSignals {
    pub friendly_centroid: Option<Location>,
    pub enemy_centroid: Option<Location>,
    pub friendly_total: usize,
    pub enemy_total: usize,
    pub friendly_nearby: usize,
    pub enemy_nearby: usize,
    pub food_nearby: usize,
    pub range2: usize,
}

impl BattlefieldSignals {
    pub fn compute(world: &WorldState, range_multiple: f64) -> Self {
        let range2 =
            (range_multiple * range_multiple * world.settings.attack_radius2 as f64) as usize;
        let friendly: Vec<Location> = world.my_units.iter().map(|u| u.location).collect();
        let enemy: Vec<Location> = world.enemy_units.iter().map(|u| u.location).collect();
        let friendly_centroid = centroid(world, &friendly);
        let enemy_centroid = centroid(world, &enemy);

        let count_near = |locs: &[Location]| match friendly_centroid {
            Some(c) => locs
                .iter()
                .filter(|l| world.distance2(c, **l) <= range2)
                .count(),
            None => 0,
        };

        BattlefieldSignals {
            friendly_centroid,
            enemy_centroid,
            friendly_total: friendly.len(),
            enemy_total: enemy.len(),
            friendly_nearby: count_near(&friendly),
            enemy_nearby: count_near(&enemy),
            food_nearby: count_near(&world.food),
            range2,
        }
    }

    /// The rule table: every nudge these signals call for, in order.
    pub fn adjustments(&self) -> Vec<(Strategy, Preference)> {
        use Preference::*;
        use Strategy::*;

        let mut out = Vec::new();
        if self.enemy_nearby > self.friendly_nearby {
            out.push((Retreat, StronglyEncourage));
            out.push((Condense, MildlyEncourage));
            out.push((Fight, StronglyDiscourage));
        }
        if self.enemy_nearby > 0 && self.friendly_nearby >= 2 * self.enemy_nearby {
            out.push((Fight, StronglyEncourage));
            out.push((Retreat, MildlyDiscourage));
        }
        if self.enemy_nearby == 0 {
            out.push((Scout, MildlyEncourage));
            out.push((SpreadOut, MildlyEncourage));
            out.push((Fight, MildlyDiscourage));
        }
        if self.food_nearby > 0 {
            out.push((GatherFood, StronglyEncourage));
        } else {
            out.push((GatherFood, MildlyDiscourage));
            out.push((Scout, MildlyEncourage));
        }
        if self.friendly_total > 4 && 2 * self.friendly_nearby > self.friendly_total {
            out.push((SpreadOut, MildlyEncourage));
            out.push((Condense, MildlyDiscourage));
        }
        if self.friendly_total > 1 && self.friendly_nearby == 0 {
            out.push((Condense, MildlyEncourage));
        }
        out.push((Scatter, MildlyDiscourage));
        out
    }

    pub fn apply(&self, weights: &mut StrategyWeights) {
        for (strategy, preference) in self.adjustments() {
            weights.alter(strategy, preference);
        }
    }
}

/// Arithmetic mean of the coordinates, rounded. Not wrap-aware: a group
/// straddling the map edge averages toward the middle.
pub fn centroid(world: &WorldState, locations: &[Location]) -> Option<Location> {
    if locations.is_empty() {
        return None;
    }
    let n = locations.len() as f64;
    let row: f64 = locations.iter().map(|l| l.row as f64).sum::<f64>() / n;
    let col: f64 = locations.iter().map(|l| l.col as f64).sum::<f64>() / n;
    Some(world.wrap(row.round() as i64, col.round() as i64))
}
