//! Strategy tags and the weight vector that arbitrates between them.
//!
//! Weights are raw, unnormalized sampling magnitudes. They are nudged by
//! small fixed increments every turn and floored at zero; nothing ever
//! rescales them to sum to one.

use rand::Rng;

/// Number of strategies.
pub const STRATEGY_COUNT: usize = 7;

/// A behavior a unit can commit to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Fight,
    Scout,
    GatherFood,
    Scatter,
    Condense,
    Retreat,
    SpreadOut,
}

/// All strategies in enumeration (and weight-index) order.
pub const ALL_STRATEGIES: [Strategy; STRATEGY_COUNT] = [
    Strategy::Fight,
    Strategy::Scout,
    Strategy::GatherFood,
    Strategy::Scatter,
    Strategy::Condense,
    Strategy::Retreat,
    Strategy::SpreadOut,
];

impl Strategy {
    /// Position in [`ALL_STRATEGIES`] and in the weight array.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Strategy::Fight => "fight",
            Strategy::Scout => "scout",
            Strategy::GatherFood => "gather-food",
            Strategy::Scatter => "scatter",
            Strategy::Condense => "condense",
            Strategy::Retreat => "retreat",
            Strategy::SpreadOut => "spread-out",
        }
    }
}

/// How strongly a battlefield signal pushes a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preference {
    StronglyEncourage,
    MildlyEncourage,
    Neutral,
    MildlyDiscourage,
    StronglyDiscourage,
}

impl Preference {
    /// The signed weight change this preference applies.
    pub const fn increment(self) -> f64 {
        match self {
            Preference::StronglyEncourage => 0.01,
            Preference::MildlyEncourage => 0.005,
            Preference::Neutral => 0.0,
            Preference::MildlyDiscourage => -0.005,
            Preference::StronglyDiscourage => -0.01,
        }
    }
}

/// Per-strategy sampling weights.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyWeights {
    weights: [f64; STRATEGY_COUNT],
}

impl StrategyWeights {
    /// Creates a weight vector; negative entries are raised to zero.
    pub fn new(weights: [f64; STRATEGY_COUNT]) -> Self {
        StrategyWeights {
            weights: weights.map(|w| w.max(0.0)),
        }
    }

    pub fn get(&self, strategy: Strategy) -> f64 {
        self.weights[strategy.index()]
    }

    pub fn as_array(&self) -> &[f64; STRATEGY_COUNT] {
        &self.weights
    }

    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Nudges one strategy's weight, never below zero.
    pub fn alter(&mut self, strategy: Strategy, preference: Preference) {
        let w = &mut self.weights[strategy.index()];
        *w = (*w + preference.increment()).max(0.0);
    }

    /// Maps a draw in `[0, total)` onto a strategy by cumulative weight.
    /// Draws outside every bucket select the last strategy.
    pub fn select(&self, draw: f64) -> Strategy {
        let mut cumulative = 0.0;
        for (i, w) in self.weights.iter().enumerate() {
            cumulative += w;
            if draw < cumulative {
                return ALL_STRATEGIES[i];
            }
        }
        ALL_STRATEGIES[STRATEGY_COUNT - 1]
    }

    /// Samples a strategy in proportion to its weight.
    ///
    /// The draw is an integer in `[0, total * 100)` scaled by 0.01. A total
    /// below a hundredth always draws 0, so the first non-zero weight wins.
    /// A zero total selects the last strategy.
    pub fn sample(&self, rng: &mut impl Rng) -> Strategy {
        let total = self.total();
        if total <= 0.0 {
            return ALL_STRATEGIES[STRATEGY_COUNT - 1];
        }
        let bound = (total * 100.0).floor() as u64;
        let draw = if bound == 0 {
            0.0
        } else {
            rng.gen_range(0..bound) as f64 * 0.01
        };
        self.select(draw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn indices_follow_enumeration_order() {
        for (i, s) in ALL_STRATEGIES.iter().enumerate() {
            assert_eq!(s.index(), i);
        }
        assert_eq!(Strategy::GatherFood.index(), 2);
    }

    #[test]
    fn alter_applies_increment() {
        let mut w = StrategyWeights::new([0.5; STRATEGY_COUNT]);
        w.alter(Strategy::Fight, Preference::StronglyEncourage);
        w.alter(Strategy::Scout, Preference::MildlyDiscourage);
        w.alter(Strategy::Retreat, Preference::Neutral);
        assert!((w.get(Strategy::Fight) - 0.51).abs() < 1e-12);
        assert!((w.get(Strategy::Scout) - 0.495).abs() < 1e-12);
        assert_eq!(w.get(Strategy::Retreat), 0.5);
    }

    #[test]
    fn weights_never_go_negative() {
        let mut w = StrategyWeights::new([0.02; STRATEGY_COUNT]);
        for _ in 0..50 {
            w.alter(Strategy::Condense, Preference::StronglyDiscourage);
        }
        assert_eq!(w.get(Strategy::Condense), 0.0);
        w.alter(Strategy::Condense, Preference::MildlyDiscourage);
        assert_eq!(w.get(Strategy::Condense), 0.0);
    }

    #[test]
    fn negative_initial_weights_are_floored() {
        let w = StrategyWeights::new([-1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(w.get(Strategy::Fight), 0.0);
        assert_eq!(w.total(), 1.0);
    }

    #[test]
    fn pure_weight_always_selected() {
        let w = StrategyWeights::new([0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..500 {
            assert_eq!(w.sample(&mut rng), Strategy::GatherFood);
        }
        for draw in [0.0, 0.5, 0.99] {
            assert_eq!(w.select(draw), Strategy::GatherFood);
        }
    }

    #[test]
    fn tiny_total_picks_the_only_weighted_strategy() {
        let w = StrategyWeights::new([0.0, 0.0, 0.005, 0.0, 0.0, 0.0, 0.0]);
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..20 {
            assert_eq!(w.sample(&mut rng), Strategy::GatherFood);
        }
    }

    #[test]
    fn zero_total_selects_last() {
        let w = StrategyWeights::new([0.0; STRATEGY_COUNT]);
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(w.sample(&mut rng), Strategy::SpreadOut);
    }

    #[test]
    fn select_scans_cumulative_sums() {
        let w = StrategyWeights::new([0.1, 0.2, 0.3, 0.0, 0.0, 0.0, 0.4]);
        assert_eq!(w.select(0.05), Strategy::Fight);
        assert_eq!(w.select(0.15), Strategy::Scout);
        assert_eq!(w.select(0.45), Strategy::GatherFood);
        assert_eq!(w.select(0.95), Strategy::SpreadOut);
        assert_eq!(w.select(5.0), Strategy::SpreadOut);
    }

    #[test]
    fn sampling_roughly_tracks_weights() {
        let w = StrategyWeights::new([1.0, 0.0, 3.0, 0.0, 0.0, 0.0, 0.0]);
        let mut rng = SmallRng::seed_from_u64(42);
        let gather = (0..4000)
            .filter(|_| w.sample(&mut rng) == Strategy::GatherFood)
            .count();
        assert!(gather > 2700 && gather < 3300, "gather = {}", gather);
    }
}
