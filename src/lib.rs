//! Colonist, a goal-directed planning bot for the Ants grid-world contest.
//!
//! Exposes the world model, path provider, planner, protocol and engine
//! modules for use by integration tests and the binary entry point.

pub mod config;
pub mod engine;
pub mod path;
pub mod plan;
pub mod protocol;
pub mod world;

#[cfg(test)]
mod test_support;
