//! Foundry Core -- a deterministic factory simulation core.
//!
//! This crate provides the simulation primitives for a tick-driven
//! factory world: rate-limited energy stores, a first-match recipe
//! registry, processing machines with slot-based upgrades, greedy
//! neighbor-push energy distribution, cooldown-gated item pipes, and a
//! compact recipe wire encoding.
//!
//! # Three-Phase Tick Pipeline
//!
//! Each call to [`sim::Factory::tick`] advances the simulation by one
//! tick through the following phases, each applied across all nodes
//! before the next begins:
//!
//! 1. **Process** -- Machines drain energy, advance recipe progress, and
//!    complete cycles.
//! 2. **Distribute** -- Cables push energy to adjacent stores, one
//!    simulate-then-commit transfer per directed edge.
//! 3. **Transport** -- Pipes push buffered item batches toward the node
//!    they face.
//!
//! Adjacency is never owned by the core: every neighbor is resolved
//! through the host's [`world::GridQuery`] at the moment it is used.
//!
//! # Key Types
//!
//! - [`sim::Factory`] -- Node bank and tick orchestrator.
//! - [`energy::EnergyStore`] -- Clamping, rate-limited energy buffer
//!   with simulate/commit transfer semantics.
//! - [`recipe::RecipeRegistry`] -- Immutable after load; stable
//!   registration-order first-match queries.
//! - [`machine::MachineNode`] -- Idle/Processing/Stalled state machine
//!   with per-tick upgrade resolution.
//! - [`transport::TransportLink`] -- Single-slot cooldown-gated pipe.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.
//! - [`wire`] -- Length-prefixed recipe encoding for process boundaries.

pub mod energy;
pub mod fixed;
pub mod id;
pub mod item;
pub mod machine;
pub mod network;
pub mod recipe;
pub mod sim;
pub mod transport;
pub mod wire;
pub mod world;
