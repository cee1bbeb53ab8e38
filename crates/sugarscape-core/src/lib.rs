//! Configuration, spawning, and the tick cycle for the Sugarscape simulation.
//!
//! This crate owns the scheduler that drives the simulation: regrowth,
//! shuffled move/eat/die, reshuffled bilateral trade, and data collection.
//!
//! # Modules
//!
//! - [`collector`] -- Per-tick model and agent reports ([`DataCollector`]).
//! - [`config`] -- Configuration loading from `sugarscape-config.yaml` into
//!   strongly-typed structs.
//! - [`runner`] -- Bounded run loop with a per-tick callback.
//! - [`spawn`] -- Seeded construction of the initial population.
//! - [`tick`] -- The tick cycle and [`SimulationState`].
//!
//! [`DataCollector`]: collector::DataCollector
//! [`SimulationState`]: tick::SimulationState

pub mod collector;
pub mod config;
pub mod runner;
pub mod spawn;
pub mod tick;
