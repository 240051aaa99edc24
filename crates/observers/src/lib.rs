//! Reusable observers for fitkit minimizers.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work with any solver whose events and actions implement them.
//!
//! # Modules
//!
//! - [`traits`] — Capability traits for generic observers
//!   ([`HasIteration`], [`HasObjective`], [`HasEdm`], [`CanStopEarly`])
//!
//! # Observers
//!
//! - [`TracingObserver`] — logs each event through `tracing`
//! - [`History`] — records a convergence history
//! - [`StopBelow`] — stops once the cost reaches a target
//!
//! [`Observer`]: fitkit_core::Observer
//! [`HasIteration`]: traits::HasIteration
//! [`HasObjective`]: traits::HasObjective
//! [`HasEdm`]: traits::HasEdm
//! [`CanStopEarly`]: traits::CanStopEarly

pub mod traits;

mod history;
mod logging;
mod stop;

pub use history::{History, Record};
pub use logging::TracingObserver;
pub use stop::StopBelow;
