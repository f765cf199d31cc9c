//! Control core — the layered, tick-driven state machines.
//!
//! Leaf-first: [`debounce`] filters raw contacts, [`actuator`] tracks a
//! commanded output, [`valve`] supervises physical travel over both,
//! [`pump`] adds maintenance bookkeeping, and [`zone`] runs the per-zone
//! heat-demand machine. The shared boiler/pump arbitration sits above all
//! of these in [`crate::app::service`].
//!
//! Everything here is pure logic driven by `update(now_ms, ...)` calls at a
//! steady cadence; hardware is reached only through the port traits passed
//! into each call.

pub mod actuator;
pub mod debounce;
pub mod pump;
pub mod valve;
pub mod zone;
