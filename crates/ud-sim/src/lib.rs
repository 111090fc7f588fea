//! `ud-sim` - builds a campus simulation and drives its event loop.
//!
//! # Event loop
//!
//! ```text
//! build:
//!   enroll students → freeze groups → pick workplaces → seed compartments
//!   plan_weekly_events for every member      (all registrations before tick 0)
//!
//! run:
//!   while let Some(event) = scheduler.pop_next(end_tick):
//!     members[event.target].handle(event.action, ctx)   (may (re)schedule)
//!     observer.on_event(event, member)
//!   scheduler.shutdown()
//! ```
//!
//! One event is handled at a time, in `(tick, registration)` order, against
//! one shared RNG: a seed fully determines the trace.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ud_behavior::NoopGeography;
//! use ud_schedule::load_groups_csv;
//! use ud_sim::{load_facilities_csv, CampusConfig, NoopObserver, SimBuilder};
//!
//! let config = CampusConfig::load(Path::new("campus.toml"))?;
//! let facilities = load_facilities_csv(Path::new("facilities.csv"))?;
//! let groups = load_groups_csv(Path::new("groups.csv"))?;
//! let mut sim = SimBuilder::new(config, facilities, groups, NoopGeography).build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod loader;
pub mod observer;
pub mod sim;
pub mod trace;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use config::{CampusConfig, EnrollmentConfig, PopulationConfig};
pub use error::{SimError, SimResult};
pub use loader::{load_facilities_csv, load_facilities_reader};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
pub use trace::{CsvTraceWriter, EventTrace, TraceRow};
