//! `ud-core` - foundational types for the university-dynamics campus simulation.
//!
//! This crate is a dependency of every other `ud-*` crate.  It intentionally
//! has no `ud-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `EventId`, `FacilityId`                         |
//! | [`geo`]         | `GeoPoint`                                                 |
//! | [`time`]        | `Tick`, `DayTime`, `TickConverter`, `HourRange`, `SimConfig` |
//! | [`rng`]         | `SimRng` (the single shared random source of a run)        |
//! | [`error`]       | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on ids, `Tick`, `DayTime`,        |
//! |         | `HourRange`, `SimConfig` and `GeoPoint`. Required by       |
//! |         | `ud-sim` for TOML configuration.                           |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{AgentId, EventId, FacilityId};
pub use rng::SimRng;
pub use time::{DayTime, HourRange, SimConfig, Tick, TickConverter, HOURS_PER_DAY, DAYS_PER_WEEK, TICKS_PER_WEEK};
