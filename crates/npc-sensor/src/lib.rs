//! `npc-sensor` — what an agent perceives.
//!
//! One [`Sensor`] per agent.  Each tick [`Sensor::update`] runs the vision
//! check, the hearing check, alertness decay and memory eviction, leaving
//! the result in a [`SensorSnapshot`] that decision-tree conditions read.
//! [`Sensor::register_sound`] is the injection point for stimuli that come
//! from outside the agent (alerts from allies, explosions, scripted alarms).
//!
//! | Module       | Contents                                     |
//! |--------------|----------------------------------------------|
//! | [`config`]   | `SensorConfig`                               |
//! | [`error`]    | `SensorError`, `SensorResult<T>`             |
//! | [`snapshot`] | `SensorSnapshot`, `SoundMemory`, `Awareness` |
//! | [`sensor`]   | `Sensor`                                     |

pub mod config;
pub mod error;
pub mod sensor;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use config::SensorConfig;
pub use error::{SensorError, SensorResult};
pub use sensor::Sensor;
pub use snapshot::{Awareness, SensorSnapshot, SoundMemory, MAX_ALERTNESS};
