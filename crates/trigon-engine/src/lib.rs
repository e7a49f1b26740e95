//! Trigon engine crate.
//!
//! Platform-agnostic core of the trigon shell: lifecycle bookkeeping, EGL
//! resource management, touch normalization and the per-iteration frame driver.
//! Platform crates plug in through the `EglApi`, `Renderer` and `EventSource`
//! traits.

pub mod coords;
pub mod core;
pub mod device;
pub mod input;
pub mod lifecycle;
pub mod logging;
pub mod render;
pub mod time;
