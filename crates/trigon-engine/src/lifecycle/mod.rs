//! Activity lifecycle bookkeeping.
//!
//! Host callbacks arrive as `AppCommand`s. A pure transition function folds
//! them into `LifecycleFlags` and reports the side effect the frame driver
//! must apply (tearing down the surface, releasing GPU objects, ...).

mod command;
mod state;

pub use command::{AppCommand, LifecycleEffect};
pub use state::{transition, LifecycleFlags, LifecycleState};
