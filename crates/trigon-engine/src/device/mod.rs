//! EGL display + surface + context management.
//!
//! This module is responsible for:
//! - acquiring and initializing the EGL display
//! - choosing a config and creating the window surface and GLES context
//! - tearing resources down in dependency order
//! - mapping EGL errors to targeted repairs

mod api;
mod context;
mod error;
mod init;

#[cfg(test)]
pub(crate) mod fake;

pub use api::EglApi;
pub use context::RenderContext;
pub use error::{EglError, EglErrorAction};
pub use init::EglConfigSpec;
