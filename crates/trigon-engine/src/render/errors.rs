use std::fmt;

/// Raw GL error code returned by `glGetError`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GlError(pub u32);

impl GlError {
    pub const INVALID_ENUM: GlError = GlError(0x0500);
    pub const INVALID_VALUE: GlError = GlError(0x0501);
    pub const INVALID_OPERATION: GlError = GlError(0x0502);
    pub const OUT_OF_MEMORY: GlError = GlError(0x0505);
    pub const INVALID_FRAMEBUFFER_OPERATION: GlError = GlError(0x0506);
}

impl fmt::Display for GlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            GlError::INVALID_ENUM => f.write_str("GL_INVALID_ENUM"),
            GlError::INVALID_VALUE => f.write_str("GL_INVALID_VALUE"),
            GlError::INVALID_OPERATION => f.write_str("GL_INVALID_OPERATION"),
            GlError::OUT_OF_MEMORY => f.write_str("GL_OUT_OF_MEMORY"),
            GlError::INVALID_FRAMEBUFFER_OPERATION => f.write_str("GL_INVALID_FRAMEBUFFER_OPERATION"),
            GlError(code) => write!(f, "error {code:#x}"),
        }
    }
}

/// Caps how many GL errors get logged over the lifetime of the driver.
///
/// A broken driver can raise errors every frame; past the limit a single
/// notice is logged and later errors are only counted.
#[derive(Debug, Clone)]
pub struct GlErrorLog {
    limit: u32,
    printed: u32,
    total: u64,
}

impl GlErrorLog {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            printed: 0,
            total: 0,
        }
    }

    /// Number of errors seen, logged or not.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of errors actually written to the log.
    pub fn printed(&self) -> u32 {
        self.printed
    }

    /// Records `err`; returns `true` when it was logged.
    pub fn record(&mut self, err: GlError) -> bool {
        self.total += 1;
        if self.printed >= self.limit {
            return false;
        }

        log::error!("*** OpenGL error: {err}");
        self.printed += 1;
        if self.printed >= self.limit {
            log::error!("*** too many OpenGL errors, no longer printing");
        }
        true
    }
}
