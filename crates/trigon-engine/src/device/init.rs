/// Framebuffer config and context parameters requested from EGL.
///
/// The first config matching these minimums is taken as-is; alternatives are
/// not scored.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EglConfigSpec {
    pub red_size: i32,
    pub green_size: i32,
    pub blue_size: i32,
    pub depth_size: i32,

    /// GLES major version requested for the context (and the renderable type
    /// required from the config).
    pub client_version: i32,
}

impl Default for EglConfigSpec {
    fn default() -> Self {
        Self {
            red_size: 8,
            green_size: 8,
            blue_size: 8,
            depth_size: 16,
            client_version: 3,
        }
    }
}
