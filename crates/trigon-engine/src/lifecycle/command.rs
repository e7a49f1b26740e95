/// Lifecycle command issued by the activity host.
///
/// Independent of the platform's integer encoding; the host adapter maps
/// platform events into these variants.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// A native window is available. `window_present` is false when the host
    /// announced a window but could not hand one out.
    InitWindow { window_present: bool },
    /// The native window is about to go away.
    TermWindow,
    GainedFocus,
    LostFocus,
    Start,
    Stop,
    Pause,
    /// Activity resumed, optionally with state saved by a previous instance.
    Resume { saved: Option<Vec<u8>> },
    /// Host asks for the state to persist across process death.
    SaveState,
    WindowResized,
    ConfigChanged,
    LowMemory,
    /// Activity is being destroyed; the loop must stop.
    Destroy,
}

impl AppCommand {
    /// Short name used in lifecycle logs.
    pub fn name(&self) -> &'static str {
        match self {
            AppCommand::InitWindow { .. } => "INIT_WINDOW",
            AppCommand::TermWindow => "TERM_WINDOW",
            AppCommand::GainedFocus => "GAINED_FOCUS",
            AppCommand::LostFocus => "LOST_FOCUS",
            AppCommand::Start => "START",
            AppCommand::Stop => "STOP",
            AppCommand::Pause => "PAUSE",
            AppCommand::Resume { .. } => "RESUME",
            AppCommand::SaveState => "SAVE_STATE",
            AppCommand::WindowResized => "WINDOW_RESIZED",
            AppCommand::ConfigChanged => "CONFIG_CHANGED",
            AppCommand::LowMemory => "LOW_MEMORY",
            AppCommand::Destroy => "DESTROY",
        }
    }
}

/// Side effect requested by a lifecycle transition.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEffect {
    None,
    /// The window is gone; its EGL surface must be destroyed now.
    DestroySurface,
    /// Memory pressure while hidden; drop GPU objects.
    ReleaseGpuResources,
    /// Serialize state and hand it back to the host.
    SaveState,
    /// Restore state serialized by a previous instance.
    RestoreState(Vec<u8>),
    /// Stop the loop.
    Terminate,
}
