use super::command::{AppCommand, LifecycleEffect};

/// Window / focus / visibility flags, set exclusively by host commands.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct LifecycleFlags {
    pub has_focus: bool,
    pub is_visible: bool,
    pub has_window: bool,
}

impl LifecycleFlags {
    /// True only while focused, visible and holding a window.
    #[inline]
    pub fn is_animating(self) -> bool {
        self.has_focus && self.is_visible && self.has_window
    }
}

/// Applies `command` to `flags`.
///
/// Pure: returns the next flags together with the effect the caller must carry
/// out. Configuration and resize commands are deliberately inert; the frame
/// driver detects resizes by querying the surface every frame.
pub fn transition(flags: LifecycleFlags, command: &AppCommand) -> (LifecycleFlags, LifecycleEffect) {
    let mut next = flags;

    let effect = match command {
        AppCommand::InitWindow { window_present } => {
            if *window_present {
                next.has_window = true;
            }
            LifecycleEffect::None
        }
        AppCommand::TermWindow => {
            next.has_window = false;
            LifecycleEffect::DestroySurface
        }
        AppCommand::GainedFocus => {
            next.has_focus = true;
            LifecycleEffect::None
        }
        AppCommand::LostFocus => {
            next.has_focus = false;
            LifecycleEffect::None
        }
        AppCommand::Start => {
            next.is_visible = true;
            LifecycleEffect::None
        }
        AppCommand::Stop => {
            next.is_visible = false;
            LifecycleEffect::None
        }
        AppCommand::Resume { saved: Some(bytes) } => LifecycleEffect::RestoreState(bytes.clone()),
        AppCommand::Resume { saved: None } | AppCommand::Pause => LifecycleEffect::None,
        AppCommand::SaveState => LifecycleEffect::SaveState,
        AppCommand::WindowResized | AppCommand::ConfigChanged => LifecycleEffect::None,
        AppCommand::LowMemory => {
            // Resources still on screen are never released.
            if flags.has_window {
                LifecycleEffect::None
            } else {
                LifecycleEffect::ReleaseGpuResources
            }
        }
        AppCommand::Destroy => LifecycleEffect::Terminate,
    };

    (next, effect)
}

/// Lifecycle state owned by the frame driver.
#[derive(Debug, Default)]
pub struct LifecycleState {
    flags: LifecycleFlags,
    destroy_requested: bool,
}

impl LifecycleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_animating(&self) -> bool {
        self.flags.is_animating()
    }

    /// Set once the host destroyed the activity; never cleared.
    pub fn destroy_requested(&self) -> bool {
        self.destroy_requested
    }

    /// Applies a host command and returns the effect to carry out.
    pub fn apply(&mut self, command: &AppCommand) -> LifecycleEffect {
        log::debug!("handling command {}", command.name());

        let (flags, effect) = transition(self.flags, command);
        self.flags = flags;
        if effect == LifecycleEffect::Terminate {
            self.destroy_requested = true;
        }

        log::debug!(
            "status: F{}, V{}, W{}",
            u8::from(flags.has_focus),
            u8::from(flags.is_visible),
            u8::from(flags.has_window)
        );

        effect
    }
}
