use std::time::Duration;

use android_activity::input::{self, InputEvent, MotionEvent};
use android_activity::{AndroidApp, InputStatus, MainEvent, PollEvent};

use trigon_engine::core::{CommandReply, EventSource, PollOutcome};
use trigon_engine::input::{MotionAction, MotionSample, PointerSample};
use trigon_engine::lifecycle::AppCommand;

/// `EventSource` over the GameActivity glue.
pub struct ActivityHost {
    app: AndroidApp,
}

impl ActivityHost {
    pub fn new(app: AndroidApp) -> Self {
        Self { app }
    }
}

impl EventSource for ActivityHost {
    fn poll(
        &mut self,
        timeout: Option<Duration>,
        handler: &mut dyn FnMut(AppCommand) -> CommandReply,
    ) -> PollOutcome {
        let app = &self.app;
        let mut outcome = PollOutcome::Dispatched;

        app.poll_events(timeout, |event| match event {
            PollEvent::Timeout => outcome = PollOutcome::TimedOut,
            PollEvent::Wake => log::trace!("looper woken"),
            PollEvent::Main(main) => dispatch(app, main, &mut *handler),
            _ => {}
        });

        outcome
    }

    fn drain_motion(&mut self, handler: &mut dyn FnMut(&MotionSample)) {
        let mut iter = match self.app.input_events_iter() {
            Ok(iter) => iter,
            Err(e) => {
                log::warn!("failed to get input events iterator: {e}");
                return;
            }
        };

        while iter.next(|event| match event {
            InputEvent::MotionEvent(motion) => {
                handler(&motion_sample(motion));
                InputStatus::Handled
            }
            // Keys go back to the system (e.g. back navigation).
            _ => InputStatus::Unhandled,
        }) {}
    }
}

fn dispatch(
    app: &AndroidApp,
    event: MainEvent<'_>,
    handler: &mut dyn FnMut(AppCommand) -> CommandReply,
) {
    let command = match event {
        MainEvent::InitWindow { .. } => AppCommand::InitWindow {
            window_present: app.native_window().is_some(),
        },
        MainEvent::TerminateWindow { .. } => AppCommand::TermWindow,
        MainEvent::GainedFocus => AppCommand::GainedFocus,
        MainEvent::LostFocus => AppCommand::LostFocus,
        MainEvent::Start => AppCommand::Start,
        MainEvent::Stop => AppCommand::Stop,
        MainEvent::Pause => AppCommand::Pause,
        MainEvent::Resume { loader, .. } => AppCommand::Resume {
            saved: loader.load(),
        },
        MainEvent::SaveState { saver, .. } => {
            if let CommandReply::SavedState(bytes) = handler(AppCommand::SaveState) {
                log::debug!("saving {} byte(s) of state", bytes.len());
                saver.store(&bytes);
            }
            return;
        }
        MainEvent::WindowResized { .. } => AppCommand::WindowResized,
        MainEvent::ConfigChanged { .. } => AppCommand::ConfigChanged,
        MainEvent::LowMemory => AppCommand::LowMemory,
        MainEvent::Destroy => AppCommand::Destroy,
        MainEvent::InputAvailable => {
            log::trace!("input available");
            return;
        }
        _ => return,
    };

    handler(command);
}

fn motion_sample(motion: &MotionEvent<'_>) -> MotionSample {
    let action = match motion.action() {
        input::MotionAction::Down => MotionAction::Down,
        input::MotionAction::PointerDown => MotionAction::PointerDown {
            index: motion.pointer_index(),
        },
        input::MotionAction::Up => MotionAction::Up,
        input::MotionAction::PointerUp => MotionAction::PointerUp {
            index: motion.pointer_index(),
        },
        input::MotionAction::Move => MotionAction::Move,
        input::MotionAction::Cancel => MotionAction::Cancel,
        _ => MotionAction::Other,
    };

    let pointers = motion
        .pointers()
        .map(|p| PointerSample::new(p.pointer_id(), p.x(), p.y()))
        .collect();

    MotionSample::new(action, pointers)
}
