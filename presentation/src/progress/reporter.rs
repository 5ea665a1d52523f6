//! Spinner feedback for session phases and reply generation

use indicatif::{ProgressBar, ProgressStyle};
use juno_application::SessionObserver;
use juno_domain::{Character, SessionPhase};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Shows a spinner while the session is resolving, loading or waiting for a reply.
pub struct SpinnerObserver {
    spinner: Mutex<Option<ProgressBar>>,
}

impl SpinnerObserver {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Message for phases that wait on the backend
    fn phase_message(phase: SessionPhase) -> Option<&'static str> {
        match phase {
            SessionPhase::ResolvingSession => Some("Finding your conversation..."),
            SessionPhase::LoadingHistory => Some("Loading history..."),
            SessionPhase::Uninitialized | SessionPhase::Ready | SessionPhase::Submitting => None,
        }
    }

    fn show(&self, message: String) {
        let mut slot = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(spinner) => spinner.set_message(message),
            None => {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(Self::spinner_style());
                spinner.set_message(message);
                spinner.enable_steady_tick(Duration::from_millis(100));
                *slot = Some(spinner);
            }
        }
    }

    fn clear(&self) {
        let spinner = self
            .spinner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
    }

    fn is_spinning(&self) -> bool {
        self.spinner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Default for SpinnerObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionObserver for SpinnerObserver {
    fn on_phase_changed(&self, phase: SessionPhase) {
        match Self::phase_message(phase) {
            Some(message) => self.show(message.to_string()),
            // Submitting shows nothing until generation starts
            None if phase == SessionPhase::Submitting => {}
            None => self.clear(),
        }
    }

    fn on_generation_started(&self, character: &Character) {
        self.show(format!("{} is typing...", character.name));
    }

    fn on_generation_finished(&self, _success: bool) {
        self.clear();
    }
}
