//! Toast notification interface.
//!
//! The session core does not raise toasts itself. Callers use [`Toaster`],
//! which forwards to whatever [`Notifier`] is mounted and silently does
//! nothing when none is.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for NotifyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotifyLevel::Success => "success",
            NotifyLevel::Error => "error",
            NotifyLevel::Warning => "warning",
            NotifyLevel::Info => "info",
        };
        f.write_str(s)
    }
}

/// Presentation surface for toasts. Must not fail.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NotifyLevel, message: &str);
}

/// Toast façade. Inert until a notifier is mounted.
#[derive(Clone, Default)]
pub struct Toaster {
    notifier: Option<Arc<dyn Notifier>>,
}

impl Toaster {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier: Some(notifier),
        }
    }

    /// A toaster with nothing mounted
    pub fn inert() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.notifier.is_some()
    }

    pub fn notify(&self, level: NotifyLevel, message: &str) {
        match self.notifier {
            Some(ref notifier) => notifier.notify(level, message),
            None => debug!(%level, "No notifier mounted, dropping toast"),
        }
    }

    pub fn success(&self, message: &str) {
        self.notify(NotifyLevel::Success, message);
    }

    pub fn error(&self, message: &str) {
        self.notify(NotifyLevel::Error, message);
    }

    pub fn warning(&self, message: &str) {
        self.notify(NotifyLevel::Warning, message);
    }

    pub fn info(&self, message: &str) {
        self.notify(NotifyLevel::Info, message);
    }
}

impl fmt::Debug for Toaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toaster")
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(NotifyLevel, String)>>);

    impl Notifier for Recorder {
        fn notify(&self, level: NotifyLevel, message: &str) {
            self.0.lock().push((level, message.to_string()));
        }
    }

    #[test]
    fn test_toaster_forwards_levels() {
        let recorder = Arc::new(Recorder::default());
        let toaster = Toaster::new(recorder.clone());

        toaster.success("saved");
        toaster.error("failed");
        toaster.warning("careful");
        toaster.info("fyi");

        let seen = recorder.0.lock().clone();
        assert_eq!(
            seen,
            vec![
                (NotifyLevel::Success, "saved".to_string()),
                (NotifyLevel::Error, "failed".to_string()),
                (NotifyLevel::Warning, "careful".to_string()),
                (NotifyLevel::Info, "fyi".to_string()),
            ]
        );
    }

    #[test]
    fn test_inert_toaster_does_nothing() {
        let toaster = Toaster::inert();
        assert!(!toaster.is_mounted());
        // No notifier, no panic
        toaster.error("nobody is listening");
    }
}
