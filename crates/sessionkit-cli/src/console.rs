use sessionkit_core::{Notifier, NotifyLevel};

/// Prints toasts to stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NotifyLevel, message: &str) {
        let marker = match level {
            NotifyLevel::Success => "✓",
            NotifyLevel::Error => "✗",
            NotifyLevel::Warning => "!",
            NotifyLevel::Info => "·",
        };
        eprintln!("{} {}", marker, message);
    }
}
