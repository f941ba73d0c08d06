//! User-facing notifications and confirmation prompts.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Canonical user-facing messages.
pub mod messages {
    pub const ELEMENT_CREATE_FAILED: &str = "Failed to create new element";
    pub const DESIGN_SAVED: &str = "Design saved successfully!";
    pub const DESIGN_SAVE_FAILED: &str = "Failed to save design";
    pub const DESIGN_RESET: &str = "Design reset to default!";
    pub const DESIGN_RESET_NOT_CLEARED: &str = "Design reset but failed to clear saved state";
    pub const RESET_CONFIRMATION: &str =
        "Are you sure you want to reset to default design? This will remove all elements and settings.";
}

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        })
    }
}

/// Fire-and-forget notification sink (toasts, status bar, console).
pub trait Notifier {
    fn notify(&self, severity: Severity, message: &str);

    fn success(&self, message: &str) {
        self.notify(Severity::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(Severity::Error, message);
    }

    fn warning(&self, message: &str) {
        self.notify(Severity::Warning, message);
    }

    fn info(&self, message: &str) {
        self.notify(Severity::Info, message);
    }
}

impl<N: Notifier + ?Sized> Notifier for Rc<N> {
    fn notify(&self, severity: Severity, message: &str) {
        (**self).notify(severity, message);
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, severity: Severity, message: &str) {
        (**self).notify(severity, message);
    }
}

/// Notifier that only writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success | Severity::Info => log::info!("{message}"),
            Severity::Warning => log::warn!("{message}"),
            Severity::Error => log::error!("{message}"),
        }
    }
}

/// Notifier that keeps every notification, for hosts that render them later.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    entries: RefCell<Vec<(Severity, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications so far, oldest first.
    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries.borrow().clone()
    }

    /// The most recent notification.
    pub fn last(&self) -> Option<(Severity, String)> {
        self.entries.borrow().last().cloned()
    }

    /// Remove and return all notifications.
    pub fn drain(&self) -> Vec<(Severity, String)> {
        self.entries.borrow_mut().drain(..).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        self.entries.borrow_mut().push((severity, message.to_string()));
    }
}

/// Blocking yes/no question put to the user.
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> ConfirmPrompt for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Log `error` with its context and show its message to the user.
pub fn report_error(notifier: &dyn Notifier, error: &dyn fmt::Display, context: Option<&str>) {
    match context {
        Some(context) => log::error!("Error in {context}: {error}"),
        None => log::error!("Error: {error}"),
    }
    notifier.error(&error.to_string());
}

/// Log and show a success message.
pub fn report_success(notifier: &dyn Notifier, message: &str) {
    log::info!("{message}");
    notifier.success(message);
}

/// Log and show a warning.
pub fn report_warning(notifier: &dyn Notifier, message: &str) {
    log::warn!("{message}");
    notifier.warning(message);
}

/// Log and show an informational message.
pub fn report_info(notifier: &dyn Notifier, message: &str) {
    log::info!("{message}");
    notifier.info(message);
}
