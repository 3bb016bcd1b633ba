//! Collaborators the engine calls out to: a notifier for user-facing messages
//! and a confirmation gate for destructive actions.

use std::sync::Arc;

use parking_lot::Mutex;

pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Asked before any delete is dispatched. Returning false cancels it.
pub trait ConfirmGate: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> ConfirmGate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Error(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Records notices in memory, for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().last().cloned()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices
            .lock()
            .iter()
            .filter(|n| n.is_error())
            .map(|n| n.message().to_string())
            .collect()
    }

    pub fn clear(&self) {
        self.notices.lock().clear();
    }
}

impl Notifier for MemoryNotifier {
    fn success(&self, message: &str) {
        self.notices.lock().push(Notice::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notices.lock().push(Notice::Error(message.to_string()));
    }
}

/// Sends notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(notice = message);
    }

    fn error(&self, message: &str) {
        tracing::warn!(notice = message);
    }
}

/// The UI-side collaborators handed to every controller.
#[derive(Clone)]
pub struct Ui {
    pub notifier: Arc<dyn Notifier>,
    pub confirm: Arc<dyn ConfirmGate>,
}

impl Ui {
    pub fn new(notifier: Arc<dyn Notifier>, confirm: Arc<dyn ConfirmGate>) -> Self {
        Self { notifier, confirm }
    }

    /// Logs notices and confirms every prompt.
    pub fn headless() -> Self {
        Self::new(Arc::new(TracingNotifier), Arc::new(|_: &str| true))
    }

    pub(crate) fn success(&self, message: &str) {
        self.notifier.success(message);
    }

    pub(crate) fn error(&self, message: &str) {
        self.notifier.error(message);
    }

    pub(crate) fn confirm(&self, prompt: &str) -> bool {
        self.confirm.confirm(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_notifier_keeps_order() {
        let notifier = MemoryNotifier::new();
        notifier.success("Project created!");
        notifier.error("Failed to reorder projects");
        assert_eq!(notifier.notices().len(), 2);
        assert_eq!(notifier.errors(), vec!["Failed to reorder projects".to_string()]);
        assert_eq!(
            notifier.last(),
            Some(Notice::Error("Failed to reorder projects".into()))
        );
    }

    #[test]
    fn closures_act_as_confirm_gates() {
        let deny = |_: &str| false;
        let ui = Ui::new(Arc::new(MemoryNotifier::new()), Arc::new(deny));
        assert!(!ui.confirm("Delete?"));
        assert!(Ui::headless().confirm("Delete?"));
    }
}
