//! User-facing toast notifications.

use std::sync::{Arc, Mutex};

use serde::Serialize;

/// Fixed notification texts shown by the storefront.
pub mod messages {
    /// Requested quantity is above available stock.
    pub const OUT_OF_STOCK: &str = "Quantidade solicitada fora de estoque";
    /// Adding a product failed.
    pub const ADD_FAILED: &str = "Erro na adição do produto";
    /// Removing a product failed.
    pub const REMOVE_FAILED: &str = "Erro na remoção do produto";
    /// Changing a product's quantity failed.
    pub const UPDATE_FAILED: &str = "Erro na alteração de quantidade do produto";
}

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, message)
    }
}

/// Surface that shows toasts to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, toast: Toast) {
        (**self).notify(toast)
    }
}

/// Sends toasts to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Error => tracing::warn!(kind = toast.kind.as_str(), "{}", toast.message),
            _ => tracing::info!(kind = toast.kind.as_str(), "{}", toast.message),
        }
    }
}

/// Keeps every toast in memory until taken.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the toasts recorded so far.
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .map(|toasts| toasts.clone())
            .unwrap_or_default()
    }

    /// Remove and return the recorded toasts.
    pub fn take(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .map(|mut toasts| std::mem::take(&mut *toasts))
            .unwrap_or_default()
    }

    /// Messages of the recorded toasts, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.toasts().into_iter().map(|t| t.message).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        tracing::debug!(kind = toast.kind.as_str(), message = %toast.message, "toast");
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push(toast);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_collects_in_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Toast::error(messages::OUT_OF_STOCK));
        notifier.notify(Toast::error(messages::ADD_FAILED));

        assert_eq!(
            notifier.messages(),
            vec![messages::OUT_OF_STOCK, messages::ADD_FAILED]
        );
    }

    #[test]
    fn test_take_drains() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Toast::new(ToastKind::Info, "hello"));

        assert_eq!(notifier.take().len(), 1);
        assert!(notifier.toasts().is_empty());
    }

    #[test]
    fn test_shared_notifier_through_arc() {
        let notifier = Arc::new(RecordingNotifier::new());
        let shared: Arc<RecordingNotifier> = Arc::clone(&notifier);
        shared.notify(Toast::new(ToastKind::Success, "ok"));

        assert_eq!(notifier.toasts(), vec![Toast::new(ToastKind::Success, "ok")]);
    }

    #[test]
    fn test_toast_serializes_kind_lowercase() {
        let json = serde_json::to_string(&Toast::error("x")).unwrap();
        assert_eq!(json, r#"{"kind":"error","message":"x"}"#);
    }
}
