/*
[INPUT]:  Translated titles and messages from the session managers
[OUTPUT]: Transient user-facing notifications
[POS]:    Presentation boundary - where caught errors surface to the user
[UPDATE]: When notification levels or sinks change
*/

use std::sync::Mutex;

use crate::http::MooniumError;
use crate::i18n::Translator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    /// Error notification with the translated message for `err`
    pub fn from_error(err: &MooniumError, translator: &Translator) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: translator.translate("errors.title"),
            description: translator.translate(err.translation_key()),
        }
    }

    pub fn success(translator: &Translator, message_key: &str) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: translator.translate("success.title"),
            description: translator.translate(message_key),
        }
    }
}

/// Sink for notifications; the UI toast layer in a real application
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Emits notifications as tracing events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => tracing::error!(
                title = %notification.title,
                "{}",
                notification.description
            ),
            NotificationLevel::Success => tracing::info!(
                title = %notification.title,
                "{}",
                notification.description
            ),
        }
    }
}

/// Keeps every notification in memory, for tests and headless consumers
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.lock().push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::i18n::Locale;
    use crate::types::Blockchain;

    #[test]
    fn test_error_notification_uses_translated_text() {
        let translator = Translator::new(Locale::En);
        let err = MooniumError::ProviderMissing {
            blockchain: Blockchain::Solana,
        };

        let notification = Notification::from_error(&err, &translator);
        assert_eq!(notification.level, NotificationLevel::Error);
        assert_eq!(notification.title, translator.translate("errors.title"));
        assert_eq!(
            notification.description,
            translator.translate("errors.no_phantom")
        );
    }

    #[test]
    fn test_recording_notifier_take_drains() {
        let translator = Translator::default();
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::success(&translator, "success.update_complete"));

        assert_eq!(notifier.notifications().len(), 1);
        assert_eq!(notifier.take().len(), 1);
        assert!(notifier.notifications().is_empty());
    }
}
