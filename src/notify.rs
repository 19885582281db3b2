//! User-visible notification sink.
//!
//! The board engine reports every terminal outcome of a persist operation
//! through this trait — the dashboard equivalent of a toast. Delivery is
//! fire-and-forget; a notifier must never fail.

/// Outcome flavor for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, kind: NoticeKind);
}

/// Routes notifications through `tracing`. The default sink for library use.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Success => tracing::info!("{}", message),
            NoticeKind::Error => tracing::warn!("{}", message),
        }
    }
}

/// Styled terminal output for the CLI.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Success => println!("{} {}", console::style("ok").green().bold(), message),
            NoticeKind::Error => eprintln!("{} {}", console::style("error").red().bold(), message),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingNotifier;
    use super::*;

    #[test]
    fn test_recording_notifier_captures_in_order() {
        let notifier = RecordingNotifier::default();
        notifier.notify("moved", NoticeKind::Success);
        notifier.notify("failed", NoticeKind::Error);
        let notices = notifier.take();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0], ("moved".to_string(), NoticeKind::Success));
        assert_eq!(notices[1], ("failed".to_string(), NoticeKind::Error));
    }

    #[test]
    fn test_log_notifier_is_infallible() {
        // Nothing to assert beyond "does not panic".
        LogNotifier.notify("hello", NoticeKind::Success);
        LogNotifier.notify("world", NoticeKind::Error);
    }
}
