//! Desktop notifications for simulated replies.
//!
//! Notification support is optional: when disabled by config, or when the
//! platform refuses to show one, the call degrades to a no-op. Nothing is
//! retried or queued.

use log::{debug, warn};
use notify_rust::{Notification, Timeout};

/// How long a reply notification stays on screen before auto-dismissing.
const DISMISS_AFTER_MS: u32 = 4000;

pub struct Notifier {
    enabled: bool,
}

impl Notifier {
    pub fn new(enabled: bool) -> Self {
        Notifier { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Raise a transient notification with the sender's name as the title
    /// and the message text as the body.
    ///
    /// Shown from a detached thread so a slow notification daemon never
    /// stalls the draw loop.
    pub fn notify(&self, sender: &str, body: &str) {
        if !self.enabled {
            debug!("notification suppressed (disabled): {}", sender);
            return;
        }

        let summary = format!("New message from {}", sender);
        let body = body.to_string();
        std::thread::spawn(move || {
            if let Err(e) = Notification::new()
                .summary(&summary)
                .body(&body)
                .timeout(Timeout::Milliseconds(DISMISS_AFTER_MS))
                .show()
            {
                warn!("failed to show notification: {}", e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_notifier_is_a_no_op() {
        let notifier = Notifier::new(false);
        assert!(!notifier.is_enabled());
        // Must not panic or touch the platform.
        notifier.notify("Sarah Wilson", "Got it! 😊");
    }
}
