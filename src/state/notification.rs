/// Transient status notifications
///
/// Each posted notification gets a new generation number. The expiry
/// scheduled for it only clears the slot if no newer notification has
/// replaced it in the meantime.
use std::time::Duration;

/// How long a notification stays visible
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NotificationKind::Error,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NotificationSlot {
    current: Option<Notification>,
    generation: u64,
}

impl NotificationSlot {
    /// Show a notification, superseding any pending one.
    /// Returns the generation its expiry must carry.
    pub fn post(&mut self, notification: Notification) -> u64 {
        self.generation += 1;
        self.current = Some(notification);
        self.generation
    }

    /// Clear the slot if `generation` is still the current one
    pub fn expire(&mut self, generation: u64) -> bool {
        if generation == self.generation && self.current.is_some() {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }
}
