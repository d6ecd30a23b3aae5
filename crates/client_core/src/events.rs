//! Controller events observed by a rendering layer.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationContext {
    Search,
    Contact,
}

/// A transient, user-facing message (a toast in the portal UI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    level: NotificationLevel,
    context: NotificationContext,
    message: String,
}

impl Notification {
    pub fn success(context: NotificationContext, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            context,
            message: message.into(),
        }
    }

    pub fn error(context: NotificationContext, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            context,
            message: message.into(),
        }
    }

    pub fn level(&self) -> NotificationLevel {
        self.level
    }

    pub fn context(&self) -> NotificationContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    StatusChanged(SearchStatus),
    ResultsReplaced { generation: u64, count: usize },
    OptionsLoaded { majors: usize, secondary: usize },
    Notification(Notification),
}
