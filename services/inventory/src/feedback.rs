//! Feedback ports for the inventory screens
//!
//! Controllers never render anything themselves. Toasts, confirmation
//! dialogs, the loading overlay and the image picker all sit behind
//! these traits so a host shell, or a test, can supply them.

use async_trait::async_trait;
use std::time::Duration;

/// Visual tone of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A transient notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub duration: Duration,
    pub severity: Severity,
    pub icon: String,
}

impl Toast {
    /// Standard success toast: short, with a check mark
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration: Duration::from_millis(1500),
            severity: Severity::Success,
            icon: "checkmark-circle-outline".to_string(),
        }
    }

    /// Standard error toast: longer, with an alert mark
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration: Duration::from_millis(2500),
            severity: Severity::Error,
            icon: "alert-circle-outline".to_string(),
        }
    }
}

/// A yes/no question put to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

/// Surface through which controllers talk back to the user
#[async_trait]
pub trait FeedbackPort: Send + Sync {
    /// Show a transient notification, fire and forget
    fn toast(&self, toast: Toast);

    /// Ask a yes/no question; `true` means the user confirmed
    async fn confirm(&self, request: ConfirmRequest) -> bool;

    /// Show the blocking loading overlay
    async fn present_loading(&self);

    /// Hide the blocking loading overlay
    async fn dismiss_loading(&self);
}

/// Source of user-chosen images
#[async_trait]
pub trait ImagePicker: Send + Sync {
    /// Ask the user for a picture as a data URL, `None` when they cancel
    async fn take_picture(&self, prompt: &str) -> Option<String>;
}
