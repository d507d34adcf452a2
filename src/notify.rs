//! Notification dispatch. The app pushes toasts through the `Notifier`
//! seam; the desktop implementation forwards them off the draw loop so a
//! slow notification daemon can never stall rendering.

use std::time::Duration;
use tokio::time::timeout;

/// Timeout for the desktop notification round-trip
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub body: String,
    pub kind: ToastKind,
}

impl Toast {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            kind: ToastKind::Info,
        }
    }

    pub fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            kind: ToastKind::Success,
        }
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            kind: ToastKind::Error,
        }
    }
}

pub trait Notifier {
    fn notify(&self, toast: &Toast);
}

/// Forwards toasts to the desktop notification daemon when enabled.
pub struct DesktopNotifier {
    pub enabled: bool,
}

impl Notifier for DesktopNotifier {
    fn notify(&self, toast: &Toast) {
        if !self.enabled {
            return;
        }
        let summary = toast.title.clone();
        let body = toast.body.clone();
        tokio::spawn(async move {
            let shown = timeout(
                NOTIFY_TIMEOUT,
                tokio::task::spawn_blocking(move || {
                    notify_rust::Notification::new()
                        .summary(&summary)
                        .body(&body)
                        .icon("video-television")
                        .show()
                        .map(|_| ())
                }),
            )
            .await;

            match shown {
                Ok(Ok(Ok(()))) => {}
                Ok(Ok(Err(e))) => tracing::warn!("desktop notification failed: {}", e),
                Ok(Err(e)) => tracing::warn!("notification task failed: {}", e),
                Err(_) => tracing::warn!("desktop notification timed out"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_constructors_tag_the_kind() {
        assert_eq!(Toast::info("a", "b").kind, ToastKind::Info);
        assert_eq!(Toast::success("a", "b").kind, ToastKind::Success);
        assert_eq!(Toast::error("a", "b").kind, ToastKind::Error);
    }
}
