//! Notifications and redirects rendered on the terminal

use carecom_http::client::{Navigator, Notification, NotificationLevel, Notifier};

/// Prints notifications to stderr so stdout stays machine-readable
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        eprintln!("{}", render(&notification));
    }
}

/// There are no views in a terminal; a redirect is reported instead
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, path: &str) {
        eprintln!("-> {path}");
    }
}

fn render(notification: &Notification) -> String {
    let tag = match notification.level {
        NotificationLevel::Success => "ok",
        NotificationLevel::Info => "info",
        NotificationLevel::Warning => "warn",
        NotificationLevel::Error => "error",
    };
    format!("[{tag}] {}: {}", notification.title, notification.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let notification = Notification::warning("Sesi Berakhir", "Silakan login kembali.");
        assert_eq!(
            render(&notification),
            "[warn] Sesi Berakhir: Silakan login kembali."
        );
    }
}
