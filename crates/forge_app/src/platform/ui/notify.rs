use chrono::Local;
use colored::Colorize;
use forge_core::{Notification, Severity};
use forge_logging::{forge_info, forge_warn};

/// Shows the transient status messages.
pub trait Notifier {
    fn notify(&self, notification: &Notification);
}

/// Prints notifications to stderr so stdout stays reserved for code output.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

pub fn format_notification(notification: &Notification) -> String {
    match notification.detail() {
        Some(detail) => format!("{} ({detail})", notification.message()),
        None => notification.message().to_string(),
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: &Notification) {
        let text = format_notification(notification);
        let stamp = Local::now().format("%H:%M:%S");
        match notification.severity() {
            Severity::Success => {
                forge_info!("notify: {}", text);
                eprintln!("{} {} {}", stamp, "✔".green(), text.green());
            }
            Severity::Error => {
                forge_warn!("notify: {}", text);
                eprintln!("{} {} {}", stamp, "✖".red(), text.red());
            }
        }
    }
}
