use crate::error::AppError;
use crate::notify::Notifier;
use notify_rust::Notification;

pub struct LinuxNotifier;

impl Notifier for LinuxNotifier {
    fn notify(&self, title: &str, message: &str) -> Result<(), AppError> {
        Notification::new()
            .summary(title)
            .body(message)
            .show()
            .map(|_| ())
            .map_err(|err| AppError::io(err.to_string()))
    }
}
