use crate::error::AppError;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::LinuxNotifier;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsNotifier;

/// Delivery sink for desktop notifications, fed `(title, message)` pairs.
pub trait Notifier {
    fn notify(&self, title: &str, message: &str) -> Result<(), AppError>;
}

pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _title: &str, _message: &str) -> Result<(), AppError> {
        Ok(())
    }
}

/// The platform notifier, or a noop one when COZYDO_DISABLE_NOTIFICATIONS
/// is set or the platform has no supported transport.
pub fn notifier_from_env() -> Box<dyn Notifier> {
    if std::env::var("COZYDO_DISABLE_NOTIFICATIONS").is_ok() {
        return Box::new(NoopNotifier);
    }

    platform_notifier()
}

#[cfg(target_os = "linux")]
pub fn platform_notifier() -> Box<dyn Notifier> {
    Box::new(LinuxNotifier)
}

#[cfg(windows)]
pub fn platform_notifier() -> Box<dyn Notifier> {
    Box::new(WindowsNotifier)
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform_notifier() -> Box<dyn Notifier> {
    Box::new(NoopNotifier)
}
