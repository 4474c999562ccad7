//! Console implementations of the platform collaborators.

use cellguard::cell::CellIdentity;
use cellguard::platform::UserNotifier;
use cellguard::reconcile::ServingCellSource;

/// Prints user messages to stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl UserNotifier for ConsoleNotifier {
    fn notify_user(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn notify_user_blocking(&self, title: &str, body: &str) {
        eprintln!();
        eprintln!("{}", title);
        eprintln!("{}", "=".repeat(title.chars().count()));
        eprintln!("{}", body);
        eprintln!();
    }
}

/// Serving cell given on the command line.
#[derive(Debug, Clone, Copy)]
pub struct StaticServingCell(pub CellIdentity);

impl ServingCellSource for StaticServingCell {
    fn serving_cell(&self) -> Option<CellIdentity> {
        Some(self.0)
    }
}
