pub mod adapters;
pub mod error;
pub mod queue;
pub mod templates;
pub mod types;

pub use adapters::{EmailConfig, EmailNotifier, LogNotifier, Notifier};
pub use error::NotificationError;
pub use queue::QueuedNotifier;
pub use templates::{RenderedEmail, render_email};
pub use types::*;
