//! Notification adapters.
//!
//! No mail transport is bundled. `TracingNotifier` records each message as a
//! structured log event; `OutboxNotifier` additionally writes the full
//! message to a pickup directory for local delivery or inspection.

mod outbox;
mod tracing_notifier;

pub use outbox::OutboxNotifier;
pub use tracing_notifier::TracingNotifier;
