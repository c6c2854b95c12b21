//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process store used when no database is configured
//! - **memegen**: reqwest client for the meme image service
//! - **crypto**: bcrypt password hashing
//! - **staging**: directory storage for uploads awaiting confirmation
//! - **notifications**: log and outbox notifiers
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod crypto;
pub mod memegen;
pub mod memory;
pub mod notifications;
pub mod persistence;
pub mod staging;
