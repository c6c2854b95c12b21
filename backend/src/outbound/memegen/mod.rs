//! Memegen outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `MemeTemplateSource` port.

mod dto;
mod http_source;

pub use http_source::MemegenHttpSource;
