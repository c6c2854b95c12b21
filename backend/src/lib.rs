//! KudoTrio backend library.
//!
//! Hexagonal layout: [`domain`] holds the services and ports, [`inbound`]
//! the HTTP adapter, [`outbound`] the driven adapters and [`server`] the
//! wiring shared by both binaries.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
