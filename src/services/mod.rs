//! Service layer for media scanner business logic.
//!
//! Services can be used by the CLI, the web server, or other interfaces.

pub mod discovery;

pub use discovery::{DiscoveryService, SearchOutcome, ServiceStatus};
