//! Domain models for storefront.

pub mod session;

pub use session::{VisitorId, keys as session_keys};
