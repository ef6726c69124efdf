//! Trend statistics core -- resource identity, backend message schemas,
//! and the transport trait the paging engine consumes.

pub mod error;
pub mod messages;
pub mod traits;
pub mod types;

pub use error::TransportError;
pub use traits::Backend;
pub use types::ResourceRef;
