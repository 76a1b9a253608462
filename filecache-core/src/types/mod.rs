//! Domain types for filecache.
//!
//! - [`Freshness`]: three-way outcome of an existence/expiry check
//! - [`Ttl`]: maximum tolerated entry age, as a duration or a string
//! - [`Payload`]: raw bytes or text written verbatim
//! - [`StoreOptions`]: per-store encoding flags

mod freshness;
mod options;
mod payload;

pub use freshness::*;
pub use options::*;
pub use payload::*;
