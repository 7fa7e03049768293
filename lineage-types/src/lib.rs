//! Core type definitions for the Lineage reconciliation engine.
//!
//! Everything that both replicas and the reconciliation core need to agree
//! on lives here:
//!
//! - [`ObjectType`]: the closed set of tracked genealogical record types
//! - [`Handle`]: the opaque, replica-stable identifier of a logical record
//! - [`ChangeTime`]: last-modified timestamps (seconds since the Unix epoch)
//! - [`Record`]: one genealogical entity with an opaque JSON payload
//!
//! Record identity is by handle, never by content: a handle present in both
//! replicas denotes the same logical entity regardless of how much the two
//! copies have diverged.

mod handle;
mod object_type;
mod record;
mod timestamp;

pub use handle::Handle;
pub use object_type::{ObjectType, ParseObjectTypeError};
pub use record::Record;
pub use timestamp::ChangeTime;
