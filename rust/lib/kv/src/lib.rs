//! Durable key-value storage for client-side records.
//!
//! Records are grouped under a namespace prefix (`auth:token`, `auth:id`)
//! and written in batches so a namespace is never left half-updated.

pub mod error;
pub mod memory;
pub mod namespace;
pub mod redb;
pub mod traits;

pub use error::KVError;
pub use memory::MemoryStore;
pub use namespace::Namespace;
pub use redb::RedbStore;
pub use traits::KVStore;
