pub mod memory;
pub mod traits;
pub mod types;

pub use memory::{MemoryAuth, MemoryStorage, MemoryStore};
pub use traits::{AuthProvider, ObjectStorage, RecordStore};
pub use types::{AuthIdentity, PropertyQuery, RequestQuery};
