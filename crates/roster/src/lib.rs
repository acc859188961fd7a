pub mod schema;
pub mod storage;
pub mod profile;
pub mod store;
pub mod document;

pub use schema::*;
pub use storage::{DiskStorage, InMemoryStorage, Storage};
pub use profile::*;
pub use store::*;
pub use document::*;
