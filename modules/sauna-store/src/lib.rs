pub mod error;
pub mod memory;
pub mod pg;
pub mod rest;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::MemorySaunaStore;
pub use pg::PgSaunaStore;
pub use rest::RestSaunaStore;
pub use store::{with_deadline, SaunaFilter, SaunaStore};
