pub mod error;
pub mod redb;
pub mod traits;

pub use error::KVError;
pub use redb::RedbStore;
pub use traits::{KVStore, UpdateFn};
