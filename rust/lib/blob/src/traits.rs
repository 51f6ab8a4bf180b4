use crate::error::BlobError;

/// BlobStore holds uploaded files (profile pictures).
///
/// Names are flat file names such as `1718000000000.png`; nested paths
/// are rejected. The default implementation (`FileStore`) maps names to
/// files in one directory.
pub trait BlobStore: Send + Sync {
    /// Store a blob. Overwrites if the name already exists.
    fn put(&self, name: &str, data: &[u8]) -> Result<(), BlobError>;

    /// Store a blob only if the name is free. Returns false, writing
    /// nothing, when the name already exists.
    fn put_new(&self, name: &str, data: &[u8]) -> Result<bool, BlobError>;

    /// Retrieve a blob. Returns None if the name does not exist.
    fn get(&self, name: &str) -> Result<Option<Vec<u8>>, BlobError>;

    /// Delete a blob. No-op if the name does not exist.
    fn delete(&self, name: &str) -> Result<(), BlobError>;
}
