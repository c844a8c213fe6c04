use crate::{
    error::Result,
    models::storage::{SignedUrl, StoredImage},
};
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes the object, silently replacing anything stored under the same key.
    async fn put_object(&self, image: &StoredImage) -> Result<()>;

    /// Issues a GET link for `key` that stops working after `expires_in`.
    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<SignedUrl>;

    fn bucket(&self) -> &str;
}
