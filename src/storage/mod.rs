pub mod s3;
pub mod traits;

pub use s3::S3Store;
pub use traits::ObjectStore;
