pub mod image;
pub mod request;
pub mod response;
pub mod storage;

pub use image::*;
pub use request::*;
pub use response::*;
pub use storage::*;
