pub mod upload;

pub use upload::{PingResponse, UploadResponse};
