pub mod client;
mod error;
pub mod images;
pub mod incidents;
pub mod losses;
pub mod suspects;
pub mod wire;

pub use client::{ApiClient, CancelToken, Credentials};
pub use error::ApiError;
