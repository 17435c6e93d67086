pub mod client;
pub mod interface;

pub use client::QnaMakerClient;
pub use interface::{QnaClient, QnaError};
