pub mod client;
pub mod types;

pub use client::{CommentPages, FedditClient, FedditError};
pub use types::{Comment, SubfedditInfo, TimeWindow};
