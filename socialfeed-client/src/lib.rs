pub mod api;
pub mod dispatch;
pub mod error;
pub mod lifecycle;
pub mod notify;
pub mod view;

pub use error::{ClientError, Result};
