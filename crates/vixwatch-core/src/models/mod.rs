//! Data models for vixwatch

mod alert;
mod quote;
mod response;

pub use alert::*;
pub use quote::*;
pub use response::*;
