pub mod error;
pub use error::*;
pub mod nested_sqs;
