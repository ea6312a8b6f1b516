pub mod config;
pub mod driver;
mod error;
pub mod http;
pub mod record;
pub mod store;

pub use crate::driver::Driver;
pub use crate::error::{Error, Result};
pub use crate::http::serve;
pub use record::Todo;
pub use store::{Bucket, Store};
