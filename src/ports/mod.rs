pub mod services;
pub mod storage;

pub use services::*;
pub use storage::*;
