pub mod error;
pub mod logger;
pub mod shared_instance;
pub mod validation;
