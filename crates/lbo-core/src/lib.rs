pub mod assumptions;
pub mod error;
pub mod lbo;
pub mod types;

pub use assumptions::{AssumptionOverrides, Assumptions};
pub use error::LboError;
pub use types::*;

/// Standard result type for all LBO engine operations
pub type LboResult<T> = Result<T, LboError>;
