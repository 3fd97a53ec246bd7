pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "cashflow")]
pub mod cashflow;

#[cfg(feature = "electrolyzer")]
pub mod electrolyzer;

pub use error::Chp2xError;
pub use types::*;

/// Standard result type for all chp2x operations
pub type Chp2xResult<T> = Result<T, Chp2xError>;
