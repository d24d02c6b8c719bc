pub mod calendar;
pub mod error;
pub mod types;

#[cfg(feature = "ratios")]
pub mod ratios;

#[cfg(feature = "forecast")]
pub mod forecast;

pub use error::PacingError;
pub use types::*;

/// Standard result type for all pacing operations
pub type PacingResult<T> = Result<T, PacingError>;
