pub mod error;
pub mod format;
pub mod types;

#[cfg(feature = "catalog")]
pub mod catalog;

#[cfg(feature = "emi")]
pub mod emi;

#[cfg(any(feature = "quotation", feature = "booking"))]
pub mod contact;

#[cfg(feature = "quotation")]
pub mod quotation;

#[cfg(feature = "booking")]
pub mod booking;

pub use error::DealerFinanceError;
pub use types::*;

/// Standard result type for all dealer-finance operations
pub type DealerFinanceResult<T> = Result<T, DealerFinanceError>;
