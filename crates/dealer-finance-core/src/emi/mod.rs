//! Flat-interest EMI calculations.
//!
//! [`engine`] holds the pure arithmetic and never fails. [`policy`] decides
//! which rate, fee and tenures apply. [`calculator`] is the validated request
//! layer used by the CLI and bindings.

pub mod calculator;
pub mod engine;
pub mod policy;

pub use calculator::{calculate_emi, EmiInput, EmiOutput, TenureQuote};
pub use engine::{
    checked_quote, checked_quote_many, quote, quote_many, years, FinancingTerms, LoanQuoteRequest,
    LoanQuoteResult,
};
pub use policy::{
    LoanPolicy, RateBounds, RatePolicy, RateSource, RateTier, DEFAULT_PROCESSING_FEE,
    DEFAULT_TENURES_MONTHS,
};
