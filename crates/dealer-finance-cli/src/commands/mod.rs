pub mod booking;
pub mod catalog;
pub mod emi;
pub mod quotation;
