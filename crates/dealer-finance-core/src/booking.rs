//! Booking request checks.
//!
//! A booking reserves a vehicle against a token amount and two identity
//! documents. Only validation and normalization live here; storing the
//! booking and its uploads is the caller's business.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::contact::{is_valid_email, is_valid_mobile, non_blank, normalize_mobile};
use crate::error::DealerFinanceError;
use crate::types::*;
use crate::DealerFinanceResult;

const MIB: u64 = 1024 * 1024;

/// Booking rules that vary by dealer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingPolicy {
    pub min_booking_amount: Money,
    /// Uploads must be strictly smaller than this
    pub max_document_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            min_booking_amount: dec!(500),
            max_document_bytes: 4 * MIB,
            allowed_content_types: vec![
                "application/pdf".into(),
                "image/jpeg".into(),
                "image/png".into(),
            ],
        }
    }
}

/// Metadata of an uploaded document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDocuments {
    #[serde(default)]
    pub aadhar: Option<DocumentInfo>,
    #[serde(default)]
    pub pan: Option<DocumentInfo>,
}

/// Input for a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub customer_name: String,
    pub mobile_number: String,
    #[serde(default)]
    pub alternate_mobile_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub booking_amount: Money,
    pub address: String,
    pub bike_model: String,
    pub variant: String,
    #[serde(default)]
    pub documents: BookingDocuments,
}

/// A booking that passed every check, with fields normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSubmission {
    pub customer_name: String,
    pub mobile_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_mobile_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub booking_amount: Money,
    pub address: String,
    pub bike_model: String,
    pub variant: String,
    pub documents: BookingDocuments,
}

/// Validate a booking request and return its normalized form.
pub fn validate_booking(
    request: &BookingRequest,
    policy: &BookingPolicy,
) -> DealerFinanceResult<ComputationOutput<BookingSubmission>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let customer_name = required(
        &request.customer_name,
        "customer_name",
        "Please enter customer name",
    )?;

    let mobile_number = normalize_mobile(&request.mobile_number);
    if !is_valid_mobile(&mobile_number) {
        return Err(DealerFinanceError::InvalidInput {
            field: "mobile_number".into(),
            reason: "Enter a valid 10-digit Indian mobile number".into(),
        });
    }

    let alternate_mobile_number = non_blank(request.alternate_mobile_number.as_deref())
        .map(|m| normalize_mobile(&m))
        .filter(|m| !m.is_empty());
    if let Some(alt) = &alternate_mobile_number {
        if !is_valid_mobile(alt) {
            return Err(DealerFinanceError::InvalidInput {
                field: "alternate_mobile_number".into(),
                reason: "Enter a valid 10-digit number".into(),
            });
        }
        if *alt == mobile_number {
            warnings.push("Alternate mobile number is the same as the primary number.".into());
        }
    }

    let email = non_blank(request.email.as_deref());
    if let Some(e) = &email {
        if !is_valid_email(e) {
            return Err(DealerFinanceError::InvalidInput {
                field: "email".into(),
                reason: "Enter a valid email address".into(),
            });
        }
    }

    if request.booking_amount < policy.min_booking_amount {
        return Err(DealerFinanceError::InvalidInput {
            field: "booking_amount".into(),
            reason: format!("Minimum booking amount is {}", policy.min_booking_amount),
        });
    }

    let address = required(&request.address, "address", "Please enter address")?;
    let bike_model = required(&request.bike_model, "bike_model", "Select a model")?;
    let variant = required(&request.variant, "variant", "Select a variant")?;

    check_document(
        request.documents.aadhar.as_ref(),
        "documents.aadhar",
        "Upload Aadhar",
        policy,
    )?;
    check_document(
        request.documents.pan.as_ref(),
        "documents.pan",
        "Upload PAN",
        policy,
    )?;

    let output = BookingSubmission {
        customer_name,
        mobile_number,
        alternate_mobile_number,
        email,
        booking_amount: request.booking_amount,
        address,
        bike_model,
        variant,
        documents: request.documents.clone(),
    };

    tracing::debug!(bike_model = %output.bike_model, "booking validated");

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Booking request validation",
        &serde_json::json!({
            "min_booking_amount": policy.min_booking_amount.to_string(),
            "max_document_bytes": policy.max_document_bytes,
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn required(value: &str, field: &str, reason: &str) -> DealerFinanceResult<String> {
    non_blank(Some(value)).ok_or_else(|| DealerFinanceError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    })
}

fn check_document(
    doc: Option<&DocumentInfo>,
    field: &str,
    missing: &str,
    policy: &BookingPolicy,
) -> DealerFinanceResult<()> {
    let doc = doc.ok_or_else(|| DealerFinanceError::InvalidInput {
        field: field.into(),
        reason: missing.into(),
    })?;

    let content_type = doc.content_type.trim().to_ascii_lowercase();
    if !policy
        .allowed_content_types
        .iter()
        .any(|t| t.eq_ignore_ascii_case(&content_type))
    {
        return Err(DealerFinanceError::InvalidInput {
            field: field.into(),
            reason: "Only PDF / JPG / PNG are allowed".into(),
        });
    }

    if doc.size_bytes >= policy.max_document_bytes {
        let limit_mib = Decimal::from(policy.max_document_bytes) / Decimal::from(MIB);
        return Err(DealerFinanceError::InvalidInput {
            field: field.into(),
            reason: format!("File must be smaller than {}MB", limit_mib.normalize()),
        });
    }

    Ok(())
}
