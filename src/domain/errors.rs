use thiserror::Error;

use super::invoice::InvoiceStatus;

#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("No draft invoice is active")]
    NoDraft,
    #[error("Line item index {index} is out of range (draft has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Invoice not found")]
    NotFound,
    #[error("Unknown {kind} '{id}'")]
    UnknownReference { kind: &'static str, id: String },
    #[error("Cannot move invoice from {from} to {to}")]
    InvalidTransition {
        from: InvoiceStatus,
        to: InvoiceStatus,
    },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
