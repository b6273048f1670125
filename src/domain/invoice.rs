use std::fmt;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::CatalogRef;
use super::draft::{InvoiceHeader, InvoiceLineItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Issued,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Issued => "issued",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    /// Draft invoices are issued or cancelled; issued invoices are paid or
    /// cancelled. Paid and cancelled are terminal.
    pub fn can_transition_to(self, next: InvoiceStatus) -> bool {
        use InvoiceStatus::*;
        matches!(
            (self, next),
            (Draft, Issued) | (Draft, Cancelled) | (Issued, Paid) | (Issued, Cancelled)
        )
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An invoice as stored by the repository.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    #[serde(flatten)]
    pub header: InvoiceHeader,
    pub items: Vec<InvoiceLineItem>,
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub total: BigDecimal,
    pub status: InvoiceStatus,
}

/// Optional criteria for listing invoices; `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilters {
    pub customer_id: Option<String>,
    pub salesperson_id: Option<String>,
    pub payment_term_id: Option<String>,
    pub status: Option<InvoiceStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive text matched against the invoice number and the
    /// customer name. Blank matches everything.
    pub search: Option<String>,
}

impl InvoiceFilters {
    pub fn matches(&self, invoice: &Invoice) -> bool {
        fn ref_matches(wanted: &Option<String>, actual: &Option<CatalogRef>) -> bool {
            match wanted {
                None => true,
                Some(id) => actual.as_ref().is_some_and(|r| &r.id == id),
            }
        }

        let header = &invoice.header;
        ref_matches(&self.customer_id, &header.customer)
            && ref_matches(&self.salesperson_id, &header.salesperson)
            && ref_matches(&self.payment_term_id, &header.payment_term)
            && self.status.map_or(true, |s| s == invoice.status)
            && self.start_date.map_or(true, |d| header.date >= d)
            && self.end_date.map_or(true, |d| header.date <= d)
            && self.search.as_deref().map_or(true, |term| search_matches(term, header))
    }
}

fn search_matches(term: &str, header: &InvoiceHeader) -> bool {
    let term = term.trim().to_lowercase();
    term.is_empty()
        || header.number.to_lowercase().contains(&term)
        || header
            .customer
            .as_ref()
            .is_some_and(|c| c.display_name.to_lowercase().contains(&term))
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<Invoice>,
    pub total: i64,
}
