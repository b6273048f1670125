use uuid::Uuid;

use super::draft::InvoiceDraft;
use super::errors::DomainError;
use super::invoice::{Invoice, InvoiceFilters, InvoiceStatus, ListResult};

/// Where finalized drafts are kept once submitted.
pub trait InvoiceRepository {
    /// Stores a finalized draft, assigning its permanent id (and a number
    /// when the draft carries none).
    fn create(&mut self, draft: InvoiceDraft) -> Result<Invoice, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, DomainError>;
    fn list(&self, filters: &InvoiceFilters, page: i64, limit: i64)
        -> Result<ListResult, DomainError>;
    fn update_status(&mut self, id: Uuid, status: InvoiceStatus) -> Result<Invoice, DomainError>;
    fn delete(&mut self, id: Uuid) -> Result<(), DomainError>;
}
