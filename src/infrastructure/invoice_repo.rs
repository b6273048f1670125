use log::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::draft::InvoiceDraft;
use crate::domain::errors::DomainError;
use crate::domain::invoice::{Invoice, InvoiceFilters, InvoiceStatus, ListResult};
use crate::domain::ports::InvoiceRepository;

// ── Repository ────────────────────────────────────────────────────────────────

/// Keeps invoices in memory for the lifetime of the process.
pub struct InMemoryInvoiceRepository {
    invoices: Vec<Invoice>,
    number_prefix: String,
    next_number: u64,
    page_limit_max: i64,
}

impl InMemoryInvoiceRepository {
    pub fn new(config: &Config) -> Self {
        Self {
            invoices: Vec::new(),
            number_prefix: config.number_prefix.clone(),
            next_number: config.number_start,
            page_limit_max: config.page_limit_max.max(1),
        }
    }

    /// Every stored invoice in creation order.
    pub fn all(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    fn assign_number(&mut self) -> String {
        let number = format!("{}{}", self.number_prefix, self.next_number);
        self.next_number += 1;
        number
    }

    fn position(&self, id: Uuid) -> Result<usize, DomainError> {
        self.invoices
            .iter()
            .position(|inv| inv.id == id)
            .ok_or(DomainError::NotFound)
    }
}

impl Default for InMemoryInvoiceRepository {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl InvoiceRepository for InMemoryInvoiceRepository {
    fn create(&mut self, draft: InvoiceDraft) -> Result<Invoice, DomainError> {
        let status = draft.status();
        let (mut header, items, totals) = draft.into_parts();
        if header.number.trim().is_empty() {
            header.number = self.assign_number();
        }

        let invoice = Invoice {
            id: Uuid::new_v4(),
            header,
            items,
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            status,
        };
        info!(
            "Stored invoice {} ({}) with {} lines",
            invoice.header.number,
            invoice.id,
            invoice.items.len()
        );
        self.invoices.push(invoice.clone());
        Ok(invoice)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, DomainError> {
        Ok(self.invoices.iter().find(|inv| inv.id == id).cloned())
    }

    fn list(&self, filters: &InvoiceFilters, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let page = page.max(1);
        let limit = limit.clamp(1, self.page_limit_max);
        let offset = usize::try_from((page - 1).saturating_mul(limit)).unwrap_or(usize::MAX);

        // Newest first.
        let matching: Vec<&Invoice> = self
            .invoices
            .iter()
            .rev()
            .filter(|inv| filters.matches(inv))
            .collect();

        Ok(ListResult {
            total: matching.len() as i64,
            items: matching
                .into_iter()
                .skip(offset)
                .take(limit as usize)
                .cloned()
                .collect(),
        })
    }

    fn update_status(&mut self, id: Uuid, status: InvoiceStatus) -> Result<Invoice, DomainError> {
        let idx = self.position(id)?;
        let invoice = &mut self.invoices[idx];
        if invoice.status == status {
            return Ok(invoice.clone());
        }
        if !invoice.status.can_transition_to(status) {
            warn!(
                "Rejected status change of invoice {} from {} to {}",
                invoice.header.number, invoice.status, status
            );
            return Err(DomainError::InvalidTransition {
                from: invoice.status,
                to: status,
            });
        }

        info!(
            "Invoice {} moved from {} to {}",
            invoice.header.number, invoice.status, status
        );
        invoice.status = status;
        Ok(invoice.clone())
    }

    fn delete(&mut self, id: Uuid) -> Result<(), DomainError> {
        let idx = self.position(id)?;
        let removed = self.invoices.remove(idx);
        info!("Deleted invoice {} ({})", removed.header.number, removed.id);
        Ok(())
    }
}
