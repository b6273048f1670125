use bigdecimal::BigDecimal;
use log::{info, warn};
use thiserror::Error;
use uuid::Uuid;

use super::draft_request::DraftRequest;
use crate::domain::catalog::Catalog;
use crate::domain::draft::{
    parse_quantity, parse_unit_price, DraftEngine, HeaderField, Violation, MIN_QUANTITY,
};
use crate::domain::errors::DomainError;
use crate::domain::invoice::{Invoice, InvoiceFilters, InvoiceStatus, ListResult};
use crate::domain::ports::InvoiceRepository;

#[derive(Debug, Error, PartialEq)]
pub enum SubmitError {
    /// The draft failed the pre-check; it is still held by the engine.
    #[error("Invoice is incomplete: {}", join(.0))]
    Invalid(Vec<Violation>),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Drives the create-invoice screen: catalog selections go into the draft
/// as denormalized copies, and a submitted draft ends up in the repository.
pub struct InvoiceService<R> {
    repo: R,
    catalog: Catalog,
}

impl<R: InvoiceRepository> InvoiceService<R> {
    pub fn new(repo: R, catalog: Catalog) -> Self {
        Self { repo, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn select_customer(&self, engine: &mut DraftEngine, id: &str) -> Result<(), DomainError> {
        let customer = self.catalog.select_customer(id)?;
        engine.set_header_field(HeaderField::Customer(customer))
    }

    pub fn select_payment_term(&self, engine: &mut DraftEngine, id: &str) -> Result<(), DomainError> {
        let term = self.catalog.select_payment_term(id)?;
        engine.set_header_field(HeaderField::PaymentTerm(term))
    }

    pub fn select_salesperson(&self, engine: &mut DraftEngine, id: &str) -> Result<(), DomainError> {
        let salesperson = self.catalog.select_salesperson(id)?;
        engine.set_header_field(HeaderField::Salesperson(salesperson))
    }

    /// Adds a line for `product_id` at the product's current catalog price.
    pub fn add_product(
        &self,
        engine: &mut DraftEngine,
        product_id: &str,
        quantity: i32,
    ) -> Result<Uuid, DomainError> {
        let (product, price) = self.catalog.select_product(product_id)?;
        engine.add_line_item(product.id, product.display_name, quantity, price)
    }

    /// Like [`add_product`](Self::add_product) but with a negotiated price
    /// instead of the catalog one.
    pub fn add_product_at(
        &self,
        engine: &mut DraftEngine,
        product_id: &str,
        quantity: i32,
        unit_price: BigDecimal,
    ) -> Result<Uuid, DomainError> {
        let (product, _) = self.catalog.select_product(product_id)?;
        engine.add_line_item(product.id, product.display_name, quantity, unit_price)
    }

    /// Starts a new draft in `engine` and fills it from a request, resolving
    /// every id against the catalog. Stops at the first unknown id; the
    /// partly filled draft stays in the engine.
    pub fn start_draft(&self, engine: &mut DraftEngine, request: &DraftRequest) -> Result<(), DomainError> {
        engine.init_draft();
        engine.set_header_field(HeaderField::Number(request.number.clone()))?;
        if let Some(date) = request.date {
            engine.set_header_field(HeaderField::Date(date))?;
        }
        if let Some(id) = &request.customer_id {
            self.select_customer(engine, id)?;
        }
        if let Some(id) = &request.payment_term_id {
            self.select_payment_term(engine, id)?;
        }
        if let Some(id) = &request.salesperson_id {
            self.select_salesperson(engine, id)?;
        }
        engine.set_header_field(HeaderField::Comments(request.comments.clone()))?;

        for line in &request.lines {
            let quantity = line
                .quantity
                .as_ref()
                .map_or(MIN_QUANTITY, |raw| parse_quantity(&raw.to_string()));
            match &line.unit_price {
                Some(raw) => {
                    self.add_product_at(engine, &line.product_id, quantity, parse_unit_price(raw))?
                }
                None => self.add_product(engine, &line.product_id, quantity)?,
            };
        }
        Ok(())
    }

    /// Validates the engine's draft and, if nothing is missing, moves it
    /// into the repository. On violations the engine keeps the draft.
    pub fn submit(&mut self, engine: &mut DraftEngine) -> Result<Invoice, SubmitError> {
        let violations = engine.validate_for_submission()?;
        if !violations.is_empty() {
            warn!("Submission blocked: {}", join(&violations));
            return Err(SubmitError::Invalid(violations));
        }

        let draft = engine.finalize_and_clear()?;
        let invoice = self.repo.create(draft)?;
        info!(
            "Submitted invoice {} for {}",
            invoice.header.number, invoice.total
        );
        Ok(invoice)
    }

    pub fn get_invoice(&self, id: Uuid) -> Result<Option<Invoice>, DomainError> {
        self.repo.find_by_id(id)
    }

    pub fn list_invoices(
        &self,
        filters: &InvoiceFilters,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        self.repo.list(filters, page, limit)
    }

    pub fn issue(&mut self, id: Uuid) -> Result<Invoice, DomainError> {
        self.repo.update_status(id, InvoiceStatus::Issued)
    }

    pub fn mark_paid(&mut self, id: Uuid) -> Result<Invoice, DomainError> {
        self.repo.update_status(id, InvoiceStatus::Paid)
    }

    pub fn cancel(&mut self, id: Uuid) -> Result<Invoice, DomainError> {
        self.repo.update_status(id, InvoiceStatus::Cancelled)
    }

    pub fn delete_invoice(&mut self, id: Uuid) -> Result<(), DomainError> {
        self.repo.delete(id)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::infrastructure::invoice_repo::InMemoryInvoiceRepository;
    use crate::infrastructure::seed;

    fn service() -> InvoiceService<InMemoryInvoiceRepository> {
        InvoiceService::new(InMemoryInvoiceRepository::default(), seed::catalog())
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    #[test]
    fn selections_copy_display_names() {
        let svc = service();
        let mut engine = DraftEngine::new();
        engine.init_draft();

        svc.select_customer(&mut engine, "cust-2").unwrap();
        svc.select_payment_term(&mut engine, "term-3").unwrap();
        svc.select_salesperson(&mut engine, "sp-1").unwrap();

        let header = engine.draft().unwrap().header();
        assert_eq!(header.customer.as_ref().unwrap().display_name, "Globex Inc");
        assert_eq!(header.payment_term.as_ref().unwrap().display_name, "Net 45");
        assert_eq!(header.salesperson.as_ref().unwrap().display_name, "John Doe");
    }

    #[test]
    fn unknown_selection_leaves_header_unset() {
        let svc = service();
        let mut engine = DraftEngine::new();
        engine.init_draft();

        let err = svc.select_customer(&mut engine, "cust-99").unwrap_err();
        assert!(matches!(err, DomainError::UnknownReference { kind: "customer", .. }));
        assert!(engine.draft().unwrap().header().customer.is_none());
    }

    #[test]
    fn add_product_snapshots_catalog_price() {
        let svc = service();
        let mut engine = DraftEngine::new();
        engine.init_draft();

        svc.add_product(&mut engine, "prod-4", 2).unwrap();
        svc.add_product_at(&mut engine, "prod-5", 1, dec("30")).unwrap();

        let items = engine.draft().unwrap().items();
        assert_eq!(items[0].description(), "Wireless Keyboard");
        assert_eq!(*items[0].unit_price(), dec("59.99"));
        assert_eq!(*items[1].unit_price(), dec("30"));
        assert_eq!(*engine.draft().unwrap().subtotal(), dec("149.98"));
    }

    #[test]
    fn submit_blocks_incomplete_draft_and_keeps_it() {
        let mut svc = service();
        let mut engine = DraftEngine::new();
        engine.init_draft();
        svc.add_product(&mut engine, "prod-1", 1).unwrap();

        let err = svc.submit(&mut engine).unwrap_err();
        assert_eq!(
            err,
            SubmitError::Invalid(vec![
                Violation::MissingNumber,
                Violation::MissingCustomer,
                Violation::MissingPaymentTerm,
                Violation::MissingSalesperson,
            ])
        );
        assert!(engine.is_active());
        assert_eq!(engine.draft().unwrap().items().len(), 1);
        assert!(svc.repository().is_empty());
    }

    #[test]
    fn submit_without_draft_fails() {
        let mut svc = service();
        let mut engine = DraftEngine::new();
        assert_eq!(
            svc.submit(&mut engine),
            Err(SubmitError::Domain(DomainError::NoDraft))
        );
    }

    #[test]
    fn submit_stores_draft_and_clears_engine() {
        let mut svc = service();
        let mut engine = DraftEngine::new();
        engine.init_draft();
        engine
            .set_header_field(HeaderField::Number("INV-9001".into()))
            .unwrap();
        svc.select_customer(&mut engine, "cust-1").unwrap();
        svc.select_payment_term(&mut engine, "term-2").unwrap();
        svc.select_salesperson(&mut engine, "sp-2").unwrap();
        svc.add_product(&mut engine, "prod-2", 2).unwrap();

        let invoice = svc.submit(&mut engine).unwrap();
        assert!(!engine.is_active());
        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert_eq!(invoice.subtotal, dec("299.98"));
        assert_eq!(invoice.tax, dec("53.9964"));
        assert_eq!(invoice.total, dec("353.9764"));
        assert_eq!(svc.get_invoice(invoice.id).unwrap(), Some(invoice.clone()));

        let issued = svc.issue(invoice.id).unwrap();
        assert_eq!(issued.status, InvoiceStatus::Issued);
        assert_eq!(svc.mark_paid(invoice.id).unwrap().status, InvoiceStatus::Paid);
        assert!(svc.cancel(invoice.id).is_err());

        svc.delete_invoice(invoice.id).unwrap();
        assert_eq!(
            svc.list_invoices(&InvoiceFilters::default(), 1, 10).unwrap().total,
            0
        );
    }

    #[test]
    fn start_draft_fills_from_request() {
        let svc = service();
        let mut engine = DraftEngine::new();
        let request: DraftRequest = serde_json::from_str(
            r#"{
                "number": "INV-7",
                "date": "2023-09-15",
                "customerId": "cust-3",
                "paymentTermId": "term-1",
                "salespersonId": "sp-3",
                "lines": [
                    {"productId": "prod-8", "quantity": 0},
                    {"productId": "prod-7", "quantity": 2, "unitPrice": "oops"}
                ]
            }"#,
        )
        .unwrap();

        svc.start_draft(&mut engine, &request).unwrap();

        let draft = engine.draft().unwrap();
        assert_eq!(draft.header().number, "INV-7");
        assert_eq!(draft.items()[0].quantity(), 1);
        assert_eq!(*draft.items()[0].unit_price(), dec("199.99"));
        assert_eq!(*draft.items()[1].unit_price(), dec("0"));
        assert_eq!(*draft.subtotal(), dec("199.99"));
        assert!(engine.validate_for_submission().unwrap().is_empty());
    }

    #[test]
    fn start_draft_clamps_unreadable_quantities() {
        let svc = service();
        let mut engine = DraftEngine::new();
        let request: DraftRequest = serde_json::from_str(
            r#"{"lines": [
                {"productId": "prod-4", "quantity": "abc"},
                {"productId": "prod-4", "quantity": 2.5},
                {"productId": "prod-4", "quantity": 3000000000},
                {"productId": "prod-4", "quantity": "-3"},
                {"productId": "prod-4", "quantity": " 4 "},
                {"productId": "prod-4"}
            ]}"#,
        )
        .unwrap();

        svc.start_draft(&mut engine, &request).unwrap();

        let quantities: Vec<_> = engine
            .draft()
            .unwrap()
            .items()
            .iter()
            .map(|item| item.quantity())
            .collect();
        assert_eq!(quantities, vec![1, 1, 1, 1, 4, 1]);
    }

    #[test]
    fn start_draft_rejects_inactive_product() {
        let svc = service();
        let mut engine = DraftEngine::new();
        let request = DraftRequest {
            lines: vec![serde_json::from_str(r#"{"productId":"prod-6"}"#).unwrap()],
            ..DraftRequest::default()
        };

        let err = svc.start_draft(&mut engine, &request).unwrap_err();
        assert!(matches!(err, DomainError::UnknownReference { kind: "product", .. }));
    }

    #[test]
    fn submit_error_lists_violations() {
        let err = SubmitError::Invalid(vec![Violation::MissingNumber, Violation::NoItems]);
        assert_eq!(
            err.to_string(),
            "Invoice is incomplete: Invoice number is required, At least one item is required"
        );
    }
}
