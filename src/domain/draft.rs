//! The invoice draft engine.
//!
//! [`DraftEngine`] owns at most one [`InvoiceDraft`]. Every mutation goes
//! through an engine method that clamps its input, applies the change and
//! recomputes the derived amounts before returning, so a caller holding
//! `&DraftEngine` only ever sees items and totals that agree with each other.

use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{Local, NaiveDate};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::CatalogRef;
use super::errors::DomainError;
use super::invoice::InvoiceStatus;

/// Tax applied to every invoice subtotal, in percent.
pub const TAX_RATE_PERCENT: i64 = 18;

/// Lowest quantity a line item can hold.
pub const MIN_QUANTITY: i32 = 1;

/// [`TAX_RATE_PERCENT`] as a decimal factor (0.18).
pub fn tax_rate() -> BigDecimal {
    BigDecimal::new(TAX_RATE_PERCENT.into(), 2)
}

pub fn clamp_quantity(quantity: i32) -> i32 {
    quantity.max(MIN_QUANTITY)
}

pub fn clamp_unit_price(unit_price: BigDecimal) -> BigDecimal {
    if unit_price < BigDecimal::zero() {
        BigDecimal::zero()
    } else {
        unit_price
    }
}

/// Reads a quantity typed into a form field. Anything that is not an
/// integer becomes [`MIN_QUANTITY`], as does anything below it.
pub fn parse_quantity(raw: &str) -> i32 {
    raw.trim()
        .parse::<i32>()
        .map(clamp_quantity)
        .unwrap_or(MIN_QUANTITY)
}

/// Reads a unit price typed into a form field. Anything that is not a
/// decimal number becomes zero, as does a negative price.
pub fn parse_unit_price(raw: &str) -> BigDecimal {
    BigDecimal::from_str(raw.trim())
        .map(clamp_unit_price)
        .unwrap_or_else(|_| BigDecimal::zero())
}

// ── Line items ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineItem {
    id: Uuid,
    product_ref: String,
    description: String,
    quantity: i32,
    unit_price: BigDecimal,
    line_subtotal: BigDecimal,
}

impl InvoiceLineItem {
    fn new(product_ref: String, description: String, quantity: i32, unit_price: BigDecimal) -> Self {
        let mut item = Self {
            id: Uuid::new_v4(),
            product_ref,
            description,
            quantity: clamp_quantity(quantity),
            unit_price: clamp_unit_price(unit_price),
            line_subtotal: BigDecimal::zero(),
        };
        item.recompute();
        item
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Empty when no product has been selected for the line.
    pub fn product_ref(&self) -> &str {
        &self.product_ref
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn unit_price(&self) -> &BigDecimal {
        &self.unit_price
    }

    pub fn line_subtotal(&self) -> &BigDecimal {
        &self.line_subtotal
    }

    fn apply(&mut self, patch: LineItemPatch) {
        if let Some(product_ref) = patch.product_ref {
            self.product_ref = product_ref;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = clamp_quantity(quantity);
        }
        if let Some(unit_price) = patch.unit_price {
            self.unit_price = clamp_unit_price(unit_price);
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.line_subtotal = BigDecimal::from(self.quantity) * &self.unit_price;
    }
}

/// Fields to merge into an existing line item. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct LineItemPatch {
    pub product_ref: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price: Option<BigDecimal>,
}

impl LineItemPatch {
    pub fn quantity(quantity: i32) -> Self {
        Self {
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    pub fn unit_price(unit_price: BigDecimal) -> Self {
        Self {
            unit_price: Some(unit_price),
            ..Self::default()
        }
    }
}

// ── Header ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceHeader {
    /// Assigned by the user; uniqueness is the repository's concern.
    pub number: String,
    pub date: NaiveDate,
    pub customer: Option<CatalogRef>,
    pub payment_term: Option<CatalogRef>,
    pub salesperson: Option<CatalogRef>,
    pub comments: String,
}

impl InvoiceHeader {
    fn empty(date: NaiveDate) -> Self {
        Self {
            number: String::new(),
            date,
            customer: None,
            payment_term: None,
            salesperson: None,
            comments: String::new(),
        }
    }
}

/// One header attribute together with its new value.
#[derive(Debug, Clone)]
pub enum HeaderField {
    Number(String),
    Date(NaiveDate),
    Customer(CatalogRef),
    PaymentTerm(CatalogRef),
    Salesperson(CatalogRef),
    Comments(String),
}

impl HeaderField {
    fn name(&self) -> &'static str {
        match self {
            HeaderField::Number(_) => "number",
            HeaderField::Date(_) => "date",
            HeaderField::Customer(_) => "customer",
            HeaderField::PaymentTerm(_) => "payment_term",
            HeaderField::Salesperson(_) => "salesperson",
            HeaderField::Comments(_) => "comments",
        }
    }
}

// ── Draft ────────────────────────────────────────────────────────────────────

/// Subtotal, tax and total of a set of line items, at full precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub total: BigDecimal,
}

impl Totals {
    pub fn of(items: &[InvoiceLineItem]) -> Self {
        let subtotal = items
            .iter()
            .fold(BigDecimal::zero(), |acc, item| acc + &item.line_subtotal);
        let tax = &subtotal * &tax_rate();
        let total = &subtotal + &tax;
        Self {
            subtotal,
            tax,
            total,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    header: InvoiceHeader,
    items: Vec<InvoiceLineItem>,
    totals: Totals,
    status: InvoiceStatus,
}

impl InvoiceDraft {
    fn new(date: NaiveDate) -> Self {
        Self {
            header: InvoiceHeader::empty(date),
            items: Vec::new(),
            totals: Totals::of(&[]),
            status: InvoiceStatus::Draft,
        }
    }

    pub fn header(&self) -> &InvoiceHeader {
        &self.header
    }

    pub fn items(&self) -> &[InvoiceLineItem] {
        &self.items
    }

    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    pub fn subtotal(&self) -> &BigDecimal {
        &self.totals.subtotal
    }

    pub fn tax_amount(&self) -> &BigDecimal {
        &self.totals.tax
    }

    pub fn total(&self) -> &BigDecimal {
        &self.totals.total
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn into_parts(self) -> (InvoiceHeader, Vec<InvoiceLineItem>, Totals) {
        (self.header, self.items, self.totals)
    }

    fn recompute(&mut self) {
        self.totals = Totals::of(&self.items);
    }

    fn check_index(&self, index: usize) -> Result<(), DomainError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(DomainError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }

    fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        if self.header.number.trim().is_empty() {
            violations.push(Violation::MissingNumber);
        }
        if self.header.customer.is_none() {
            violations.push(Violation::MissingCustomer);
        }
        if self.header.payment_term.is_none() {
            violations.push(Violation::MissingPaymentTerm);
        }
        if self.header.salesperson.is_none() {
            violations.push(Violation::MissingSalesperson);
        }
        if self.items.is_empty() {
            violations.push(Violation::NoItems);
        }
        violations
    }
}

/// A reason a draft cannot be submitted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    MissingNumber,
    MissingCustomer,
    MissingPaymentTerm,
    MissingSalesperson,
    NoItems,
}

impl Violation {
    /// The form field the violation is reported against.
    pub fn field(&self) -> &'static str {
        match self {
            Violation::MissingNumber => "number",
            Violation::MissingCustomer => "customerId",
            Violation::MissingPaymentTerm => "paymentTermId",
            Violation::MissingSalesperson => "salespersonId",
            Violation::NoItems => "items",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Violation::MissingNumber => "Invoice number is required",
            Violation::MissingCustomer => "Customer is required",
            Violation::MissingPaymentTerm => "Payment term is required",
            Violation::MissingSalesperson => "Salesperson is required",
            Violation::NoItems => "At least one item is required",
        };
        f.write_str(msg)
    }
}

// ── Engine ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct DraftEngine {
    draft: Option<InvoiceDraft>,
}

impl DraftEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new draft dated today, dropping any draft already held.
    pub fn init_draft(&mut self) -> &InvoiceDraft {
        let today = Local::now().date_naive();
        if self.draft.is_some() {
            warn!("Replacing an unfinished draft invoice");
        }
        debug!("Starting draft invoice dated {}", today);
        self.draft.insert(InvoiceDraft::new(today))
    }

    pub fn draft(&self) -> Option<&InvoiceDraft> {
        self.draft.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.draft.is_some()
    }

    pub fn set_header_field(&mut self, field: HeaderField) -> Result<(), DomainError> {
        let draft = self.active_mut()?;
        debug!("Setting draft header field {}", field.name());
        let header = &mut draft.header;
        match field {
            HeaderField::Number(number) => header.number = number,
            HeaderField::Date(date) => header.date = date,
            HeaderField::Customer(r) => header.customer = Some(r),
            HeaderField::PaymentTerm(r) => header.payment_term = Some(r),
            HeaderField::Salesperson(r) => header.salesperson = Some(r),
            HeaderField::Comments(comments) => header.comments = comments,
        }
        Ok(())
    }

    /// Appends a line and returns its id. Quantity and price are clamped,
    /// never rejected.
    pub fn add_line_item(
        &mut self,
        product_ref: impl Into<String>,
        description: impl Into<String>,
        quantity: i32,
        unit_price: BigDecimal,
    ) -> Result<Uuid, DomainError> {
        let draft = self.active_mut()?;
        let item = InvoiceLineItem::new(product_ref.into(), description.into(), quantity, unit_price);
        let id = item.id;
        debug!(
            "Adding line {} ({} x {})",
            item.product_ref, item.quantity, item.unit_price
        );
        draft.items.push(item);
        draft.recompute();
        Ok(id)
    }

    pub fn update_line_item(&mut self, index: usize, patch: LineItemPatch) -> Result<(), DomainError> {
        let draft = self.active_mut()?;
        draft.check_index(index)?;
        draft.items[index].apply(patch);
        debug!("Updated line {}", index);
        draft.recompute();
        Ok(())
    }

    /// Removes the line at `index`; later lines move down by one.
    pub fn remove_line_item(&mut self, index: usize) -> Result<InvoiceLineItem, DomainError> {
        let draft = self.active_mut()?;
        draft.check_index(index)?;
        let removed = draft.items.remove(index);
        debug!("Removed line {} ({})", index, removed.product_ref);
        draft.recompute();
        Ok(removed)
    }

    /// Every mutating method already ends with this; calling it again
    /// changes nothing.
    pub fn recompute_totals(&mut self) -> Result<(), DomainError> {
        self.active_mut()?.recompute();
        Ok(())
    }

    pub fn validate_for_submission(&self) -> Result<Vec<Violation>, DomainError> {
        Ok(self.active()?.violations())
    }

    /// Hands the draft over and returns the engine to its empty state. The
    /// status stays `draft`; issuing is up to whoever persists it.
    pub fn finalize_and_clear(&mut self) -> Result<InvoiceDraft, DomainError> {
        let draft = self.draft.take().ok_or(DomainError::NoDraft)?;
        debug!("Finalized draft invoice '{}'", draft.header.number);
        Ok(draft)
    }

    /// Discards the draft without producing anything.
    pub fn clear_draft(&mut self) {
        if self.draft.take().is_some() {
            debug!("Discarded draft invoice");
        }
    }

    fn active(&self) -> Result<&InvoiceDraft, DomainError> {
        self.draft.as_ref().ok_or(DomainError::NoDraft)
    }

    fn active_mut(&mut self) -> Result<&mut InvoiceDraft, DomainError> {
        self.draft.as_mut().ok_or(DomainError::NoDraft)
    }
}
