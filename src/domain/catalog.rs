//! Read-only reference data the invoice screens select from.

use std::fmt;

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// Id plus display name copied from a catalog entry at selection time.
///
/// The copy is not kept in sync with the catalog: editing the entry later
/// leaves drafts and invoices that already hold the reference unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRef {
    pub id: String,
    pub display_name: String,
}

impl CatalogRef {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub business_name: String,
    pub legal_name: String,
    pub tax_id: String,
    pub account_number: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub description: String,
    pub unit_cost: BigDecimal,
    pub unit_price: BigDecimal,
    pub is_active: bool,
}

impl Customer {
    /// Checks the fields the customer form requires.
    pub fn validate(&self) -> Vec<EntryViolation> {
        let mut violations = Vec::new();
        for (value, violation) in [
            (&self.business_name, EntryViolation::MissingBusinessName),
            (&self.legal_name, EntryViolation::MissingLegalName),
            (&self.tax_id, EntryViolation::MissingTaxId),
            (&self.account_number, EntryViolation::MissingAccountNumber),
        ] {
            if value.trim().is_empty() {
                violations.push(violation);
            }
        }
        violations
    }
}

impl Product {
    /// Checks the description and the cost/price pair. A price below cost
    /// is reported instead of a negative price, one problem per field.
    pub fn validate(&self) -> Vec<EntryViolation> {
        let mut violations = Vec::new();
        if self.description.trim().is_empty() {
            violations.push(EntryViolation::MissingDescription);
        }
        if self.unit_cost < BigDecimal::zero() {
            violations.push(EntryViolation::NegativeUnitCost);
        }
        if self.unit_price < self.unit_cost {
            violations.push(EntryViolation::PriceBelowCost);
        } else if self.unit_price < BigDecimal::zero() {
            violations.push(EntryViolation::NegativeUnitPrice);
        }
        violations
    }
}

/// A reason a customer or product entry cannot be saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryViolation {
    MissingBusinessName,
    MissingLegalName,
    MissingTaxId,
    MissingAccountNumber,
    MissingDescription,
    NegativeUnitCost,
    NegativeUnitPrice,
    PriceBelowCost,
}

impl EntryViolation {
    pub fn field(&self) -> &'static str {
        match self {
            EntryViolation::MissingBusinessName => "businessName",
            EntryViolation::MissingLegalName => "legalName",
            EntryViolation::MissingTaxId => "taxId",
            EntryViolation::MissingAccountNumber => "accountNumber",
            EntryViolation::MissingDescription => "description",
            EntryViolation::NegativeUnitCost => "unitCost",
            EntryViolation::NegativeUnitPrice | EntryViolation::PriceBelowCost => "unitPrice",
        }
    }
}

impl fmt::Display for EntryViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            EntryViolation::MissingBusinessName => "Business name is required",
            EntryViolation::MissingLegalName => "Legal name is required",
            EntryViolation::MissingTaxId => "Tax ID is required",
            EntryViolation::MissingAccountNumber => "Account number is required",
            EntryViolation::MissingDescription => "Product description is required",
            EntryViolation::NegativeUnitCost => "Unit cost cannot be negative",
            EntryViolation::NegativeUnitPrice => "Unit price cannot be negative",
            EntryViolation::PriceBelowCost => "Unit price must be greater than unit cost",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTerm {
    pub id: String,
    pub description: String,
    pub days: u32,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salesperson {
    pub id: String,
    pub name: String,
    pub commission_percentage: BigDecimal,
    pub is_active: bool,
}

/// The four reference lists, in display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub payment_terms: Vec<PaymentTerm>,
    pub salespeople: Vec<Salesperson>,
}

impl Catalog {
    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn payment_term(&self, id: &str) -> Option<&PaymentTerm> {
        self.payment_terms.iter().find(|t| t.id == id)
    }

    pub fn salesperson(&self, id: &str) -> Option<&Salesperson> {
        self.salespeople.iter().find(|s| s.id == id)
    }

    pub fn active_customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter().filter(|c| c.is_active)
    }

    pub fn active_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_active)
    }

    pub fn active_payment_terms(&self) -> impl Iterator<Item = &PaymentTerm> {
        self.payment_terms.iter().filter(|t| t.is_active)
    }

    pub fn active_salespeople(&self) -> impl Iterator<Item = &Salesperson> {
        self.salespeople.iter().filter(|s| s.is_active)
    }

    // ── Search: case-insensitive substring, as the list pages filter ─────────

    /// Customers whose business name contains `term`, or whose tax id does.
    pub fn search_customers<'a>(&'a self, term: &str) -> impl Iterator<Item = &'a Customer> + 'a {
        let term = term.trim().to_string();
        let lower = term.to_lowercase();
        self.customers.iter().filter(move |c| {
            c.business_name.to_lowercase().contains(&lower) || c.tax_id.contains(&term)
        })
    }

    pub fn search_products<'a>(&'a self, term: &str) -> impl Iterator<Item = &'a Product> + 'a {
        let term = term.trim().to_lowercase();
        self.products
            .iter()
            .filter(move |p| p.description.to_lowercase().contains(&term))
    }

    pub fn search_payment_terms<'a>(&'a self, term: &str) -> impl Iterator<Item = &'a PaymentTerm> + 'a {
        let term = term.trim().to_lowercase();
        self.payment_terms
            .iter()
            .filter(move |t| t.description.to_lowercase().contains(&term))
    }

    pub fn search_salespeople<'a>(&'a self, term: &str) -> impl Iterator<Item = &'a Salesperson> + 'a {
        let term = term.trim().to_lowercase();
        self.salespeople
            .iter()
            .filter(move |s| s.name.to_lowercase().contains(&term))
    }

    // ── Selection: resolve an id into a denormalized reference ───────────────
    //
    // Inactive entries are not offered by the selection lists, so they are
    // rejected here the same way as ids that do not exist.

    pub fn select_customer(&self, id: &str) -> Result<CatalogRef, DomainError> {
        self.customer(id)
            .filter(|c| c.is_active)
            .map(|c| CatalogRef::new(&c.id, &c.business_name))
            .ok_or_else(|| unknown("customer", id))
    }

    pub fn select_payment_term(&self, id: &str) -> Result<CatalogRef, DomainError> {
        self.payment_term(id)
            .filter(|t| t.is_active)
            .map(|t| CatalogRef::new(&t.id, &t.description))
            .ok_or_else(|| unknown("payment term", id))
    }

    pub fn select_salesperson(&self, id: &str) -> Result<CatalogRef, DomainError> {
        self.salesperson(id)
            .filter(|s| s.is_active)
            .map(|s| CatalogRef::new(&s.id, &s.name))
            .ok_or_else(|| unknown("salesperson", id))
    }

    /// Returns the product reference together with its current unit price.
    pub fn select_product(&self, id: &str) -> Result<(CatalogRef, BigDecimal), DomainError> {
        self.product(id)
            .filter(|p| p.is_active)
            .map(|p| (CatalogRef::new(&p.id, &p.description), p.unit_price.clone()))
            .ok_or_else(|| unknown("product", id))
    }
}

fn unknown(kind: &'static str, id: &str) -> DomainError {
    DomainError::UnknownReference {
        kind,
        id: id.to_string(),
    }
}
