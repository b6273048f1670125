//! Demo data the console ships with.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::domain::catalog::{Catalog, Customer, PaymentTerm, Product, Salesperson};
use crate::domain::draft::{DraftEngine, HeaderField};
use crate::domain::errors::DomainError;
use crate::domain::invoice::{Invoice, InvoiceStatus};
use crate::domain::ports::InvoiceRepository;

/// Panics on a malformed literal.
fn dec(raw: &str) -> BigDecimal {
    BigDecimal::from_str(raw).expect("seed amounts are decimal literals")
}

fn customer(n: u32, business: &str, legal: &str, tax_id: &str, active: bool) -> Customer {
    Customer {
        id: format!("cust-{n}"),
        business_name: business.to_string(),
        legal_name: legal.to_string(),
        tax_id: tax_id.to_string(),
        account_number: (1000 + n).to_string(),
        is_active: active,
    }
}

fn product(n: u32, description: &str, cost: &str, price: &str, active: bool) -> Product {
    Product {
        id: format!("prod-{n}"),
        description: description.to_string(),
        unit_cost: dec(cost),
        unit_price: dec(price),
        is_active: active,
    }
}

fn payment_term(n: u32, description: &str, days: u32, active: bool) -> PaymentTerm {
    PaymentTerm {
        id: format!("term-{n}"),
        description: description.to_string(),
        days,
        is_active: active,
    }
}

fn salesperson(n: u32, name: &str, commission: &str, active: bool) -> Salesperson {
    Salesperson {
        id: format!("sp-{n}"),
        name: name.to_string(),
        commission_percentage: dec(commission),
        is_active: active,
    }
}

pub fn catalog() -> Catalog {
    Catalog {
        customers: vec![
            customer(1, "Acme Corp", "Acme Corporation", "12-3456789", true),
            customer(2, "Globex Inc", "Globex Incorporated", "98-7654321", true),
            customer(3, "Stark Industries", "Stark Industries LLC", "45-6789123", true),
            customer(4, "Wayne Enterprises", "Wayne Enterprises Inc", "78-9123456", true),
            customer(5, "Umbrella Corp", "Umbrella Corporation", "32-1654987", false),
            customer(6, "Oscorp", "Oscorp Industries", "65-4321987", true),
            customer(7, "LexCorp", "LexCorp International", "89-7456321", true),
            customer(8, "Cyberdyne Systems", "Cyberdyne Systems Corp", "23-7891456", false),
        ],
        products: vec![
            product(1, "Laptop Computer", "500", "899.99", true),
            product(2, "Office Chair", "75", "149.99", true),
            product(3, "Desktop Monitor", "120", "249.99", true),
            product(4, "Wireless Keyboard", "25", "59.99", true),
            product(5, "Wireless Mouse", "15", "39.99", true),
            product(6, "USB-C Dock", "45", "89.99", false),
            product(7, "Webcam HD", "35", "79.99", true),
            product(8, "Noise Cancelling Headphones", "120", "199.99", true),
        ],
        payment_terms: vec![
            payment_term(1, "Net 15", 15, true),
            payment_term(2, "Net 30", 30, true),
            payment_term(3, "Net 45", 45, true),
            payment_term(4, "Net 60", 60, true),
            payment_term(5, "Due on Receipt", 0, true),
            payment_term(6, "Net 90", 90, false),
            payment_term(7, "Net 7", 7, true),
            payment_term(8, "Net 120", 120, false),
        ],
        salespeople: vec![
            salesperson(1, "John Doe", "5.0", true),
            salesperson(2, "Jane Smith", "4.5", true),
            salesperson(3, "Robert Johnson", "6.0", true),
            salesperson(4, "Emily Davis", "4.0", true),
            salesperson(5, "Michael Wilson", "5.5", false),
            salesperson(6, "Sarah Brown", "4.8", true),
            salesperson(7, "David Miller", "5.2", true),
            salesperson(8, "Lisa Garcia", "4.2", false),
        ],
    }
}

struct SeedInvoice {
    number: &'static str,
    date: (i32, u32, u32),
    customer: &'static str,
    payment_term: &'static str,
    salesperson: &'static str,
    comments: &'static str,
    lines: &'static [(&'static str, i32)],
    status: InvoiceStatus,
}

const SEED_INVOICES: &[SeedInvoice] = &[
    SeedInvoice {
        number: "INV-2023001",
        date: (2023, 9, 15),
        customer: "cust-1",
        payment_term: "term-2",
        salesperson: "sp-1",
        comments: "Quarterly office supplies order",
        lines: &[("prod-1", 2), ("prod-2", 5)],
        status: InvoiceStatus::Paid,
    },
    SeedInvoice {
        number: "INV-2023002",
        date: (2023, 9, 14),
        customer: "cust-2",
        payment_term: "term-1",
        salesperson: "sp-2",
        comments: "IT equipment upgrade",
        lines: &[("prod-3", 3)],
        status: InvoiceStatus::Issued,
    },
    SeedInvoice {
        number: "INV-2023003",
        date: (2023, 9, 12),
        customer: "cust-3",
        payment_term: "term-2",
        salesperson: "sp-3",
        comments: "Research department equipment",
        lines: &[("prod-8", 10), ("prod-7", 8)],
        status: InvoiceStatus::Paid,
    },
];

/// Builds the sample invoices through a draft engine and stores them,
/// moving each one along its lifecycle to its listed status.
pub fn seed_invoices<R: InvoiceRepository>(
    repo: &mut R,
    catalog: &Catalog,
) -> Result<Vec<Invoice>, DomainError> {
    let mut engine = DraftEngine::new();
    let mut stored = Vec::with_capacity(SEED_INVOICES.len());

    for seed in SEED_INVOICES {
        let (y, m, d) = seed.date;
        let date = NaiveDate::from_ymd_opt(y, m, d)
            .ok_or_else(|| DomainError::InvalidInput(format!("bad seed date for {}", seed.number)))?;

        engine.init_draft();
        engine.set_header_field(HeaderField::Number(seed.number.to_string()))?;
        engine.set_header_field(HeaderField::Date(date))?;
        engine.set_header_field(HeaderField::Customer(catalog.select_customer(seed.customer)?))?;
        engine.set_header_field(HeaderField::PaymentTerm(
            catalog.select_payment_term(seed.payment_term)?,
        ))?;
        engine.set_header_field(HeaderField::Salesperson(
            catalog.select_salesperson(seed.salesperson)?,
        ))?;
        engine.set_header_field(HeaderField::Comments(seed.comments.to_string()))?;
        for (product_id, quantity) in seed.lines {
            let (product, price) = catalog.select_product(product_id)?;
            engine.add_line_item(product.id, product.display_name, *quantity, price)?;
        }

        let invoice = repo.create(engine.finalize_and_clear()?)?;
        stored.push(advance_to(repo, invoice, seed.status)?);
    }

    Ok(stored)
}

/// Statuses a freshly stored draft passes through to reach `target`.
fn lifecycle_path(target: InvoiceStatus) -> &'static [InvoiceStatus] {
    match target {
        InvoiceStatus::Draft => &[],
        InvoiceStatus::Issued => &[InvoiceStatus::Issued],
        InvoiceStatus::Paid => &[InvoiceStatus::Issued, InvoiceStatus::Paid],
        InvoiceStatus::Cancelled => &[InvoiceStatus::Cancelled],
    }
}

fn advance_to<R: InvoiceRepository>(
    repo: &mut R,
    mut invoice: Invoice,
    target: InvoiceStatus,
) -> Result<Invoice, DomainError> {
    for step in lifecycle_path(target) {
        invoice = repo.update_status(invoice.id, *step)?;
    }
    Ok(invoice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::invoice_repo::InMemoryInvoiceRepository;

    #[test]
    fn catalog_has_console_data() {
        let catalog = catalog();
        assert_eq!(catalog.customers.len(), 8);
        assert_eq!(catalog.active_products().count(), 7);
        assert_eq!(
            catalog.product("prod-1").unwrap().unit_price,
            dec("899.99")
        );
        assert_eq!(catalog.payment_term("term-5").unwrap().days, 0);
    }

    #[test]
    fn seeded_invoices_match_their_listed_totals() {
        let catalog = catalog();
        let mut repo = InMemoryInvoiceRepository::default();
        let invoices = seed_invoices(&mut repo, &catalog).unwrap();

        assert_eq!(invoices.len(), 3);
        assert_eq!(invoices[0].subtotal, dec("2549.93"));
        assert_eq!(invoices[0].status, InvoiceStatus::Paid);
        assert_eq!(invoices[1].subtotal, dec("749.97"));
        assert_eq!(invoices[1].status, InvoiceStatus::Issued);
        assert_eq!(invoices[2].subtotal, dec("2639.82"));
        assert_eq!(
            invoices[2].header.salesperson.as_ref().unwrap().display_name,
            "Robert Johnson"
        );
        assert_eq!(repo.len(), 3);
    }

    #[test]
    fn every_status_is_reached_by_its_own_path() {
        let mut repo = InMemoryInvoiceRepository::default();

        for target in [
            InvoiceStatus::Draft,
            InvoiceStatus::Issued,
            InvoiceStatus::Paid,
            InvoiceStatus::Cancelled,
        ] {
            let mut engine = DraftEngine::new();
            engine.init_draft();
            engine
                .set_header_field(HeaderField::Number(format!("INV-{target}")))
                .unwrap();
            engine.add_line_item("prod-1", "Laptop Computer", 1, dec("899.99")).unwrap();
            let stored = repo.create(engine.finalize_and_clear().unwrap()).unwrap();

            let reached = advance_to(&mut repo, stored, target).unwrap();
            assert_eq!(reached.status, target);
            assert_eq!(
                repo.find_by_id(reached.id).unwrap().unwrap().status,
                target
            );
        }
    }

    #[test]
    fn seeded_catalog_entries_are_valid() {
        let catalog = catalog();
        for c in &catalog.customers {
            assert!(c.validate().is_empty(), "{}: {:?}", c.id, c.validate());
        }
        for p in &catalog.products {
            assert!(p.validate().is_empty(), "{}: {:?}", p.id, p.validate());
        }
    }
}
