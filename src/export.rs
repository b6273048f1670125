//! JSON report of the catalog and invoices, as offered by the console's
//! "export report" button.

use std::io::Write;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::catalog::{Catalog, Customer, PaymentTerm, Product, Salesperson};
use crate::domain::invoice::Invoice;

pub const GENERATED_BY: &str = "Invoice Management System";
pub const REPORT_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalRecords {
    pub products: usize,
    pub customers: usize,
    pub payment_terms: usize,
    pub salespeople: usize,
    pub invoices: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub generated_by: &'static str,
    pub version: &'static str,
    pub total_records: TotalRecords,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData<'a> {
    pub products: &'a [Product],
    pub customers: &'a [Customer],
    pub payment_terms: &'a [PaymentTerm],
    pub salespeople: &'a [Salesperson],
    pub invoices: &'a [Invoice],
}

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub metadata: ReportMetadata,
    pub data: ReportData<'a>,
}

impl<'a> Report<'a> {
    pub fn new(catalog: &'a Catalog, invoices: &'a [Invoice], generated_at: DateTime<Utc>) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at,
                generated_by: GENERATED_BY,
                version: REPORT_VERSION,
                total_records: TotalRecords {
                    products: catalog.products.len(),
                    customers: catalog.customers.len(),
                    payment_terms: catalog.payment_terms.len(),
                    salespeople: catalog.salespeople.len(),
                    invoices: invoices.len(),
                },
            },
            data: ReportData {
                products: &catalog.products,
                customers: &catalog.customers,
                payment_terms: &catalog.payment_terms,
                salespeople: &catalog.salespeople,
                invoices,
            },
        }
    }

    /// Writes the report as pretty-printed JSON.
    pub fn write_to<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }
}

/// `invoice-report-2023-09-15.json`
pub fn default_file_name(date: NaiveDate) -> String {
    format!("invoice-report-{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::Value;

    use super::*;
    use crate::infrastructure::invoice_repo::InMemoryInvoiceRepository;
    use crate::infrastructure::seed;

    #[test]
    fn report_counts_and_shapes() {
        let catalog = seed::catalog();
        let mut repo = InMemoryInvoiceRepository::default();
        seed::seed_invoices(&mut repo, &catalog).unwrap();
        let at = Utc.with_ymd_and_hms(2023, 9, 20, 8, 30, 0).unwrap();

        let mut buf = Vec::new();
        Report::new(&catalog, repo.all(), at).write_to(&mut buf).unwrap();
        let json: Value = serde_json::from_slice(&buf).unwrap();

        let meta = &json["metadata"];
        assert_eq!(meta["generatedBy"], "Invoice Management System");
        assert_eq!(meta["version"], "1.0.0");
        assert_eq!(meta["totalRecords"]["paymentTerms"], 8);
        assert_eq!(meta["totalRecords"]["invoices"], 3);
        assert!(meta["generatedAt"].as_str().unwrap().starts_with("2023-09-20T08:30:00"));

        let invoice = &json["data"]["invoices"][0];
        assert_eq!(invoice["number"], "INV-2023001");
        assert_eq!(invoice["date"], "2023-09-15");
        assert_eq!(invoice["status"], "paid");
        assert_eq!(invoice["customer"]["displayName"], "Acme Corp");
        assert_eq!(invoice["items"][0]["productRef"], "prod-1");
        assert!(invoice["items"][1]["lineSubtotal"].is_string());

        assert_eq!(json["data"]["customers"][4]["isActive"], false);
    }

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2023, 9, 5).unwrap();
        assert_eq!(default_file_name(date), "invoice-report-2023-09-05.json");
    }
}
