pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod export;
pub mod format;
pub mod infrastructure;

pub use application::invoice_service::{InvoiceService, SubmitError};
pub use config::Config;
pub use domain::draft::{DraftEngine, HeaderField, LineItemPatch, Violation};
pub use domain::errors::DomainError;
pub use errors::AppError;
pub use infrastructure::invoice_repo::InMemoryInvoiceRepository;
