pub mod invoice_repo;
pub mod seed;
