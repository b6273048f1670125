pub mod draft_request;
pub mod invoice_service;
