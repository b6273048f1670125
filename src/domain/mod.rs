pub mod catalog;
pub mod draft;
pub mod errors;
pub mod invoice;
pub mod ports;
