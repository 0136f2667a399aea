pub mod customer;
pub mod invoice;
pub mod revenue;
pub mod user;

pub use invoice::InvoiceStatus;
