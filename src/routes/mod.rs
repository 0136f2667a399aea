// Route modules, one per dashboard area
pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod invoices;
