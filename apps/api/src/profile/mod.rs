// Profile API: account snapshot, phone verification and SMS preferences.

pub mod handlers;
pub mod service;
pub mod validation;

pub use service::ProfileService;
