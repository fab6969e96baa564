//! Domain error taxonomy

mod domain_error;

pub use domain_error::DomainError;
