pub mod customer_repo;
pub mod order_repo;
pub mod product_repo;

#[cfg(test)]
mod test_support;

pub use customer_repo::DieselCustomerRepository;
pub use order_repo::DieselOrderRepository;
pub use product_repo::DieselProductRepository;

use crate::domain::errors::DomainError;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => DomainError::NotFound,
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}
