//! Storage ports. Each method maps to exactly one statement against the
//! store; no business rules live behind these traits.

use super::errors::DomainError;
use crate::models::customer::{Customer, NewCustomer};
use crate::models::order::{NewOrder, Order};
use crate::models::product::{NewProduct, Product};

pub trait CustomerRepository: Send + Sync + 'static {
    fn create(&self, customer: NewCustomer) -> Result<Customer, DomainError>;
    fn update(&self, id: i32, customer: NewCustomer) -> Result<Customer, DomainError>;
    fn delete(&self, id: i32) -> Result<(), DomainError>;
    fn get_by_id(&self, id: i32) -> Result<Customer, DomainError>;
    fn get_all(&self) -> Result<Vec<Customer>, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError>;
    /// Replaces product, quantity and user of the order with `id`.
    fn update(&self, id: i32, order: NewOrder) -> Result<Order, DomainError>;
    /// Succeeds whether or not a row with `id` existed.
    fn delete(&self, id: i32) -> Result<(), DomainError>;
    fn get_by_id(&self, id: i32) -> Result<Order, DomainError>;
    fn get_all(&self) -> Result<Vec<Order>, DomainError>;
    fn get_by_user_id(&self, user_id: i32) -> Result<Vec<Order>, DomainError>;
}

/// Product storage. Internal only: no HTTP route reaches it.
pub trait ProductRepository: Send + Sync + 'static {
    fn create(&self, product: NewProduct) -> Result<Product, DomainError>;
    fn update(&self, id: i32, product: NewProduct) -> Result<Product, DomainError>;
    fn delete(&self, id: i32) -> Result<(), DomainError>;
    fn get_by_id(&self, id: i32) -> Result<Product, DomainError>;
    fn get_all(&self) -> Result<Vec<Product>, DomainError>;
}
