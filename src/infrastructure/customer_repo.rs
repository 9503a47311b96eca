use chrono::Utc;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::CustomerRepository;
use crate::models::customer::{Customer, NewCustomer};
use crate::schema::customers;

pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CustomerRepository for DieselCustomerRepository {
    fn create(&self, customer: NewCustomer) -> Result<Customer, DomainError> {
        let mut conn = self.pool.get()?;

        let created = diesel::insert_into(customers::table)
            .values(&customer)
            .returning(Customer::as_returning())
            .get_result(&mut conn)?;

        Ok(created)
    }

    fn update(&self, id: i32, customer: NewCustomer) -> Result<Customer, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(
            customers::table
                .filter(customers::id.eq(id))
                .filter(customers::deleted_at.is_null()),
        )
        .set((&customer, customers::updated_at.eq(Utc::now())))
        .returning(Customer::as_returning())
        .get_result(&mut conn)?;

        Ok(updated)
    }

    fn delete(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let rows = diesel::delete(
            customers::table
                .filter(customers::id.eq(id))
                .filter(customers::deleted_at.is_null()),
        )
        .execute(&mut conn)?;

        if rows == 0 {
            log::debug!("no customer {id} to delete");
        }
        Ok(())
    }

    fn get_by_id(&self, id: i32) -> Result<Customer, DomainError> {
        let mut conn = self.pool.get()?;

        let customer = customers::table
            .filter(customers::id.eq(id))
            .filter(customers::deleted_at.is_null())
            .select(Customer::as_select())
            .first(&mut conn)?;

        Ok(customer)
    }

    fn get_all(&self) -> Result<Vec<Customer>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = customers::table
            .filter(customers::deleted_at.is_null())
            .select(Customer::as_select())
            .order(customers::id.asc())
            .load(&mut conn)?;

        Ok(rows)
    }
}
