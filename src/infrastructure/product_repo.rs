use chrono::Utc;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::models::product::{NewProduct, Product};
use crate::schema::products;

/// Diesel-backed product storage. Not wired into the router.
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductRepository for DieselProductRepository {
    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        let created = diesel::insert_into(products::table)
            .values(&product)
            .returning(Product::as_returning())
            .get_result(&mut conn)
            .inspect_err(|e| log::warn!("error creating product: {e}"))?;

        Ok(created)
    }

    fn update(&self, id: i32, product: NewProduct) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(
            products::table
                .filter(products::id.eq(id))
                .filter(products::deleted_at.is_null()),
        )
        .set((&product, products::updated_at.eq(Utc::now())))
        .returning(Product::as_returning())
        .get_result(&mut conn)
        .inspect_err(|e| log::warn!("error updating product {id}: {e}"))?;

        Ok(updated)
    }

    fn delete(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let rows = diesel::delete(
            products::table
                .filter(products::id.eq(id))
                .filter(products::deleted_at.is_null()),
        )
        .execute(&mut conn)?;

        if rows == 0 {
            log::debug!("no product {id} to delete");
        }
        Ok(())
    }

    fn get_by_id(&self, id: i32) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        let product = products::table
            .filter(products::id.eq(id))
            .filter(products::deleted_at.is_null())
            .select(Product::as_select())
            .first(&mut conn)?;

        Ok(product)
    }

    fn get_all(&self) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = products::table
            .filter(products::deleted_at.is_null())
            .select(Product::as_select())
            .order(products::id.asc())
            .load(&mut conn)?;

        Ok(rows)
    }
}
