use chrono::Utc;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::OrderRepository;
use crate::models::order::{NewOrder, Order};
use crate::schema::orders;

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        let created = diesel::insert_into(orders::table)
            .values(&order)
            .returning(Order::as_returning())
            .get_result(&mut conn)
            .inspect_err(|e| log::warn!("failed to create order: {e}"))?;

        Ok(created)
    }

    fn update(&self, id: i32, order: NewOrder) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(
            orders::table
                .filter(orders::id.eq(id))
                .filter(orders::deleted_at.is_null()),
        )
        .set((&order, orders::updated_at.eq(Utc::now())))
        .returning(Order::as_returning())
        .get_result(&mut conn)
        .inspect_err(|e| log::warn!("failed to update order {id}: {e}"))?;

        Ok(updated)
    }

    fn delete(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let rows = diesel::delete(
            orders::table
                .filter(orders::id.eq(id))
                .filter(orders::deleted_at.is_null()),
        )
        .execute(&mut conn)
        .inspect_err(|e| log::warn!("failed to delete order {id}: {e}"))?;

        if rows == 0 {
            log::debug!("no order {id} to delete");
        }
        Ok(())
    }

    fn get_by_id(&self, id: i32) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .filter(orders::deleted_at.is_null())
            .select(Order::as_select())
            .first(&mut conn)?;

        Ok(order)
    }

    fn get_all(&self) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::deleted_at.is_null())
            .select(Order::as_select())
            .order(orders::id.asc())
            .load(&mut conn)?;

        Ok(rows)
    }

    fn get_by_user_id(&self, user_id: i32) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::user_id.eq(user_id))
            .filter(orders::deleted_at.is_null())
            .select(Order::as_select())
            .order(orders::id.asc())
            .load(&mut conn)?;

        Ok(rows)
    }
}
