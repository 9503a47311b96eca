use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::schema::orders;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable, ToSchema)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Order {
    pub id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub user_id: i32,
    /// Caller-supplied or store default; never derived from quantity.
    #[schema(value_type = String, example = "0")]
    pub total: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable order fields. Used both for inserts and for the full-field
/// replace performed by an update.
#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset)]
#[diesel(table_name = orders)]
pub struct NewOrder {
    pub product_id: i32,
    pub quantity: i32,
    pub user_id: i32,
}
