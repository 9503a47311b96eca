use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::OrderRepository;
use crate::errors::AppError;
use crate::handlers::response::{BaseResponse, Empty};
use crate::handlers::{parse_path_id, run_blocking, storage_failure};
use crate::models::order::{NewOrder, Order};
use crate::notifications::OrderNotifier;

// ── Request DTOs ─────────────────────────────────────────────────────────────

/// Body of both create and update. Update replaces all three fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub product_id: i32,
    pub quantity: i32,
    pub user_id: i32,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(req: CreateOrderRequest) -> Self {
        NewOrder {
            product_id: req.product_id,
            quantity: req.quantity,
            user_id: req.user_id,
        }
    }
}

/// JSON extractor settings for the order routes: any body failure becomes
/// the same 400 envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| {
            log::warn!("invalid order data: {err}");
            AppError::BadRequest("Invalid order data".to_string()).into()
        })
}

/// Path settings for the order routes. The id is extracted before the body,
/// so a bad id wins over a bad body.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        log::warn!("invalid order ID in {}: {err}", req.path());
        AppError::BadRequest("Invalid order ID".to_string()).into()
    })
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/v1/orders
///
/// Persists the order, then hands it to the notifier. The notification runs
/// detached and cannot change this response.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = BaseResponse<Order>),
        (status = 400, description = "Invalid order data", body = BaseResponse<Empty>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Failed to create order", body = BaseResponse<Empty>),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn create_order(
    repo: web::Data<dyn OrderRepository>,
    notifier: web::Data<OrderNotifier>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let new_order = NewOrder::from(body.into_inner());

    let order = run_blocking(move || repo.create(new_order))
        .await
        .map_err(storage_failure("Failed to create order"))?;

    notifier.order_created(&order);

    Ok(BaseResponse::respond(
        StatusCode::CREATED,
        order,
        "Order created successfully",
    ))
}

/// PUT /api/v1/orders/{id}
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}",
    params(("id" = i32, Path, description = "Order ID")),
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order updated successfully", body = BaseResponse<Order>),
        (status = 400, description = "Invalid order ID or data", body = BaseResponse<Empty>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Failed to update order", body = BaseResponse<Empty>),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn update_order(
    repo: web::Data<dyn OrderRepository>,
    path: web::Path<i32>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let changes = NewOrder::from(body.into_inner());

    let order = run_blocking(move || repo.update(id, changes))
        .await
        .map_err(storage_failure("Failed to update order"))?;

    Ok(BaseResponse::respond(
        StatusCode::OK,
        order,
        "Order updated successfully",
    ))
}

/// DELETE /api/v1/orders/{id}
///
/// Answers 204 and still writes the envelope body.
#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 204, description = "Order deleted successfully", body = BaseResponse<Empty>),
        (status = 400, description = "Invalid order ID", body = BaseResponse<Empty>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Failed to delete order", body = BaseResponse<Empty>),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn delete_order(
    repo: web::Data<dyn OrderRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    run_blocking(move || repo.delete(id))
        .await
        .map_err(storage_failure("Failed to delete order"))?;

    Ok(HttpResponse::NoContent().json(BaseResponse::<Empty>::message(
        StatusCode::NO_CONTENT,
        "Order deleted successfully",
    )))
}

/// GET /api/v1/orders/{id}
///
/// A missing order is reported like any other storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order fetched successfully", body = BaseResponse<Order>),
        (status = 400, description = "Invalid order ID", body = BaseResponse<Empty>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Failed to get order", body = BaseResponse<Empty>),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn get_order(
    repo: web::Data<dyn OrderRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let order = run_blocking(move || repo.get_by_id(id))
        .await
        .map_err(storage_failure("Failed to get order"))?;

    Ok(BaseResponse::respond(
        StatusCode::OK,
        order,
        "Order fetched successfully",
    ))
}

/// GET /api/v1/orders
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    responses(
        (status = 200, description = "Orders fetched successfully", body = BaseResponse<Vec<Order>>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Failed to get orders", body = BaseResponse<Empty>),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn list_orders(repo: web::Data<dyn OrderRepository>) -> Result<HttpResponse, AppError> {
    let orders = run_blocking(move || repo.get_all())
        .await
        .map_err(storage_failure("Failed to get orders"))?;

    Ok(BaseResponse::respond(
        StatusCode::OK,
        orders,
        "Orders fetched successfully",
    ))
}

/// GET /api/v1/users/{user_id}/orders
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/orders",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Orders fetched successfully", body = BaseResponse<Vec<Order>>),
        (status = 400, description = "Invalid user ID", body = BaseResponse<Empty>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Failed to get orders", body = BaseResponse<Empty>),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn list_user_orders(
    repo: web::Data<dyn OrderRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = parse_path_id(&path, "user ID")?;

    let orders = run_blocking(move || repo.get_by_user_id(user_id))
        .await
        .map_err(storage_failure("Failed to get orders"))?;

    Ok(BaseResponse::respond(
        StatusCode::OK,
        orders,
        "Orders fetched successfully",
    ))
}
