use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};

use crate::domain::errors::DomainError;
use crate::domain::ports::CustomerRepository;
use crate::errors::AppError;
use crate::handlers::response::{BaseResponse, Empty};
use crate::handlers::run_blocking;
use crate::models::customer::{Customer, NewCustomer};

/// Body failures on customer routes echo the parser's complaint.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| {
            let message = format!("Failed to bind JSON: {err}");
            log::warn!("{message}");
            AppError::BadRequest(message).into()
        })
}

fn customer_failure(action: &'static str) -> impl FnOnce(DomainError) -> AppError {
    move |e| {
        log::error!("Failed to {action}: {e}");
        AppError::Internal(format!("Failed to {action}: {e}"))
    }
}

/// POST /api/v1/customers
#[utoipa::path(
    post,
    path = "/api/v1/customers",
    request_body = NewCustomer,
    responses(
        (status = 201, description = "Customer created", body = BaseResponse<Customer>),
        (status = 400, description = "Malformed body", body = BaseResponse<Empty>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Storage failure", body = BaseResponse<Empty>),
    ),
    security(("bearer_auth" = [])),
    tag = "customers"
)]
pub async fn create_customer(
    repo: web::Data<dyn CustomerRepository>,
    body: web::Json<NewCustomer>,
) -> Result<HttpResponse, AppError> {
    let new_customer = body.into_inner();

    let customer = run_blocking(move || repo.create(new_customer))
        .await
        .map_err(customer_failure("create customer"))?;

    log::info!("Created customer with ID: {}", customer.id);
    let message = format!("Successfully created customer with ID: {}", customer.id);
    Ok(BaseResponse::respond(StatusCode::CREATED, customer, message))
}

/// PUT /api/v1/customers/{id}
#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    params(("id" = i32, Path, description = "Customer ID")),
    request_body = NewCustomer,
    responses(
        (status = 200, description = "Customer updated", body = BaseResponse<Customer>),
        (status = 400, description = "Malformed ID or body", body = BaseResponse<Empty>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Storage failure", body = BaseResponse<Empty>),
    ),
    security(("bearer_auth" = [])),
    tag = "customers"
)]
pub async fn update_customer(
    repo: web::Data<dyn CustomerRepository>,
    path: web::Path<String>,
    body: web::Json<NewCustomer>,
) -> Result<HttpResponse, AppError> {
    let raw = path.into_inner();
    let id: i32 = raw.parse().map_err(|_| {
        log::warn!("Invalid customer ID: {raw}");
        AppError::BadRequest(format!("Invalid customer ID: {raw}"))
    })?;
    let changes = body.into_inner();

    let customer = run_blocking(move || repo.update(id, changes))
        .await
        .map_err(customer_failure("update customer"))?;

    log::info!("Updated customer with ID: {}", customer.id);
    let message = format!("Successfully updated customer with ID: {}", customer.id);
    Ok(BaseResponse::respond(StatusCode::OK, customer, message))
}

/// GET /api/v1/customers
#[utoipa::path(
    get,
    path = "/api/v1/customers",
    responses(
        (status = 200, description = "Customers retrieved successfully", body = BaseResponse<Vec<Customer>>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Storage failure", body = BaseResponse<Empty>),
    ),
    security(("bearer_auth" = [])),
    tag = "customers"
)]
pub async fn list_customers(
    repo: web::Data<dyn CustomerRepository>,
) -> Result<HttpResponse, AppError> {
    let customers = run_blocking(move || repo.get_all())
        .await
        .map_err(customer_failure("get all customers"))?;

    Ok(BaseResponse::respond(
        StatusCode::OK,
        customers,
        "Customers retrieved successfully",
    ))
}
