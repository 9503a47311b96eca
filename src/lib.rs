pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod middleware;
pub mod models;
pub mod notifications;
pub mod schema;

use std::sync::Arc;

use actix_web::cookie::Key;
use actix_web::{middleware::Logger, web, App, HttpServer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

pub use db::{create_pool, run_migrations, DbPool};

use crate::auth::session::SessionKeyError;
use crate::auth::GithubProvider;
use crate::config::Config;
use crate::domain::ports::{CustomerRepository, OrderRepository};
use crate::handlers::{auth as auth_handlers, customers, orders};
use crate::infrastructure::{DieselCustomerRepository, DieselOrderRepository};
use crate::middleware::BearerAuth;
use crate::notifications::{OrderNotifier, SmsClient};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        description = "Customers and orders behind GitHub sign-in."
    ),
    paths(
        customers::list_customers,
        customers::create_customer,
        customers::update_customer,
        orders::create_order,
        orders::update_order,
        orders::delete_order,
        orders::get_order,
        orders::list_orders,
        orders::list_user_orders,
        auth_handlers::home,
        auth_handlers::sign_in,
        auth_handlers::callback,
    ),
    components(schemas(
        models::customer::Customer,
        models::customer::NewCustomer,
        models::order::Order,
        orders::CreateOrderRequest,
        auth_handlers::Identity,
        auth::ProviderUser,
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = "customers", description = "Customer management"),
        (name = "orders", description = "Order management"),
        (name = "auth", description = "GitHub sign-in"),
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// Everything the routes depend on, built once and cloned into each worker.
#[derive(Clone)]
pub struct AppServices {
    pub customers: Arc<dyn CustomerRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub notifier: OrderNotifier,
    pub identity: Arc<GithubProvider>,
    pub session_key: Key,
}

impl AppServices {
    /// Wires the Diesel repositories and outbound clients from `config`.
    pub fn from_config(config: &Config, pool: DbPool) -> Result<Self, SessionKeyError> {
        let http = reqwest::Client::new();

        Ok(Self {
            customers: Arc::new(DieselCustomerRepository::new(pool.clone())),
            orders: Arc::new(DieselOrderRepository::new(pool)),
            notifier: OrderNotifier::new(
                SmsClient::new(http.clone(), &config.sms),
                config.sms.recipient.clone(),
            ),
            identity: Arc::new(GithubProvider::new(http, config.oauth.clone())),
            session_key: auth::session_key(config.session_secret.as_deref())?,
        })
    }

    /// Registers shared state and the `/api/v1` routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::from(Arc::clone(&self.customers)))
            .app_data(web::Data::from(Arc::clone(&self.orders)))
            .app_data(web::Data::new(self.notifier.clone()))
            .app_data(web::Data::from(Arc::clone(&self.identity)))
            .app_data(web::Data::new(self.session_key.clone()))
            .service(
                web::scope("/api/v1")
                    .service(
                        web::scope("/customers")
                            .wrap(BearerAuth::new(Arc::clone(&self.identity)))
                            .app_data(customers::json_config())
                            .route("", web::get().to(customers::list_customers))
                            .route("", web::post().to(customers::create_customer))
                            .route("/{id}", web::put().to(customers::update_customer)),
                    )
                    .service(
                        web::scope("/orders")
                            .wrap(BearerAuth::new(Arc::clone(&self.identity)))
                            .app_data(orders::path_config())
                            .app_data(orders::json_config())
                            .route("", web::post().to(orders::create_order))
                            .route("", web::get().to(orders::list_orders))
                            .route("/{id}", web::put().to(orders::update_order))
                            .route("/{id}", web::delete().to(orders::delete_order))
                            .route("/{id}", web::get().to(orders::get_order)),
                    )
                    .service(
                        web::scope("/users")
                            .wrap(BearerAuth::new(Arc::clone(&self.identity)))
                            .route("/{user_id}/orders", web::get().to(orders::list_user_orders)),
                    )
                    .service(
                        web::scope("/auth")
                            .route("/", web::get().to(auth_handlers::home))
                            .route("/login", web::get().to(auth_handlers::sign_in))
                            .route("/callback", web::get().to(auth_handlers::callback)),
                    ),
            );
    }
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    services: AppServices,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .wrap(Logger::default())
            .configure(move |cfg| services.configure(cfg))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
