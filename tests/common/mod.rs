//! Shared fixtures: in-memory repositories and mocked outbound services.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::cookie::Key;
use bigdecimal::BigDecimal;
use chrono::Utc;
use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::json;
use storefront_service::auth::GithubProvider;
use storefront_service::config::{OAuthConfig, SmsConfig};
use storefront_service::domain::errors::DomainError;
use storefront_service::domain::ports::{CustomerRepository, OrderRepository};
use storefront_service::models::customer::{Customer, NewCustomer};
use storefront_service::models::order::{NewOrder, Order};
use storefront_service::notifications::{OrderNotifier, SmsClient};
use storefront_service::AppServices;

pub const VALID_TOKEN: &str = "valid-token";
pub const BEARER: (&str, &str) = ("Authorization", "Bearer valid-token");

// ── In-memory repositories ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryOrders {
    rows: Mutex<Vec<Order>>,
    next_id: Mutex<i32>,
}

impl MemoryOrders {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

impl OrderRepository for MemoryOrders {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let now = Utc::now();
        let created = Order {
            id: *next_id,
            product_id: order.product_id,
            quantity: order.quantity,
            user_id: order.user_id,
            total: BigDecimal::from(0),
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(created.clone());
        Ok(created)
    }

    fn update(&self, id: i32, order: NewOrder) -> Result<Order, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.iter_mut().find(|o| o.id == id).ok_or(DomainError::NotFound)?;
        row.product_id = order.product_id;
        row.quantity = order.quantity;
        row.user_id = order.user_id;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.rows.lock().unwrap().retain(|o| o.id != id);
        Ok(())
    }

    fn get_by_id(&self, id: i32) -> Result<Order, DomainError> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    fn get_all(&self) -> Result<Vec<Order>, DomainError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    fn get_by_user_id(&self, user_id: i32) -> Result<Vec<Order>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryCustomers {
    rows: Mutex<Vec<Customer>>,
}

impl CustomerRepository for MemoryCustomers {
    fn create(&self, customer: NewCustomer) -> Result<Customer, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        let created = Customer {
            id: rows.len() as i32 + 1,
            name: customer.name,
            code: customer.code,
            created_at: now,
            updated_at: now,
        };
        rows.push(created.clone());
        Ok(created)
    }

    fn update(&self, id: i32, customer: NewCustomer) -> Result<Customer, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.iter_mut().find(|c| c.id == id).ok_or(DomainError::NotFound)?;
        row.name = customer.name;
        row.code = customer.code;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.rows.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }

    fn get_by_id(&self, id: i32) -> Result<Customer, DomainError> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    fn get_all(&self) -> Result<Vec<Customer>, DomainError> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

/// Every call fails the way a lost database connection would.
pub struct BrokenStore;

fn connection_lost<T>() -> Result<T, DomainError> {
    Err(DomainError::Internal("connection refused".to_string()))
}

impl OrderRepository for BrokenStore {
    fn create(&self, _: NewOrder) -> Result<Order, DomainError> {
        connection_lost()
    }
    fn update(&self, _: i32, _: NewOrder) -> Result<Order, DomainError> {
        connection_lost()
    }
    fn delete(&self, _: i32) -> Result<(), DomainError> {
        connection_lost()
    }
    fn get_by_id(&self, _: i32) -> Result<Order, DomainError> {
        connection_lost()
    }
    fn get_all(&self) -> Result<Vec<Order>, DomainError> {
        connection_lost()
    }
    fn get_by_user_id(&self, _: i32) -> Result<Vec<Order>, DomainError> {
        connection_lost()
    }
}

impl CustomerRepository for BrokenStore {
    fn create(&self, _: NewCustomer) -> Result<Customer, DomainError> {
        connection_lost()
    }
    fn update(&self, _: i32, _: NewCustomer) -> Result<Customer, DomainError> {
        connection_lost()
    }
    fn delete(&self, _: i32) -> Result<(), DomainError> {
        connection_lost()
    }
    fn get_by_id(&self, _: i32) -> Result<Customer, DomainError> {
        connection_lost()
    }
    fn get_all(&self) -> Result<Vec<Customer>, DomainError> {
        connection_lost()
    }
}

// ── Outbound mocks ───────────────────────────────────────────────────────────

/// Mocked identity provider and SMS gateway plus services wired to them.
pub struct Harness {
    pub provider: MockServer,
    pub sms: MockServer,
    pub services: AppServices,
}

impl Harness {
    pub async fn new(
        orders: Arc<dyn OrderRepository>,
        customers: Arc<dyn CustomerRepository>,
    ) -> Self {
        let provider = MockServer::start_async().await;
        let sms = MockServer::start_async().await;

        provider
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/user")
                    .header("authorization", format!("Bearer {VALID_TOKEN}"));
                then.status(200)
                    .json_body(json!({"id": 1, "login": "octocat", "name": "The Octocat"}));
            })
            .await;

        let http = reqwest::Client::new();
        let sms_config = SmsConfig {
            api_key: "test-api-key".to_string(),
            username: "sandbox".to_string(),
            api_url: sms.url("/version1/messaging"),
            recipient: "+254700000000".to_string(),
        };
        let oauth_config = OAuthConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            callback_url: "http://localhost:8080/api/v1/auth/callback".to_string(),
            authorize_url: provider.url("/login/oauth/authorize"),
            token_url: provider.url("/login/oauth/access_token"),
            api_url: provider.base_url(),
        };

        let services = AppServices {
            customers,
            orders,
            notifier: OrderNotifier::new(SmsClient::new(http.clone(), &sms_config), sms_config.recipient.clone()),
            identity: Arc::new(GithubProvider::new(http, oauth_config)),
            session_key: Key::generate(),
        };

        Self { provider, sms, services }
    }

    pub async fn with_memory_stores() -> (Self, Arc<MemoryOrders>, Arc<MemoryCustomers>) {
        let orders = Arc::new(MemoryOrders::default());
        let customers = Arc::new(MemoryCustomers::default());
        let harness = Self::new(orders.clone(), customers.clone()).await;
        (harness, orders, customers)
    }

    pub async fn sms_gateway(&self, status: u16) -> Mock<'_> {
        self.sms
            .mock_async(|when, then| {
                when.method(POST).path("/version1/messaging");
                then.status(status).body("{}");
            })
            .await
    }
}

/// Waits until the mock has been hit `expected` times, up to two seconds.
pub async fn wait_for_hits(mock: &Mock<'_>, expected: usize) -> usize {
    for _ in 0..100 {
        let hits = mock.hits_async().await;
        if hits >= expected {
            return hits;
        }
        actix_web::rt::time::sleep(Duration::from_millis(20)).await;
    }
    mock.hits_async().await
}
