pub mod sms;

use std::sync::Arc;

use crate::models::order::Order;

pub use sms::{SmsClient, SmsError};

pub const ORDER_CREATED_MESSAGE: &str = "Order created successfully";

/// Sends the order-created SMS. Dispatch is detached from the request: the
/// outcome only ever reaches the log.
#[derive(Debug, Clone)]
pub struct OrderNotifier {
    sms: Arc<SmsClient>,
    recipient: String,
}

impl OrderNotifier {
    pub fn new(sms: SmsClient, recipient: impl Into<String>) -> Self {
        Self {
            sms: Arc::new(sms),
            recipient: recipient.into(),
        }
    }

    /// Spawns the notification for an already committed order and returns
    /// immediately.
    pub fn order_created(&self, order: &Order) {
        let sms = Arc::clone(&self.sms);
        let recipient = self.recipient.clone();
        let order_id = order.id;

        actix_web::rt::spawn(async move {
            match sms.send(&recipient, ORDER_CREATED_MESSAGE).await {
                Ok(()) => log::info!("sent order notification for order {order_id}"),
                Err(e) => log::warn!("failed to send order notification for order {order_id}: {e}"),
            }
        });
    }
}
