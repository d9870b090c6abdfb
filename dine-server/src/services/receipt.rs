//! 小票邮件派发
//!
//! 邮件传输本身在网关后面，服务器只负责发一个 HTTP 投递请求。
//! 下单路径上是 fire-and-forget: 订单先提交，邮件失败只记日志。
//! 独立的小票接口 (POST /api/receipts) 走同步路径，把失败回给调用方。

use serde::Serialize;

use shared::models::Order;

use crate::core::Config;
use crate::utils::AppError;

#[derive(Clone, Debug)]
pub struct ReceiptMailer {
    gateway_url: Option<String>,
    from: String,
    client: reqwest::Client,
}

/// Mail gateway request body
#[derive(Debug, Serialize)]
struct MailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: String,
}

impl ReceiptMailer {
    pub fn new(config: &Config) -> Self {
        Self {
            gateway_url: config.mail_gateway_url.clone(),
            from: config.mail_from.clone(),
            client: reqwest::Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.gateway_url.is_some()
    }

    /// Deliver a receipt through the mail gateway (synchronous path,
    /// used by the receipts endpoint).
    pub async fn send(&self, to: &str, order_details: &str) -> Result<(), AppError> {
        let Some(url) = &self.gateway_url else {
            return Err(AppError::internal("mail gateway not configured"));
        };

        let body = MailRequest {
            from: &self.from,
            to,
            subject: "Your Restaurant Order Receipt",
            html: format!(
                "<h1>Thank you for your order!</h1>\
                 <p><strong>Order Details:</strong></p>\
                 <pre>{order_details}</pre>"
            ),
        };

        let resp = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("mail gateway unreachable: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::internal(format!(
                "mail gateway rejected send: {}",
                resp.status()
            )));
        }
        Ok(())
    }

    /// Fire-and-forget receipt for a just-committed order.
    pub fn dispatch(&self, to: &str, order: &Order) {
        if self.gateway_url.is_none() {
            tracing::debug!(order_id = order.id, "receipt dispatch skipped, MAIL_GATEWAY_URL not set");
            return;
        }

        let mailer = self.clone();
        let to = to.to_string();
        let order_id = order.id;
        let details = format!(
            "Order #{} | Table {} | Items: {} | Total: {}",
            order.id, order.table_number, order.items, order.total_price
        );
        tokio::spawn(async move {
            match mailer.send(&to, &details).await {
                Ok(()) => tracing::info!(order_id, "receipt email dispatched"),
                Err(e) => tracing::warn!(order_id, error = %e, "receipt dispatch failed"),
            }
        });
    }
}
