use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::SmsConfig;
use crate::sms::mask_phone;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("SMS gateway is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gateway error (status {status}): {message}")]
    Gateway { status: u16, message: String },
}

/// Outbound SMS delivery. Carried as `Arc<dyn SmsSender>`.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), SmsError>;
}

#[derive(Debug, Serialize)]
struct OutboundMessage<'a> {
    from: &'a str,
    to: &'a str,
    body: &'a str,
}

/// Hands messages to an HTTP SMS gateway: `POST {gateway_url}` with a bearer key.
#[derive(Clone)]
pub struct HttpSmsSender {
    http: Client,
    config: SmsConfig,
}

impl HttpSmsSender {
    pub fn new(config: SmsConfig) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { http, config }
    }
}

pub fn verification_message(code: &str, expires_in_minutes: u64) -> String {
    format!("Your verification code is {code}. It expires in {expires_in_minutes} minutes.")
}

#[async_trait]
impl SmsSender for HttpSmsSender {
    async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), SmsError> {
        let (Some(url), Some(api_key), Some(from)) = (
            self.config.gateway_url.as_deref(),
            self.config.api_key.as_deref(),
            self.config.from_number.as_deref(),
        ) else {
            return Err(SmsError::NotConfigured);
        };

        let body = verification_message(code, self.config.expires_in_minutes());
        let response = self
            .http
            .post(url)
            .bearer_auth(api_key)
            .json(&OutboundMessage {
                from,
                to,
                body: &body,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("SMS gateway rejected message to {}: {status}", mask_phone(to));
            return Err(SmsError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Verification code delivered to gateway for {}", mask_phone(to));
        Ok(())
    }
}
