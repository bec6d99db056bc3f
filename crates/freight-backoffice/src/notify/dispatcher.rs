use super::{EmailMessage, Mailer, NotifyError};
use crate::config::{EmailConfig, EmailProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::info;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";
const SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

/// Provider-backed [`Mailer`] used in production. The configured provider
/// receives every message; `disable_sending` turns dispatch into a logged
/// no-op.
pub struct EmailDispatcher {
    client: Client,
    config: EmailConfig,
}

impl EmailDispatcher {
    pub fn new(config: EmailConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| NotifyError::Transport(err.to_string()))?;
        Ok(Self { client, config })
    }

    async fn send_resend(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        let api_key =
            self.config
                .resend_api_key
                .as_deref()
                .ok_or(NotifyError::NotConfigured {
                    provider: "Resend",
                })?;

        let body = json!({
            "from": self.config.from_address,
            "to": [message.to],
            "subject": message.subject,
            "html": message.html,
            "text": message.text,
        });

        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(NotifyError::Rejected {
                provider: "Resend",
                status: response.status().as_u16(),
            })
        }
    }

    async fn send_sendgrid(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        let api_key =
            self.config
                .sendgrid_api_key
                .as_deref()
                .ok_or(NotifyError::NotConfigured {
                    provider: "SendGrid",
                })?;

        let body = json!({
            "personalizations": [{ "to": [{ "email": message.to }] }],
            "from": { "email": self.config.from_address },
            "subject": message.subject,
            "content": [
                { "type": "text/plain", "value": message.text },
                { "type": "text/html", "value": message.html },
            ],
        });

        let response = self
            .client
            .post(SENDGRID_ENDPOINT)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(NotifyError::Rejected {
                provider: "SendGrid",
                status: response.status().as_u16(),
            })
        }
    }
}

#[async_trait]
impl Mailer for EmailDispatcher {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        if self.config.disable_sending {
            info!(
                to = %message.to,
                subject = %message.subject,
                provider = self.config.provider.label(),
                "email sending disabled, skipping dispatch"
            );
            return Ok(());
        }

        match self.config.provider {
            EmailProvider::Resend => self.send_resend(message).await,
            EmailProvider::SendGrid => self.send_sendgrid(message).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disabled_config() -> EmailConfig {
        EmailConfig {
            provider: EmailProvider::Resend,
            from_address: "BTFS Dispatch <operations@boxtruckfs.com>".to_string(),
            resend_api_key: None,
            sendgrid_api_key: None,
            disable_sending: true,
            disable_endpoint_auth: false,
        }
    }

    #[tokio::test]
    async fn disabled_dispatcher_reports_success_without_sending() {
        let dispatcher = EmailDispatcher::new(disabled_config()).expect("client builds");
        let message = crate::notify::review_invitation("broker@acme.com", "https://x/r", None);
        dispatcher.send(&message).await.expect("no-op succeeds");
    }

    #[tokio::test]
    async fn missing_key_surfaces_not_configured() {
        let mut config = disabled_config();
        config.disable_sending = false;
        let dispatcher = EmailDispatcher::new(config).expect("client builds");
        let message = crate::notify::review_invitation("broker@acme.com", "https://x/r", None);
        match dispatcher.send(&message).await {
            Err(NotifyError::NotConfigured { provider }) => assert_eq!(provider, "Resend"),
            other => panic!("expected missing key error, got {other:?}"),
        }
    }
}
