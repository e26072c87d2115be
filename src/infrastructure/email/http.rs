//! HTTP-API mailer
//!
//! Posts rendered messages to a transactional email HTTP API (any provider
//! with a JSON send endpoint and bearer-token auth).

use async_trait::async_trait;

use super::mailer::{EmailMessage, Mailer};

/// Mailer delivering through an HTTP email API
#[derive(Clone)]
pub struct HttpApiMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl std::fmt::Debug for HttpApiMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpApiMailer")
            .field("api_url", &self.api_url)
            .field("api_key", &"[hidden]")
            .field("from", &self.from)
            .finish()
    }
}

impl HttpApiMailer {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
            from: from.into(),
        }
    }
}

#[async_trait]
impl Mailer for HttpApiMailer {
    async fn send(&self, message: &EmailMessage) -> bool {
        let body = serde_json::json!({
            "from": self.from,
            "to": message.to,
            "subject": message.subject,
            "html": message.html,
        });

        let result = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(
                    to = %message.to,
                    status = %response.status(),
                    "Email API rejected the send"
                );
                false
            }
            Err(e) => {
                tracing::warn!(to = %message.to, error = %e, "Email send failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_api_key() {
        let mailer = HttpApiMailer::new("https://api.mail/send", "secret-key", "no-reply@hack.io");
        let debug = format!("{:?}", mailer);

        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("no-reply@hack.io"));
    }
}
