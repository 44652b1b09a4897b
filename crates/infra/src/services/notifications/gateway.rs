use super::{EmailMessage, INotificationSender, NotificationError, SmsMessage};
use crate::config::NotificationConfig;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::error;

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    html: String,
}

#[derive(Debug, Serialize)]
struct SendSmsRequest<'a> {
    to: &'a str,
    body: &'a str,
}

/// Delivers notifications through an http email / sms gateway
pub struct HttpNotificationSender {
    client: Client,
    base_url: String,
    api_key: String,
    salon_name: String,
}

impl HttpNotificationSender {
    pub fn new(base_url: &str, config: &NotificationConfig, salon_name: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.gateway_key.clone(),
            salon_name: salon_name.to_string(),
        })
    }

    async fn post(&self, body: &impl Serialize, path: &str) -> Result<(), NotificationError> {
        let res = self
            .client
            .post(&format!("{}/{}", self.base_url, path))
            .header("x-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(
                    "[Network Error] Notification gateway POST {} error. Error message: {:?}",
                    path, e
                );
                if e.is_timeout() {
                    NotificationError::Timeout
                } else {
                    NotificationError::Network(e.to_string())
                }
            })?;

        let status = res.status();
        if status.is_success() {
            return Ok(());
        }
        let body = res.text().await.unwrap_or_default();
        error!(
            "[Unexpected Response] Notification gateway POST {} returned {}: {}",
            path, status, body
        );
        Err(NotificationError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Wraps a plain text reminder in the salon's html email layout
pub fn email_html(salon_name: &str, text: &str) -> String {
    let salon_name = escape_html(salon_name);
    let body = escape_html(text).replace('\n', "<br>");
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <style>
    body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
    .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
    .header {{ background: linear-gradient(135deg, #4CAF50 0%, #45a049 100%); color: white; padding: 20px; text-align: center; }}
    .content {{ padding: 20px; background: #f9f9f9; }}
    .footer {{ text-align: center; padding: 20px; color: #666; font-size: 12px; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header"><h1>{salon}</h1></div>
    <div class="content">{body}</div>
    <div class="footer"><p>Thank you for choosing {salon}</p></div>
  </div>
</body>
</html>"#,
        salon = salon_name,
        body = body
    )
}

#[async_trait::async_trait]
impl INotificationSender for HttpNotificationSender {
    async fn send_email(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        let body = SendEmailRequest {
            to: &message.to,
            subject: &message.subject,
            text: &message.text,
            html: email_html(&self.salon_name, &message.text),
        };
        self.post(&body, "email").await
    }

    async fn send_sms(&self, message: &SmsMessage) -> Result<(), NotificationError> {
        let body = SendSmsRequest {
            to: &message.to,
            body: &message.body,
        };
        self.post(&body, "sms").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_escaped_html() {
        let html = email_html("Durga Salon", "Dear <Asha>,\n\nSee you & bye");
        assert!(html.contains("<h1>Durga Salon</h1>"));
        assert!(html.contains("Dear &lt;Asha&gt;,<br><br>See you &amp; bye"));
        assert!(html.contains("Thank you for choosing Durga Salon"));
    }

    #[tokio::test]
    async fn unreachable_gateway_is_a_delivery_failure() {
        let config = NotificationConfig {
            gateway_url: None,
            gateway_key: "key".into(),
            timeout_secs: 1,
        };
        let sender = HttpNotificationSender::new("http://127.0.0.1:9", &config, "Durga Salon")
            .expect("To build client");
        let res = sender
            .send_sms(&SmsMessage {
                to: "9876543210".into(),
                body: "Hello".into(),
            })
            .await;
        assert!(res.is_err());
    }
}
