//! # Email dispatch
//!
//! Outbound email goes through the EmailJS REST API. Two accounts are
//! configured separately: the primary one sends advisory emails, the
//! contact account sends contact form messages. An account without
//! credentials turns its templates into logged no-ops.

use std::collections::BTreeMap;

use async_trait::async_trait;
use eyre::{eyre, Result, WrapErr};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{EmailAccountConfig, EmailConfig};

pub const EMAILJS_SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailTemplate {
    AdvisoryRequested,
    AdvisoryResponse,
    Contact,
}

/// One message ready to be rendered by an EmailJS template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub template: EmailTemplate,
    pub variables: BTreeMap<String, String>,
}

impl OutboundEmail {
    pub fn new(template: EmailTemplate) -> Self {
        Self {
            template,
            variables: BTreeMap::new(),
        }
    }

    pub fn var(mut self, name: &str, value: impl Into<String>) -> Self {
        self.variables.insert(name.to_string(), value.into());
        self
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Whether `template` can be delivered with the current configuration.
    fn is_enabled(&self, template: EmailTemplate) -> bool;

    async fn send(&self, email: OutboundEmail) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: &'a BTreeMap<String, String>,
}

/// EmailJS-backed [`Mailer`].
#[derive(Debug, Clone)]
pub struct EmailJsMailer {
    client: reqwest::Client,
    endpoint: String,
    config: EmailConfig,
}

impl EmailJsMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self::with_endpoint(config, EMAILJS_SEND_URL)
    }

    pub fn with_endpoint(config: EmailConfig, endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            config,
        }
    }

    fn route(&self, template: EmailTemplate) -> Option<(&EmailAccountConfig, &str)> {
        match template {
            EmailTemplate::AdvisoryRequested => self
                .config
                .primary
                .as_ref()
                .map(|account| (account, self.config.advisory_request_template.as_str())),
            EmailTemplate::AdvisoryResponse => self
                .config
                .primary
                .as_ref()
                .map(|account| (account, self.config.advisory_response_template.as_str())),
            EmailTemplate::Contact => self
                .config
                .contact
                .as_ref()
                .map(|account| (account, self.config.contact_template.as_str())),
        }
    }
}

#[async_trait]
impl Mailer for EmailJsMailer {
    fn is_enabled(&self, template: EmailTemplate) -> bool {
        self.route(template).is_some()
    }

    async fn send(&self, email: OutboundEmail) -> Result<()> {
        let Some((account, template_id)) = self.route(email.template) else {
            info!(template = ?email.template, "Email not configured, skipping dispatch");
            return Ok(());
        };

        let request = SendRequest {
            service_id: &account.service_id,
            template_id,
            user_id: &account.public_key,
            access_token: account.private_key.as_deref(),
            template_params: &email.variables,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .wrap_err("Failed to reach email service")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(eyre!("Email service responded with {}: {}", status, body));
        }

        debug!(template = ?email.template, "Email sent");
        Ok(())
    }
}
