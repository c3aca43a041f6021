//! Transactional email rendering. Rendering only — the SMTP transport is an
//! external collaborator.

use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("email template rendering failed: {0}")]
    Template(#[from] tera::Error),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: u32,
    pub price: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub customer_name: String,
    pub order_id: String,
    pub lines: Vec<OrderLine>,
    pub total: String,
}

pub struct Mailer {
    templates: Tera,
}

impl Mailer {
    /// Load templates from the filesystem, falling back to the embedded
    /// copies so rendering works from any working directory.
    pub fn new() -> Self {
        let mut templates = match Tera::new("templates/email/**/*") {
            Ok(templates) => templates,
            Err(error) => {
                warn!(
                    event_name = "system.mail.templates_fallback",
                    correlation_id = "bootstrap",
                    session_id = "unknown",
                    error = %error,
                    "email templates not found on filesystem; using embedded copies"
                );
                Tera::default()
            }
        };

        if !templates.get_template_names().any(|name| name == "order_confirmation.html") {
            templates
                .add_raw_template(
                    "order_confirmation.html",
                    include_str!("../../../templates/email/order_confirmation.html"),
                )
                .ok();
        }
        if !templates.get_template_names().any(|name| name == "welcome.html") {
            templates
                .add_raw_template(
                    "welcome.html",
                    include_str!("../../../templates/email/welcome.html"),
                )
                .ok();
        }

        Self { templates }
    }

    pub fn render_order_confirmation(&self, order: &OrderConfirmation) -> Result<String, MailError> {
        let mut context = Context::new();
        context.insert("customer_name", &order.customer_name);
        context.insert("order_id", &order.order_id);
        context.insert("lines", &order.lines);
        context.insert("total", &order.total);

        Ok(self.templates.render("order_confirmation.html", &context)?)
    }

    pub fn render_welcome(&self, customer_name: &str) -> Result<String, MailError> {
        let mut context = Context::new();
        context.insert("customer_name", &customer_name);

        Ok(self.templates.render("welcome.html", &context)?)
    }
}

impl Default for Mailer {
    fn default() -> Self {
        Self::new()
    }
}
