//! # Notifications
//!
//! Handlers never wait on mail. They push an [`Email`] onto an unbounded
//! channel and a single background worker delivers it.
//!
//! - With `MAIL_API_URL` set, each email is POSTed as JSON to that relay
//! - Without it, emails are only logged, which is what local runs want
//! - Delivery failures are logged and dropped
use chrono::{DateTime, Utc};
use records::pages::ContactMessage;
use reqwest::Client;
use serde::Serialize;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{error, info, warn};

use crate::config::MailConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl Email {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();

        Self {
            to: to.into(),
            subject: subject.into(),
            html: to_html(&text),
            text,
        }
    }

    pub fn reset_code(to: &str, code: &str) -> Self {
        Email::new(
            to,
            "HikeJo Password Reset Code",
            format!("Your HikeJo password reset code is: {code}"),
        )
    }

    pub fn trip_update(to: &str, first_name: &str, title: &str) -> Self {
        Email::new(
            to,
            "Trip Update Notice",
            format!(
                "Dear {first_name},\n\nYour booked trip \"{title}\" has been updated. \
                 Please check the new trip details on your HikeJo dashboard.\n\nHikeJo Team"
            ),
        )
    }

    pub fn trip_cancellation(to: &str, first_name: &str, title: &str, date: DateTime<Utc>) -> Self {
        let day = date.format("%a %b %d %Y");

        Email::new(
            to,
            "Trip Cancellation Notice",
            format!(
                "Dear {first_name},\n\nWe regret to inform you that your trip \"{title}\" \
                 scheduled on {day} has been cancelled.\n\nWe apologize for the inconvenience.\
                 \n\nHikeJo Team"
            ),
        )
    }

    pub fn contact_forward(inbox: &str, message: &ContactMessage) -> Self {
        Email::new(
            inbox,
            format!("New Contact message from {} - {}", message.name, message.subject),
            format!(
                "You received a new message from the HikeJo contact form:\n\n\
                 Name: {}\nEmail: {}\nSubject: {}\nMessage: {}",
                message.name, message.email, message.subject, message.message
            ),
        )
    }
}

fn to_html(text: &str) -> String {
    format!("<p>{}</p>", text.replace('\n', "<br>"))
}

#[derive(Serialize)]
struct Outgoing<'a> {
    from: &'a str,
    #[serde(flatten)]
    email: &'a Email,
}

#[derive(Clone)]
pub struct Mailer {
    sender: UnboundedSender<Email>,
}

impl Mailer {
    /// Starts the delivery worker. Must be called inside a tokio runtime.
    pub fn spawn(config: MailConfig) -> Self {
        let (sender, receiver) = unbounded_channel();

        match &config.endpoint {
            Some(endpoint) => info!("Delivering mail through {endpoint}"),
            None => warn!("MAIL_API_URL not set, emails will only be logged"),
        }

        tokio::spawn(deliver(config, receiver));

        Self { sender }
    }

    /// A mailer with no worker; whoever holds the receiver sees every email.
    pub fn detached() -> (Self, UnboundedReceiver<Email>) {
        let (sender, receiver) = unbounded_channel();

        (Self { sender }, receiver)
    }

    pub fn send(&self, email: Email) {
        if let Err(e) = self.sender.send(email) {
            warn!("Mail worker stopped, dropping email to {}", e.0.to);
        }
    }
}

async fn deliver(config: MailConfig, mut receiver: UnboundedReceiver<Email>) {
    let client = Client::new();

    while let Some(email) = receiver.recv().await {
        let Some(endpoint) = &config.endpoint else {
            info!(to = %email.to, subject = %email.subject, "{}", email.text);
            continue;
        };

        match post(&client, endpoint, &config, &email).await {
            Ok(()) => info!("Email sent to {}", email.to),
            Err(e) => error!("Failed to send email to {}: {e}", email.to),
        }
    }
}

async fn post(
    client: &Client,
    endpoint: &str,
    config: &MailConfig,
    email: &Email,
) -> Result<(), reqwest::Error> {
    let mut request = client.post(endpoint).json(&Outgoing {
        from: &config.from,
        email,
    });

    if let Some(key) = &config.api_key {
        request = request.bearer_auth(key);
    }

    request.send().await?.error_for_status()?;

    Ok(())
}
