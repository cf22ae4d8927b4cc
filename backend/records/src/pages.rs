use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    new_id,
    patterns::{EMAIL_PATTERN, tidy},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSlug {
    About,
    Faq,
    Terms,
    Privacy,
}

impl PageSlug {
    pub const ALL: [PageSlug; 4] = [
        PageSlug::About,
        PageSlug::Faq,
        PageSlug::Terms,
        PageSlug::Privacy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PageSlug::About => "about",
            PageSlug::Faq => "faq",
            PageSlug::Terms => "terms",
            PageSlug::Privacy => "privacy",
        }
    }
}

impl fmt::Display for PageSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageSlug {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lowered = raw.trim().to_lowercase();

        PageSlug::ALL
            .into_iter()
            .find(|slug| slug.as_str() == lowered)
            .ok_or_else(|| format!("unknown page `{raw}`"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticPage {
    pub slug: PageSlug,
    pub html_content: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ContactRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(regex(path = *EMAIL_PATTERN, message = "Please provide a valid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Message content is required"))]
    pub message: String,
}

impl ContactRequest {
    pub fn normalize(&mut self) {
        tidy(&mut self.name);
        tidy(&mut self.subject);
        tidy(&mut self.message);
        self.email = self.email.trim().to_lowercase();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub sent_at: DateTime<Utc>,
}

impl ContactMessage {
    pub fn new(request: ContactRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            name: request.name,
            email: request.email,
            subject: request.subject,
            message: request.message,
            sent_at: now,
        }
    }
}
