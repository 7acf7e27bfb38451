use std::time::{SystemTime, UNIX_EPOCH};

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::validate;

pub fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

/// Outward-facing podcast entity. PIN material never lives here, so no
/// serialization of this type can leak it.
#[derive(Clone, Debug, PartialEq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Podcast {
    pub id: String,
    pub title: String,
    pub host: String,
    pub url: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: u64,
    /// Absent until the first modification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
}

impl Podcast {
    /// Apply a validated patch, stamping `updated_at`. Fields that fail to
    /// parse are skipped; callers validate the patch before applying it.
    pub fn apply(&mut self, patch: &PodcastPatch, now: u64) {
        if let Some(title) = &patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(host) = &patch.host {
            self.host = host.trim().to_string();
        }
        if let Some(url) = &patch.url {
            self.url = url.clone();
        }
        if let Some(category) = patch.category.as_deref().and_then(Category::parse) {
            self.category = category;
        }
        if let Some(rating) = patch.rating {
            self.rating = Some(validate::normalize_rating(rating));
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.trim().to_string());
        }
        self.updated_at = Some(now);
    }
}

/// Creation payload as it arrives on the wire. Every field is optional so
/// validation can name exactly which rules failed instead of bouncing the
/// request at the decoding layer.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PodcastDraft {
    pub title: Option<String>,
    pub host: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub pin: Option<String>,
}

/// Partial update for PATCH bodies. `category` stays a raw string until
/// validation converts it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PodcastPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PodcastPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.host.is_none()
            && self.url.is_none()
            && self.category.is_none()
            && self.rating.is_none()
            && self.description.is_none()
    }
}

/// Storage record: the outward entity plus the bcrypt hash of its PIN.
/// Deliberately borsh-only; there is no serde path that could serialize the
/// hash outward.
#[derive(Clone, Debug, BorshSerialize, BorshDeserialize)]
pub struct StoredPodcast {
    pub podcast: Podcast,
    pub pin_hash: String,
}
