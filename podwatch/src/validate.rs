use url::Url;

use crate::category::Category;
use crate::error::PodcastError;
use crate::model::{PodcastDraft, PodcastPatch};

/// Podcast hosting platforms accepted for the `url` field. A hostname must
/// equal one of these (after stripping a leading `www.`) or be a subdomain
/// of one.
pub const ALLOWED_PODCAST_DOMAINS: [&str; 6] =
    ["open.spotify.com", "podcasts.apple.com", "soundcloud.com", "youtube.com", "anchor.fm", "youtu.be"];

pub const TITLE_REQUIRED: &str = "Title is required";
pub const TITLE_LENGTH: &str = "Title must be between 1 and 100 characters";
pub const HOST_REQUIRED: &str = "Host is required";
pub const HOST_LENGTH: &str = "Host must be between 1 and 50 characters";
pub const URL_REQUIRED: &str = "URL is required";
pub const INVALID_URL: &str = "Invalid URL format. Please provide a valid HTTP/HTTPS URL";
pub const CATEGORY_REQUIRED: &str = "Category is required";
pub const DESCRIPTION_LENGTH: &str = "Description must be less than 500 characters";
pub const RATING_RANGE: &str = "Rating must be between 0 and 5";
pub const PIN_REQUIRED: &str = "PIN is required";
pub const PIN_LENGTH: &str = "PIN must be exactly 4 digits";
pub const PIN_DIGITS: &str = "PIN must contain only numbers";
pub const NO_FIELDS: &str = "No fields to update";

pub fn invalid_domain_message() -> String {
    format!("Unsupported podcast platform. Allowed domains: {}", ALLOWED_PODCAST_DOMAINS.join(", "))
}

/// Rating is kept at one-decimal granularity.
pub fn normalize_rating(rating: f64) -> f64 {
    (rating * 10.0).round() / 10.0
}

/// Check a podcast URL: must parse as http/https and its hostname, minus a
/// leading `www.`, must be an allow-listed platform or a subdomain of one.
pub fn check_url(raw: &str) -> Result<(), PodcastError> {
    let parsed = Url::parse(raw).map_err(|_| PodcastError::validation(INVALID_URL))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(PodcastError::validation(INVALID_URL));
    }
    let host = parsed.host_str().ok_or_else(|| PodcastError::validation(INVALID_URL))?;
    let domain = host.strip_prefix("www.").unwrap_or(host);
    let allowed = ALLOWED_PODCAST_DOMAINS
        .iter()
        .any(|candidate| domain == *candidate || domain.ends_with(&format!(".{candidate}")));
    if allowed {
        Ok(())
    } else {
        Err(PodcastError::Validation(invalid_domain_message()))
    }
}

/// PIN format rules, checked in a fixed order: present, exactly 4
/// characters, digits only. Nothing downstream (existence lookup, hash
/// comparison) runs until these pass.
pub fn pin_format(pin: Option<&str>) -> Result<&str, PodcastError> {
    let pin = match pin {
        Some(p) if !p.is_empty() => p,
        _ => return Err(PodcastError::validation(PIN_REQUIRED)),
    };
    if pin.chars().count() != 4 {
        return Err(PodcastError::validation(PIN_LENGTH));
    }
    if !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PodcastError::validation(PIN_DIGITS));
    }
    Ok(pin)
}

fn check_rating(rating: f64) -> Result<(), PodcastError> {
    if (0.0..=5.0).contains(&rating) {
        Ok(())
    } else {
        Err(PodcastError::validation(RATING_RANGE))
    }
}

/// Validate a creation payload, collecting every failed rule into a single
/// message so the caller sees all problems at once.
pub fn check_draft(draft: &PodcastDraft) -> Result<(), PodcastError> {
    let mut messages: Vec<String> = Vec::new();

    match draft.title.as_deref().map(str::trim) {
        None | Some("") => messages.push(TITLE_REQUIRED.into()),
        Some(title) if title.chars().count() > 100 => messages.push(TITLE_LENGTH.into()),
        Some(_) => {}
    }
    match draft.host.as_deref().map(str::trim) {
        None | Some("") => messages.push(HOST_REQUIRED.into()),
        Some(host) if host.chars().count() > 50 => messages.push(HOST_LENGTH.into()),
        Some(_) => {}
    }
    match draft.url.as_deref() {
        None | Some("") => messages.push(URL_REQUIRED.into()),
        Some(url) => {
            if let Err(err) = check_url(url) {
                messages.push(err.to_string());
            }
        }
    }
    match draft.category.as_deref() {
        None | Some("") => messages.push(CATEGORY_REQUIRED.into()),
        Some(category) => {
            if Category::parse(category).is_none() {
                messages.push(format!("Category must be one of: {}", Category::joined()));
            }
        }
    }
    if let Some(description) = draft.description.as_deref() {
        if description.trim().chars().count() > 500 {
            messages.push(DESCRIPTION_LENGTH.into());
        }
    }
    if let Some(rating) = draft.rating {
        if let Err(err) = check_rating(rating) {
            messages.push(err.to_string());
        }
    }
    if let Err(err) = pin_format(draft.pin.as_deref()) {
        messages.push(err.to_string());
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(PodcastError::Validation(format!("Validation failed: {}", messages.join(", "))))
    }
}

/// Validate the fields present in a partial update. Errors are reported
/// individually, first failure wins.
pub fn check_patch(patch: &PodcastPatch) -> Result<(), PodcastError> {
    if let Some(title) = patch.title.as_deref().map(str::trim) {
        if title.is_empty() || title.chars().count() > 100 {
            return Err(PodcastError::validation(TITLE_LENGTH));
        }
    }
    if let Some(host) = patch.host.as_deref().map(str::trim) {
        if host.is_empty() || host.chars().count() > 50 {
            return Err(PodcastError::validation(HOST_LENGTH));
        }
    }
    if let Some(url) = patch.url.as_deref() {
        check_url(url)?;
    }
    if let Some(category) = patch.category.as_deref() {
        if Category::parse(category).is_none() {
            return Err(PodcastError::Validation(format!("Category must be one of: {}", Category::joined())));
        }
    }
    if let Some(rating) = patch.rating {
        check_rating(rating)?;
    }
    if let Some(description) = patch.description.as_deref() {
        if description.trim().chars().count() > 500 {
            return Err(PodcastError::validation(DESCRIPTION_LENGTH));
        }
    }
    Ok(())
}
