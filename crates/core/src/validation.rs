//! Request validation performed before any write reaches the store.

use url::{Host, Url};

use crate::{
    errors::{DeskError, DeskResult, IdentityErrorCode},
    models::{project::ProjectRequest, user::RegisterRequest},
};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_DISPLAY_NAME_LEN: usize = 3;
pub const MAX_COMMENT_LEN: usize = 500;
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const IMAGE_CONTENT_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Accepts absolute `http(s)` URLs without credentials whose host is an IP
/// address, `localhost`, or a dotted domain name.
pub fn is_valid_url(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }
    let Ok(parsed) = Url::parse(candidate) else {
        return false;
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    if !parsed.username().is_empty() || parsed.password().is_some() {
        return false;
    }

    match parsed.host() {
        Some(Host::Domain(domain)) => is_valid_domain(domain),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        None => false,
    }
}

fn is_valid_domain(domain: &str) -> bool {
    if domain == "localhost" {
        return true;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() > 1
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

fn required(value: &str, field: &str) -> DeskResult<()> {
    if value.trim().is_empty() {
        return Err(DeskError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

pub fn validate_registration(request: &RegisterRequest) -> DeskResult<()> {
    if request.display_name.trim().chars().count() < MIN_DISPLAY_NAME_LEN {
        return Err(DeskError::Validation(format!(
            "Display name must be at least {} characters long",
            MIN_DISPLAY_NAME_LEN
        )));
    }
    if !is_valid_email(&request.email) {
        return Err(IdentityErrorCode::InvalidEmail.into());
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(IdentityErrorCode::WeakPassword.into());
    }
    if request.password != request.password_confirmation {
        return Err(DeskError::Validation("Passwords do not match".to_string()));
    }
    Ok(())
}

pub fn validate_project(request: &ProjectRequest) -> DeskResult<()> {
    required(&request.name, "Project name")?;
    required(&request.description, "Project description")?;

    if request.participation.is_empty() {
        return Err(DeskError::Validation(
            "Select at least one participation type".to_string(),
        ));
    }
    if request.technologies.iter().all(|tech| tech.trim().is_empty()) {
        return Err(DeskError::Validation(
            "Add at least one technology".to_string(),
        ));
    }

    for (url, field) in [
        (&request.repository_url, "Repository URL"),
        (&request.demo_url, "Demo URL"),
        (&request.image_url, "Image URL"),
    ] {
        required(url, field)?;
        if !is_valid_url(url) {
            return Err(DeskError::Validation(format!(
                "{} is not a valid http(s) URL",
                field
            )));
        }
    }

    Ok(())
}

pub fn validate_comment(comment: Option<&str>) -> DeskResult<()> {
    match comment {
        Some(text) if text.chars().count() > MAX_COMMENT_LEN => Err(DeskError::Validation(
            format!("Comment must be at most {} characters", MAX_COMMENT_LEN),
        )),
        _ => Ok(()),
    }
}

pub fn validate_image(content_type: &str, size: usize) -> DeskResult<()> {
    let content_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if !IMAGE_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(DeskError::Validation(format!(
            "Unsupported image type '{}'",
            content_type
        )));
    }
    if size == 0 {
        return Err(DeskError::Validation("Image is empty".to_string()));
    }
    if size > MAX_IMAGE_BYTES {
        return Err(DeskError::Validation(
            "Image must be 5MB or smaller".to_string(),
        ));
    }
    Ok(())
}
