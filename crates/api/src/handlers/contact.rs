use axum::{extract::State, Json};
use devdesk_core::{
    errors::DeskError,
    models::contact::{ContactRequest, ContactResponse},
    validation::is_valid_email,
};
use std::sync::Arc;
use tracing::warn;

use crate::{
    email::{EmailTemplate, OutboundEmail},
    middleware::error_handling::AppError,
    ApiState,
};

fn validate(request: &ContactRequest) -> Result<(), DeskError> {
    if request.from_name.trim().is_empty() {
        return Err(DeskError::Validation("Name is required".to_string()));
    }
    if !is_valid_email(request.from_email.trim()) {
        return Err(DeskError::Validation("A valid email is required".to_string()));
    }
    if request.message.trim().is_empty() {
        return Err(DeskError::Validation("Message is required".to_string()));
    }
    Ok(())
}

/// Relays a contact form message. Delivery problems are reported in the
/// body, never as an error status.
#[axum::debug_handler]
pub async fn send_contact(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ContactRequest>,
) -> Result<Json<ContactResponse>, AppError> {
    validate(&payload)?;

    if !state.mailer.is_enabled(EmailTemplate::Contact) {
        return Ok(Json(ContactResponse {
            success: false,
            message: "The contact form is not available right now".to_string(),
        }));
    }

    let email = OutboundEmail::new(EmailTemplate::Contact)
        .var("from_name", payload.from_name.trim())
        .var("from_email", payload.from_email.trim())
        .var("message", payload.message.trim());

    let response = match state.mailer.send(email).await {
        Ok(()) => ContactResponse {
            success: true,
            message: "Message sent successfully".to_string(),
        },
        Err(err) => {
            warn!(error = %err, "Failed to send contact message");
            ContactResponse {
                success: false,
                message: "The message could not be sent, please try again later".to_string(),
            }
        }
    };

    Ok(Json(response))
}
