//! Public contact form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, http::StatusCode, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::models::ContactSubmission;
use crate::state::AppState;

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    /// Values to refill the form with after a failed submission.
    pub form: ContactSubmission,
    pub error: Option<String>,
    pub success: bool,
}

impl ContactTemplate {
    fn blank() -> Self {
        Self {
            form: ContactSubmission::default(),
            error: None,
            success: false,
        }
    }

    fn failed(form: ContactSubmission, error: String) -> Self {
        Self {
            form,
            error: Some(error),
            success: false,
        }
    }
}

/// Display the contact page.
pub async fn page() -> impl IntoResponse {
    ContactTemplate::blank()
}

/// Handle the HTML form. Subject is required here.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<ContactSubmission>,
) -> impl IntoResponse {
    let contact = match form.clone().validate(true) {
        Ok(contact) => contact,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                ContactTemplate::failed(form, e.to_string()),
            );
        }
    };

    match state.contacts().create(&contact).await {
        Ok(contact_id) => {
            tracing::info!(contact_id = %contact_id, "Contact message received");
            (
                StatusCode::OK,
                ContactTemplate {
                    success: true,
                    ..ContactTemplate::blank()
                },
            )
        }
        Err(e) => {
            tracing::error!("Failed to store contact message: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ContactTemplate::failed(
                    form,
                    "Your message could not be sent. Please try again later.".to_string(),
                ),
            )
        }
    }
}
