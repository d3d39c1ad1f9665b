// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Login, registration and logout handlers.
//!
//! Failures re-render the form with status 200 and a sanitized message.
//! Successes redirect (303) to a target under the configured base path.
use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use authgate_common::{LoginForm, LoginQuery, RegisterForm};
use std::sync::Arc;
use tracing::{error, warn};

use super::{cookie, pages};
use crate::error::AuthFlow;
use crate::AppState;

/// `GET /` greets an authenticated user, otherwise sends them to the login form
pub async fn home(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let settings = &state.settings;
    if let Some(token) = cookie::session_token(&headers, &settings.session.cookie_name) {
        match state.auth.current_session(&token).await {
            Ok(Some(session)) => {
                return pages::home_page(settings, &session.username).into_response();
            }
            Ok(None) => {}
            Err(e) => error!(error = %e, "session lookup failed"),
        }
    }
    Redirect::to(&settings.url_for("/login")).into_response()
}

/// `GET /login`
pub async fn login_form(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoginQuery>,
) -> Response {
    pages::login_page(&state.settings, None, query.just_registered()).into_response()
}

/// `POST /login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let settings = &state.settings;
    let current = cookie::session_token(&headers, &settings.session.cookie_name);

    match state
        .auth
        .login(&form.username, &form.password, current.as_deref())
        .await
    {
        Ok(session) => match cookie::session_cookie(settings, &session.session_id) {
            Ok(value) => {
                let mut response =
                    Redirect::to(&settings.url_for(&settings.home_path)).into_response();
                response.headers_mut().insert(SET_COOKIE, value);
                response
            }
            Err(e) => {
                error!(error = %e, "failed to encode session cookie");
                if let Err(e) = state.auth.logout(&session.session_id).await {
                    warn!(error = %e, "failed to destroy orphaned session");
                }
                pages::login_page(
                    settings,
                    Some("An unexpected error occurred during login."),
                    false,
                )
                .into_response()
            }
        },
        Err(e) => {
            pages::login_page(settings, Some(e.sanitized_message(AuthFlow::Login)), false)
                .into_response()
        }
    }
}

/// `GET /register`
pub async fn register_form(State(state): State<Arc<AppState>>) -> Response {
    pages::register_page(&state.settings, None).into_response()
}

/// `POST /register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let settings = &state.settings;
    match state
        .auth
        .register(
            &form.username,
            &form.email,
            &form.password,
            &form.confirm_password,
        )
        .await
    {
        Ok(_) => Redirect::to(&settings.url_for("/login?registered=true")).into_response(),
        Err(e) => {
            pages::register_page(settings, Some(e.sanitized_message(AuthFlow::Registration)))
                .into_response()
        }
    }
}

/// `GET /logout` always ends at the login page with the cookie cleared.
/// A failed destroy is logged only; the user cannot act on it.
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let settings = &state.settings;
    if let Some(token) = cookie::session_token(&headers, &settings.session.cookie_name) {
        if let Err(e) = state.auth.logout(&token).await {
            error!(error = %e, "failed to destroy session");
        }
    }

    let mut response = Redirect::to(&settings.url_for("/login")).into_response();
    match cookie::clear_session_cookie(settings) {
        Ok(value) => {
            response.headers_mut().insert(SET_COOKIE, value);
        }
        Err(e) => error!(error = %e, "failed to encode cookie removal"),
    }
    response
}

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}
