use axum::{
    extract::{Extension, Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response, Redirect},
};
use tower_sessions::Session;
use crate::errors::{AppError, AppResult};
use crate::middleware::{AuthContext, SESSION_USER_KEY};
use crate::models::{LoginForm, RegisterForm};
use crate::state::AppState;
use crate::views;

fn render_form(
    state: &AppState,
    template: &str,
    error: Option<&str>,
    status: StatusCode,
) -> AppResult<Response> {
    let error_html = views::error_block(error);
    let html = views::render(&state.config.web.templates_dir, template, &[("error", error_html.as_str())])?;
    Ok((status, Html(html)).into_response())
}

pub async fn serve_login_page(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> AppResult<Response> {
    if auth.is_authenticated() {
        return Ok(Redirect::to("/index").into_response());
    }
    render_form(&state, "login.html", None, StatusCode::OK)
}

pub async fn handle_login(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    session: Session,
    Form(login_form): Form<LoginForm>,
) -> AppResult<Response> {
    if auth.is_authenticated() {
        return Ok(Redirect::to("/index").into_response());
    }

    let username = login_form.username.trim().to_string();
    let valid = {
        let (username, password) = (username.clone(), login_form.password);
        state.blocking(move |s| s.auth().validate(&username, &password)).await?
    };
    if !valid {
        tracing::warn!("Failed login attempt for user: {}", username);
        return render_form(
            &state,
            "login.html",
            Some("Invalid username or password"),
            StatusCode::UNAUTHORIZED,
        );
    }

    // New session id on privilege change
    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, &username).await?;
    tracing::info!("User logged in: {}", username);
    Ok(Redirect::to("/index").into_response())
}

pub async fn serve_register_page(State(state): State<AppState>) -> AppResult<Response> {
    render_form(&state, "register.html", None, StatusCode::OK)
}

pub async fn handle_register(
    State(state): State<AppState>,
    Form(register_form): Form<RegisterForm>,
) -> AppResult<Response> {
    match state.blocking(move |s| s.auth().register(register_form)).await {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(AppError::Validation(msg)) => {
            render_form(&state, "register.html", Some(msg.as_str()), StatusCode::BAD_REQUEST)
        }
        Err(e) => Err(e),
    }
}

pub async fn handle_logout(session: Session) -> AppResult<Response> {
    if let Some(username) = session.remove::<String>(SESSION_USER_KEY).await? {
        tracing::info!("User logged out: {}", username);
    }
    Ok(Redirect::to("/").into_response())
}
