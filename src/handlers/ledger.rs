use axum::{
    extract::{Extension, Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response, Redirect},
};
use chrono::Local;
use crate::errors::{AppError, AppResult};
use crate::middleware::AuthContext;
use crate::models::{EntryFilter, EntryForm};
use crate::services::{self, FilterOptions, DATE_FORMAT};
use crate::state::AppState;
use crate::views;

// Summary page, optionally with an add-entry error shown above the form.
async fn render_summary(
    state: &AppState,
    username: &str,
    error: Option<&str>,
    status: StatusCode,
) -> AppResult<Response> {
    let entries = state.blocking(|s| s.ledger().read_all()).await?;
    let totals = services::totals(&entries)?;
    let today = Local::now().date_naive().format(DATE_FORMAT).to_string();

    let username = views::escape_html(username);
    let rows = views::entry_rows(&entries);
    let error_html = views::error_block(error);
    let [net, income, expense] = views::totals_vars(&totals);

    let html = views::render(&state.config.web.templates_dir, "index.html", &[
        ("username", username.as_str()),
        ("today", today.as_str()),
        ("entries", rows.as_str()),
        ("error", error_html.as_str()),
        (net.0, net.1.as_str()),
        (income.0, income.1.as_str()),
        (expense.0, expense.1.as_str()),
    ])?;
    Ok((status, Html(html)).into_response())
}

pub async fn serve_index(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> AppResult<Response> {
    let username = auth.require_user()?;
    tracing::debug!("Rendering summary for {}", username);
    render_summary(&state, username, None, StatusCode::OK).await
}

pub async fn serve_entries(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(criteria): Query<EntryFilter>,
) -> AppResult<Response> {
    let username = auth.require_user()?;

    let entries = state.blocking(|s| s.ledger().read_all()).await?;
    let options = FilterOptions::from_entries(&entries);
    let filtered = services::filter(&entries, &criteria);
    let totals = services::totals(&filtered)?;
    tracing::debug!(
        "Filter {:?} kept {} of {} entries",
        criteria, filtered.len(), entries.len()
    );

    let username = views::escape_html(username);
    let rows = views::entry_rows(&filtered);
    let months = views::select_options(&options.months, criteria.month());
    let entry_types = views::select_options(&options.entry_types, criteria.entry_type());
    let editors = views::select_options(&options.editors, criteria.editor());
    let [net, income, expense] = views::totals_vars(&totals);

    let html = views::render(&state.config.web.templates_dir, "entries.html", &[
        ("username", username.as_str()),
        ("entries", rows.as_str()),
        ("month_options", months.as_str()),
        ("entry_type_options", entry_types.as_str()),
        ("editor_options", editors.as_str()),
        (net.0, net.1.as_str()),
        (income.0, income.1.as_str()),
        (expense.0, expense.1.as_str()),
    ])?;
    Ok(Html(html).into_response())
}

pub async fn add_entry(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Form(entry_form): Form<EntryForm>,
) -> AppResult<Response> {
    let username = auth.require_user()?;

    match state.blocking(move |s| s.ledger().append(entry_form)).await {
        Ok(_) => Ok(Redirect::to("/index").into_response()),
        Err(AppError::Validation(msg)) => {
            tracing::warn!("Rejected entry from {}: {}", username, msg);
            render_summary(&state, username, Some(msg.as_str()), StatusCode::BAD_REQUEST).await
        }
        Err(e) => Err(e),
    }
}
