//! Template registry and the shared page-render helper.

use axum::response::{Html, IntoResponse, Response};
use tera::{Context, Tera};

use crate::backend::session::SessionContext;
use crate::backend::{AppError, AppState};

// Templates are compiled into the binary so the server has no runtime
// dependency on a template directory.
pub fn templates() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../../templates/base.html")),
        ("home.html", include_str!("../../templates/home.html")),
        ("register.html", include_str!("../../templates/register.html")),
        ("login.html", include_str!("../../templates/login.html")),
        ("tracker.html", include_str!("../../templates/tracker.html")),
        ("set_budget.html", include_str!("../../templates/set_budget.html")),
    ])?;
    Ok(tera)
}

// Render a page, draining any pending flash notices into it.
pub async fn page(
    state: &AppState,
    session: &SessionContext,
    name: &str,
    mut context: Context,
) -> Result<Response, AppError> {
    let flashes = session.take_flashes().await?;
    context.insert("flashes", &flashes);
    let body = state.templates.render(name, &context)?;
    Ok(Html(body).into_response())
}
