// src/backend/handlers.rs
use axum::{
    extract::{Form, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::{Datelike, Local};
use serde::Deserialize;
use tera::Context;

use crate::backend::forms::{BudgetForm, ExpenseForm, FormErrors, LoginForm, RegisterForm};
use crate::backend::session::{AuthUser, SessionContext};
use crate::backend::{views, AppError, AppState};
use crate::database::db::queries;

/*=============================Home=============================*/

pub async fn home(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Response, AppError> {
    if session.user_id().await?.is_some() {
        return Ok(Redirect::to("/tracker").into_response());
    }
    views::page(&state, &session, "home.html", Context::new()).await
}

/*=============================Registration=============================*/

pub async fn register_page(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Response, AppError> {
    render_register(&state, &session, &RegisterForm::default(), &RegisterForm::empty_errors()).await
}

pub async fn register(
    State(state): State<AppState>,
    session: SessionContext,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let data = match form.validate() {
        Ok(data) => data,
        Err(errors) => return render_register(&state, &session, &form, &errors).await,
    };

    let password_hash = hash_password(&data.password)?;
    match queries::create_user(&state.db, &data.username, &password_hash).await {
        Ok(_) => {
            session.flash("success", "Registration successful! Please login.").await?;
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) if is_unique_violation(&e) => {
            session.flash("danger", "Username already exists.").await?;
            render_register(&state, &session, &form, &RegisterForm::empty_errors()).await
        }
        Err(e) => Err(e.into()),
    }
}

async fn render_register(
    state: &AppState,
    session: &SessionContext,
    form: &RegisterForm,
    errors: &FormErrors,
) -> Result<Response, AppError> {
    let mut context = Context::new();
    context.insert("form", form);
    context.insert("errors", errors);
    views::page(state, session, "register.html", context).await
}

/*=============================Login / Logout=============================*/

pub async fn login_page(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Response, AppError> {
    render_login(&state, &session, &LoginForm::default(), &LoginForm::empty_errors()).await
}

pub async fn login(
    State(state): State<AppState>,
    session: SessionContext,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if let Err(errors) = form.validate() {
        return render_login(&state, &session, &form, &errors).await;
    }

    if let Some(user) = queries::get_user_by_username(&state.db, &form.username).await? {
        if verify_password(&user.password, &form.password)? {
            session.persist_user(user.id, &user.username).await?;
            session.flash("success", "Login successful!").await?;
            return Ok(Redirect::to("/tracker").into_response());
        }
    }

    // Same message whether the username is unknown or the password is wrong.
    session.flash("danger", "Invalid username or password.").await?;
    render_login(&state, &session, &form, &LoginForm::empty_errors()).await
}

pub async fn logout(session: SessionContext) -> Result<Response, AppError> {
    session.clear().await;
    session.flash("info", "Logged out successfully.").await?;
    Ok(Redirect::to("/login").into_response())
}

async fn render_login(
    state: &AppState,
    session: &SessionContext,
    form: &LoginForm,
    errors: &FormErrors,
) -> Result<Response, AppError> {
    let mut context = Context::new();
    context.insert("form", form);
    context.insert("errors", errors);
    views::page(state, session, "login.html", context).await
}

/*=============================Tracker=============================*/

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TrackerQuery {
    category: Option<String>,
}

pub async fn tracker_page(
    State(state): State<AppState>,
    session: SessionContext,
    auth: AuthUser,
    Query(query): Query<TrackerQuery>,
) -> Result<Response, AppError> {
    let selected = query
        .category
        .as_deref()
        .and_then(|raw| raw.parse::<i64>().ok());
    render_tracker(
        &state,
        &session,
        &auth,
        selected,
        &ExpenseForm::default(),
        &ExpenseForm::empty_errors(),
    )
    .await
}

pub async fn add_expense(
    State(state): State<AppState>,
    session: SessionContext,
    auth: AuthUser,
    Form(form): Form<ExpenseForm>,
) -> Result<Response, AppError> {
    let categories = queries::get_all_categories(&state.db).await?;
    let new_expense = match form.validate(&categories) {
        Ok(data) => data,
        Err(errors) => return render_tracker(&state, &session, &auth, None, &form, &errors).await,
    };

    let date = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    queries::create_expense(
        &state.db,
        auth.id,
        &new_expense.description,
        new_expense.amount,
        new_expense.category_id,
        &date,
    )
    .await?;

    session.flash("success", "Expense added successfully!").await?;
    Ok(Redirect::to("/tracker").into_response())
}

async fn render_tracker(
    state: &AppState,
    session: &SessionContext,
    auth: &AuthUser,
    selected_category: Option<i64>,
    form: &ExpenseForm,
    errors: &FormErrors,
) -> Result<Response, AppError> {
    let categories = queries::get_all_categories(&state.db).await?;
    let expenses = queries::list_expenses(&state.db, auth.id, selected_category).await?;

    let (month, year) = current_period();
    let budget = queries::get_budget(&state.db, auth.id, month, year)
        .await?
        .map(|b| b.amount);
    let spent = queries::monthly_spent(&state.db, auth.id, month, year).await?;
    let remaining = budget.map(|b| b - spent);

    let mut context = Context::new();
    context.insert("username", &auth.username);
    context.insert("categories", &categories);
    // 0 is never a real category id, so it doubles as "no filter".
    context.insert("selected_category", &selected_category.unwrap_or(0));
    context.insert("expenses", &expenses);
    context.insert("budget", &budget);
    context.insert("spent", &spent);
    context.insert("remaining", &remaining);
    context.insert("form", form);
    // Parsed copy of the submitted category so the select can re-select it;
    // 0 when blank or malformed, which matches no real id.
    context.insert("form_category", &form.category.trim().parse::<i64>().unwrap_or(0));
    context.insert("errors", errors);
    views::page(state, session, "tracker.html", context).await
}

/*=============================Budget=============================*/

pub async fn budget_page(
    State(state): State<AppState>,
    session: SessionContext,
    auth: AuthUser,
) -> Result<Response, AppError> {
    render_budget(&state, &session, &auth, &BudgetForm::default(), &BudgetForm::empty_errors()).await
}

pub async fn set_budget(
    State(state): State<AppState>,
    session: SessionContext,
    auth: AuthUser,
    Form(form): Form<BudgetForm>,
) -> Result<Response, AppError> {
    let amount = match form.validate() {
        Ok(amount) => amount,
        Err(errors) => return render_budget(&state, &session, &auth, &form, &errors).await,
    };

    let (month, year) = current_period();
    queries::upsert_budget(&state.db, auth.id, amount, month, year).await?;
    session.flash("success", "Budget updated successfully!").await?;
    Ok(Redirect::to("/tracker").into_response())
}

async fn render_budget(
    state: &AppState,
    session: &SessionContext,
    auth: &AuthUser,
    form: &BudgetForm,
    errors: &FormErrors,
) -> Result<Response, AppError> {
    let mut context = Context::new();
    context.insert("username", &auth.username);
    context.insert("form", form);
    context.insert("errors", errors);
    views::page(state, session, "set_budget.html", context).await
}

/*=============================Delete=============================*/

pub async fn delete_expense(
    State(state): State<AppState>,
    session: SessionContext,
    auth: AuthUser,
    Path(expense_id): Path<i64>,
) -> Result<Response, AppError> {
    // Scoped to the owner, so deleting someone else's id is a quiet no-op.
    queries::delete_expense(&state.db, auth.id, expense_id).await?;
    session.flash("info", "Expense deleted.").await?;
    Ok(Redirect::to("/tracker").into_response())
}

/*=============================Chart Data=============================*/

pub async fn chart_data(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Json<Vec<(String, f64)>>, AppError> {
    let Some(user_id) = session.user_id().await? else {
        return Ok(Json(Vec::new()));
    };

    let (month, year) = current_period();
    let rows = queries::spend_by_category(&state.db, user_id, month, year).await?;
    Ok(Json(rows))
}

/*=============================Helpers=============================*/

fn current_period() -> (u32, i32) {
    let now = Local::now();
    (now.month(), now.year())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

fn hash_password(password: &str) -> Result<String, AppError> {
    use argon2::password_hash::{rand_core::OsRng, SaltString};
    use argon2::{Argon2, PasswordHasher};

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string();
    Ok(hash)
}

fn verify_password(stored_hash: &str, candidate: &str) -> Result<bool, AppError> {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed = PasswordHash::new(stored_hash)?;
    Ok(Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok())
}
