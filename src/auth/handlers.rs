use axum::{
    extract::{FromRef, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, RegisterForm},
        password::{hash_password, verify_password},
        repo::User,
        session::{removal_cookie, SessionKeys},
    },
    error::AppError,
    pages,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

pub async fn register_page() -> Html<String> {
    Html(pages::register(None))
}

pub async fn login_page() -> Html<String> {
    Html(pages::login(None))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Form(payload): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let username = payload.username.trim();

    // Ensure the name is not taken; a UNIQUE index backs this up.
    if User::find_by_name(&state.db, username).await?.is_some() {
        warn!(username, "registration with taken name");
        return Ok(Html(pages::register(Some(&AppError::DuplicateName.to_string()))).into_response());
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, username, &hash).await?;

    info!(user_id = user.id, username = %user.name, "user registered");
    Ok(Redirect::to("/login").into_response())
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(payload): Form<LoginForm>,
) -> Result<Response, AppError> {
    let username = payload.username.trim();

    let user = match User::find_by_name(&state.db, username).await? {
        Some(u) => u,
        None => {
            warn!(username, "login with unknown name");
            return Ok(Html(pages::login(Some(&AppError::UserNotFound.to_string()))).into_response());
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = user.id, "login with wrong password");
        return Ok(
            Html(pages::login(Some(&AppError::InvalidCredential.to_string()))).into_response(),
        );
    }

    let keys = SessionKeys::from_ref(&state);
    let token = keys.sign(user.id)?;
    let jar = jar.add(keys.cookie(token));

    info!(user_id = user.id, username = %user.name, "user logged in");
    Ok((jar, Redirect::to("/")).into_response())
}

/// Clears the cookie; there is no server-side session state to revoke.
#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.remove(removal_cookie()), Redirect::to("/login"))
}
