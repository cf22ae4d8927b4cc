use std::sync::Arc;

use axum::{Json, Router, extract::State as Shared, http::StatusCode, response::IntoResponse, routing::post};
use records::{
    accounts::{
        Account, Adventurer, AdventurerLogin, AdventurerSignup, Company, CompanyLogin, CompanySignup,
        ForgotPassword, PasswordReset, Profile, ResetCode,
    },
    patterns::check,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;
use tracing::info;

use super::{account_by_email, email_in_use, save_account};
use crate::{
    auth::{hash_password, issue_token, reset_code, verify_password},
    database::{Collection, Database},
    error::AppError,
    mail::Email,
    state::State,
    utils::Payload,
};

pub fn router() -> Router<Arc<State>> {
    Router::new()
        .route("/signup/adventurer", post(signup_adventurer))
        .route("/login/adventurer", post(login_adventurer))
        .route("/signup/company", post(signup_company))
        .route("/login/company", post(login_company))
        .route("/forgot-password", post(forgot_password))
        .route("/verify-reset-code", post(verify_reset_code))
        .route("/reset-password", post(reset_password))
}

pub async fn signup_adventurer(
    Shared(state): Shared<Arc<State>>,
    Payload(mut signup): Payload<AdventurerSignup>,
) -> Result<impl IntoResponse, AppError> {
    signup.normalize();
    check(&signup).map_err(AppError::Invalid)?;

    let phone_taken = state
        .database
        .exists(Collection::Adventurers, |account: &Account<Adventurer>| {
            account.profile.phone_number == signup.phone_number
        })
        .await?;

    if phone_taken || email_in_use(&state.database, &signup.email).await? {
        return Err(AppError::invalid("Email or phone number already exists"));
    }

    let (adventurer, password) = signup.into_parts();
    let hash = hash_password(password, state.config.bcrypt_cost).await?;

    let account = Account::new(adventurer, hash);
    save_account(&state.database, &account).await?;
    info!("New adventurer {}", account.id());

    let token = issue_token(&state.config, account.id(), Adventurer::ROLE)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Signed up successfully",
            "data": { "adventurer": account.profile, "token": token },
        })),
    ))
}

pub async fn login_adventurer(
    Shared(state): Shared<Arc<State>>,
    Payload(mut login): Payload<AdventurerLogin>,
) -> Result<impl IntoResponse, AppError> {
    login.email = login.email.trim().to_lowercase();
    check(&login).map_err(AppError::Invalid)?;

    let account = account_by_email::<Adventurer>(&state.database, &login.email)
        .await?
        .ok_or_else(|| AppError::not_found("Adventurer not found"))?;

    if !verify_password(login.password, account.password_hash.clone()).await? {
        return Err(AppError::invalid("Invalid email or password"));
    }

    let token = issue_token(&state.config, account.id(), Adventurer::ROLE)?;

    Ok(Json(json!({
        "status": "success",
        "message": "Logged in successfully",
        "data": { "adventurer": account.profile, "token": token },
    })))
}

pub async fn signup_company(
    Shared(state): Shared<Arc<State>>,
    Payload(mut signup): Payload<CompanySignup>,
) -> Result<impl IntoResponse, AppError> {
    signup.normalize();
    check(&signup).map_err(AppError::Invalid)?;

    let taken = state
        .database
        .exists(Collection::Companies, |account: &Account<Company>| {
            account.profile.phone_number == signup.phone_number
                || account.profile.company_id == signup.company_id
        })
        .await?;

    if taken || email_in_use(&state.database, &signup.email).await? {
        return Err(AppError::invalid(
            "Email, phone number, or Company ID already exists",
        ));
    }

    let (company, password) = signup.into_parts();
    let hash = hash_password(password, state.config.bcrypt_cost).await?;

    let account = Account::new(company, hash);
    save_account(&state.database, &account).await?;
    info!("New company {}", account.id());

    let token = issue_token(&state.config, account.id(), Company::ROLE)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Signed up successfully",
            "data": { "company": account.profile, "token": token },
        })),
    ))
}

pub async fn login_company(
    Shared(state): Shared<Arc<State>>,
    Payload(mut login): Payload<CompanyLogin>,
) -> Result<impl IntoResponse, AppError> {
    login.company_id = login.company_id.trim().to_string();
    check(&login).map_err(AppError::Invalid)?;

    let account = state
        .database
        .find_one(Collection::Companies, |account: &Account<Company>| {
            account.profile.company_id == login.company_id
        })
        .await?
        .ok_or_else(|| AppError::not_found("Company not found"))?;

    if !verify_password(login.password, account.password_hash.clone()).await? {
        return Err(AppError::invalid("Invalid Id or password"));
    }

    let token = issue_token(&state.config, account.id(), Company::ROLE)?;

    Ok(Json(json!({
        "status": "success",
        "message": "Logged in successfully",
        "data": { "company": account.profile, "token": token },
    })))
}

/// Stores `code` on the account registered under `email`, if there is one.
async fn store_reset_code<P>(database: &Database, email: &str, code: &str) -> Result<bool, AppError>
where
    P: Profile + Serialize + DeserializeOwned,
{
    let Some(mut account) = account_by_email::<P>(database, email).await? else {
        return Ok(false);
    };

    account.reset_code = Some(code.to_string());
    save_account(database, &account).await?;

    Ok(true)
}

async fn holder_of_code<P>(
    database: &Database,
    email: &str,
    code: &str,
) -> Result<Option<Account<P>>, AppError>
where
    P: Profile + DeserializeOwned,
{
    if code.is_empty() {
        return Ok(None);
    }

    database
        .find_one(Collection::accounts(P::ROLE), |account: &Account<P>| {
            account.profile.email() == email && account.reset_code.as_deref() == Some(code)
        })
        .await
}

pub async fn forgot_password(
    Shared(state): Shared<Arc<State>>,
    Payload(request): Payload<ForgotPassword>,
) -> Result<impl IntoResponse, AppError> {
    let email = request.email.trim().to_lowercase();
    let code = reset_code();

    let found = store_reset_code::<Adventurer>(&state.database, &email, &code).await?
        || store_reset_code::<Company>(&state.database, &email, &code).await?;

    if !found {
        return Err(AppError::not_found("No account with that email found"));
    }

    state.mailer.send(Email::reset_code(&email, &code));

    Ok(Json(json!({
        "status": "success",
        "message": "Reset code sent to your email",
    })))
}

pub async fn verify_reset_code(
    Shared(state): Shared<Arc<State>>,
    Payload(request): Payload<ResetCode>,
) -> Result<impl IntoResponse, AppError> {
    let email = request.email.trim().to_lowercase();
    let code = request.code.trim();

    let valid = holder_of_code::<Adventurer>(&state.database, &email, code)
        .await?
        .is_some()
        || holder_of_code::<Company>(&state.database, &email, code)
            .await?
            .is_some();

    if !valid {
        return Err(AppError::invalid("Invalid reset code or email"));
    }

    Ok(Json(json!({
        "status": "success",
        "message": "Reset code verified",
    })))
}

async fn replace_password<P>(state: &State, mut account: Account<P>, password: String) -> Result<(), AppError>
where
    P: Profile + Serialize,
{
    let minimum = P::ROLE.min_password_len();
    if password.chars().count() < minimum {
        return Err(AppError::Invalid(format!(
            "Password must be at least {minimum} characters long"
        )));
    }

    account.password_hash = hash_password(password, state.config.bcrypt_cost).await?;
    account.reset_code = None;

    save_account(&state.database, &account).await
}

pub async fn reset_password(
    Shared(state): Shared<Arc<State>>,
    Payload(request): Payload<PasswordReset>,
) -> Result<impl IntoResponse, AppError> {
    if request.new_password != request.confirm_password {
        return Err(AppError::invalid("Passwords do not match"));
    }

    let email = request.email.trim().to_lowercase();
    let code = request.code.trim();

    if let Some(account) = holder_of_code::<Adventurer>(&state.database, &email, code).await? {
        replace_password(&state, account, request.new_password).await?;
    } else if let Some(account) = holder_of_code::<Company>(&state.database, &email, code).await? {
        replace_password(&state, account, request.new_password).await?;
    } else {
        return Err(AppError::invalid("Invalid email or reset code"));
    }

    Ok(Json(json!({
        "status": "success",
        "message": "Password has been updated successfully",
    })))
}
