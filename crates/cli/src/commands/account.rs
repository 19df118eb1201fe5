//! Sign-in and registration commands.

#![allow(clippy::print_stdout)]

use lumina_core::Email;
use lumina_storefront::api::{LoginResponse, Registration};
use lumina_storefront::error::AppError;
use secrecy::SecretString;

use super::Context;

pub async fn login(ctx: &Context, email: &str, password: String) -> Result<(), AppError> {
    let email: Email = email.parse()?;
    let response = ctx
        .api
        .login(&email, &SecretString::from(password))
        .await?;
    store_session(ctx, &response)
}

pub async fn login_with_google(ctx: &Context, access_token: String) -> Result<(), AppError> {
    let response = ctx
        .api
        .login_with_google(&SecretString::from(access_token))
        .await?;
    store_session(ctx, &response)
}

pub fn logout(ctx: &Context) -> Result<(), AppError> {
    ctx.tokens().clear()?;
    println!("Signed out");
    Ok(())
}

pub async fn register(
    ctx: &Context,
    first_name: String,
    last_name: String,
    email: &str,
    password: String,
) -> Result<(), AppError> {
    if first_name.trim().is_empty() || last_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "First and last name are required".to_string(),
        ));
    }

    let registration = Registration {
        first_name,
        last_name,
        email: email.parse()?,
        password: SecretString::from(password),
    };
    ctx.api.register(&registration).await?;
    println!("Account created for {}, sign in with `lumina login`", registration.email);
    Ok(())
}

fn store_session(ctx: &Context, response: &LoginResponse) -> Result<(), AppError> {
    ctx.tokens().set(&response.token)?;
    tracing::info!(role = ?response.role, "Signed in");
    println!(
        "{}",
        response.message.as_deref().unwrap_or("Signed in")
    );
    Ok(())
}
