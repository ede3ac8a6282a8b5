//! Account commands.

use clap::Args;
use secrecy::SecretString;
use volt_core::ProductId;
use volt_storefront::api::types::{
    ChangePasswordRequest, RegisterRequest, UpdateUserDataRequest, User,
};
use volt_storefront::validation::{
    validate_change_password, validate_login, validate_rating, validate_register,
    validate_update_user,
};
use volt_storefront::{AppError, AppState, Result};

/// Details of a new account.
#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(short, long)]
    username: String,

    #[arg(short, long)]
    email: String,

    #[arg(short, long)]
    password: String,

    /// Repeat the password
    #[arg(long)]
    confirm_password: String,

    /// Avatar image URL
    #[arg(long)]
    image: String,
}

impl From<RegisterArgs> for RegisterRequest {
    fn from(args: RegisterArgs) -> Self {
        Self {
            username: args.username,
            email: args.email,
            password: args.password,
            confirm_password: args.confirm_password,
            image: args.image,
        }
    }
}

/// New password, entered twice.
#[derive(Debug, Args)]
pub struct PasswordArgs {
    /// Current password
    #[arg(long)]
    old_password: String,

    #[arg(long)]
    new_password: String,

    /// Repeat the new password
    #[arg(long)]
    confirm_password: String,
}

impl PasswordArgs {
    fn to_request(&self, username: &str) -> ChangePasswordRequest {
        ChangePasswordRequest {
            username: username.to_string(),
            old_password: self.old_password.clone(),
            new_password: self.new_password.clone(),
            confirm_new_password: self.confirm_password.clone(),
        }
    }
}

/// Account fields to change. Omitted fields keep their current value.
#[derive(Debug, Args)]
pub struct UpdateAccountArgs {
    #[arg(short, long)]
    username: Option<String>,

    #[arg(short, long)]
    email: Option<String>,

    /// Avatar image URL
    #[arg(long)]
    image: Option<String>,
}

impl UpdateAccountArgs {
    fn to_request(&self, user: &User) -> UpdateUserDataRequest {
        UpdateUserDataRequest {
            old_username: user.username.clone(),
            new_username: self.username.clone().unwrap_or_else(|| user.username.clone()),
            email: self.email.clone().unwrap_or_else(|| user.email.clone()),
            user_image: self.image.clone().unwrap_or_else(|| user.user_image.clone()),
        }
    }

    const fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.image.is_none()
    }
}

#[allow(clippy::print_stdout)]
pub async fn login(app: &mut AppState, username: &str, password: String) -> Result<()> {
    validate_login(username, &password)?;
    let password = SecretString::from(password);

    let token = app.api().login(username, &password).await?;
    app.session_mut().login(token)?;

    println!("Logged in as {username}.");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn logout(app: &mut AppState) -> Result<()> {
    app.session_mut().logout()?;
    println!("Logged out.");
    Ok(())
}

/// Create the account, then log in with it.
#[allow(clippy::print_stdout)]
pub async fn register(app: &mut AppState, args: RegisterArgs) -> Result<()> {
    let request = RegisterRequest::from(args);
    validate_register(&request)?;

    let user = app.api().register(&request).await?;
    println!("Account {} created.", user.username);

    let password = SecretString::from(request.password);
    let token = app.api().login(&request.username, &password).await?;
    app.session_mut().login(token)?;

    println!("Logged in as {}.", request.username);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn whoami(app: &AppState) -> Result<()> {
    let user = app.api().current_user(&app.token()?).await?;
    let role = if user.is_admin() { " (admin)" } else { "" };
    println!("{} <{}>{role}", user.username, user.email);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn change_password(app: &AppState, args: &PasswordArgs) -> Result<()> {
    let token = app.token()?;
    let user = app.api().current_user(&token).await?;

    let request = args.to_request(&user.username);
    validate_change_password(&request)?;

    app.api().change_password(&token, &request).await?;
    println!("Password changed.");
    Ok(())
}

/// Change account data. The token names the old username, so the session
/// ends and the user has to log in again.
#[allow(clippy::print_stdout)]
pub async fn update(app: &mut AppState, args: &UpdateAccountArgs) -> Result<()> {
    if args.is_empty() {
        return Err(AppError::BadRequest(
            "Nothing to update; pass --username, --email or --image".to_string(),
        ));
    }

    let token = app.token()?;
    let user = app.api().current_user(&token).await?;

    let request = args.to_request(&user);
    validate_update_user(&request)?;

    let updated = app.api().update_user(&token, &request).await?;
    app.session_mut().logout()?;

    println!("Account {} updated. Log in again to continue.", updated.username);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn rate(app: &AppState, product_id: ProductId, rating: u8, update: bool) -> Result<()> {
    let rating = validate_rating(rating)?;
    let token = app.token()?;

    let saved = if update {
        app.api().update_rating(&token, product_id, rating).await?
    } else {
        app.api().post_rating(&token, product_id, rating).await?
    };

    println!("Rated product #{} {} / 5.", saved.product_id, saved.rating);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn show_rating(app: &AppState, product_id: ProductId) -> Result<()> {
    match app.api().fetch_rating(&app.token()?, product_id).await {
        Ok(rating) => println!("Your rating of product #{product_id}: {} / 5", rating.rating),
        Err(e) if e.is_not_found() => println!("You have not rated product #{product_id}."),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
