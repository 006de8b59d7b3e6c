//! Login, account creation and password reset forms

use atm_common::validators::{is_valid_email, validate_password};
use sqlx::SqlitePool;

use crate::db::users;
use crate::form::{required_text, FormData, FormErrors};
use crate::pages;

pub const PASSWORDS_DONT_MATCH: &str = "Passwords don't match";
pub const USERNAME_TAKEN: &str = "This username already exists";
pub const EMAIL_TAKEN: &str = "This email address is already connected to another account";
pub const INCORRECT_LOGIN: &str = "Incorrect login details";

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

pub fn validate_login(form: &FormData) -> Result<LoginInput, FormErrors> {
    let mut errors = FormErrors::new();
    let username = required_text(form, &mut errors, "username", None);
    let password = required_text(form, &mut errors, "password", None);

    if errors.is_empty() {
        Ok(LoginInput { username, password })
    } else {
        Err(errors)
    }
}

pub fn login_fields(form: &FormData, errors: &FormErrors) -> Vec<String> {
    vec![
        pages::input("Username", "username", "text", form, errors),
        pages::input("Password", "password", "password", form, errors),
    ]
}

/// New contributor account
#[derive(Debug, Clone)]
pub struct AccountInput {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Validate a sign-up, including username and email availability
pub async fn validate_account(
    pool: &SqlitePool,
    form: &FormData,
) -> sqlx::Result<Result<AccountInput, FormErrors>> {
    let mut errors = FormErrors::new();

    let username = required_text(form, &mut errors, "username", Some(150));
    if !username.is_empty() && users::username_exists(pool, &username).await? {
        errors.add("username", USERNAME_TAKEN);
    }

    let password = required_text(form, &mut errors, "password", None);
    if !password.is_empty() {
        if let Err(e) = validate_password(&password) {
            errors.add("password", e.to_string());
        }
    }
    let password2 = required_text(form, &mut errors, "password2", None);

    let first_name = required_text(form, &mut errors, "first_name", Some(150));
    let last_name = required_text(form, &mut errors, "last_name", Some(150));

    let email = required_text(form, &mut errors, "email", Some(254));
    if !email.is_empty() {
        if !is_valid_email(&email) {
            errors.add("email", "Enter a valid email address.");
        } else if users::email_exists(pool, &email).await? {
            errors.add("email", EMAIL_TAKEN);
        }
    }

    if password != password2 {
        errors.add_non_field(PASSWORDS_DONT_MATCH);
    }

    if errors.is_empty() {
        Ok(Ok(AccountInput {
            username,
            password,
            first_name,
            last_name,
            email,
        }))
    } else {
        Ok(Err(errors))
    }
}

pub fn account_fields(form: &FormData, errors: &FormErrors) -> Vec<String> {
    vec![
        pages::input("Username", "username", "text", form, errors),
        pages::input("Password", "password", "password", form, errors),
        pages::input("Repeat password", "password2", "password", form, errors),
        pages::input("First name", "first_name", "text", form, errors),
        pages::input("Last name", "last_name", "text", form, errors),
        pages::input("Email", "email", "email", form, errors),
    ]
}

/// New password; the strength policy is not applied here
pub fn validate_password_reset(form: &FormData) -> Result<String, FormErrors> {
    let mut errors = FormErrors::new();
    let new_password = required_text(form, &mut errors, "new_password", None);
    let new_password2 = required_text(form, &mut errors, "new_password2", None);

    if errors.is_empty() && new_password != new_password2 {
        errors.add_non_field(PASSWORDS_DONT_MATCH);
    }

    if errors.is_empty() {
        Ok(new_password)
    } else {
        Err(errors)
    }
}

pub fn password_reset_fields(form: &FormData, errors: &FormErrors) -> Vec<String> {
    vec![
        pages::input("Enter new password", "new_password", "password", form, errors),
        pages::input("Re-enter new password", "new_password2", "password", form, errors),
    ]
}
