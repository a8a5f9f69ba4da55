//! Password sign-in.

use crate::commands::{print_field_errors, prompt_line};
use crate::config::Config;
use anyhow::bail;
use form_schema::SignInForm;
use identity_client::IdentityClient;

pub async fn signin(config: &Config) -> anyhow::Result<()> {
    let email = prompt_line("Email: ")?;
    let password = rpassword::prompt_password("Password: ")?;

    let form = SignInForm {
        email: email.clone(),
        password: password.clone(),
    };
    if let Err(errors) = form.validate() {
        eprintln!("Please fix the following:");
        print_field_errors(&errors);
        bail!("sign-in form is invalid");
    }

    let identity = IdentityClient::new(&config.identity_url, &config.identity_key);
    let outcome = identity.sign_in(&email, &password).await?;

    let Some(session_id) = outcome.created_session_id else {
        bail!("sign-in incomplete (status: {})", outcome.status);
    };

    match identity.session_token(&session_id).await? {
        Some(token) => {
            println!("Signed in as {}.", email);
            println!("Session token: {}", token);
        }
        None => {
            println!("Signed in as {}, but no session token was issued.", email);
        }
    }
    Ok(())
}
