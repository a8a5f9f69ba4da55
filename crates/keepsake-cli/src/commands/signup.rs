//! Interactive sign-up: credentials, email code verification, backend
//! registration.

use crate::commands::{print_field_errors, prompt_line};
use crate::config::Config;
use anyhow::bail;
use backend_client::BackendClient;
use form_schema::SignUpForm;
use identity_client::IdentityClient;
use otp_input::CellView;
use signup_flow::{FlowError, FlowState, SignUpController};
use tracing::debug;

fn render_cells(cells: &[CellView]) -> String {
    cells
        .iter()
        .map(|cell| match cell.digit {
            Some(d) => format!("[{}]", d),
            None => "[ ]".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_flow_error(error: &FlowError) {
    eprintln!("Error: {}", error);
}

pub async fn signup(config: &Config) -> anyhow::Result<()> {
    println!("Create your Keepsake account.");
    println!();

    let full_name = prompt_line("Full name: ")?;
    let email = prompt_line("Email: ")?;
    let password = rpassword::prompt_password("Password: ")?;
    let confirm_password = rpassword::prompt_password("Confirm password: ")?;

    let form = SignUpForm {
        full_name: full_name.clone(),
        email: email.clone(),
        password: password.clone(),
        confirm_password,
    };
    if let Err(errors) = form.validate() {
        eprintln!("Please fix the following:");
        print_field_errors(&errors);
        bail!("sign-up form is invalid");
    }

    let identity = IdentityClient::new(&config.identity_url, &config.identity_key);
    let backend = BackendClient::new(&config.api_url);
    let controller = SignUpController::new(identity, backend);

    println!();
    println!("Submitting...");
    if let Err(error) = controller
        .submit_credentials(&full_name, &email, &password)
        .await
    {
        print_flow_error(&error);
        bail!("sign-up was not accepted");
    }

    println!("A verification code was sent to {}.", email);
    println!("Enter the code, or: resend, back, quit");

    loop {
        match controller.state() {
            FlowState::Done => {
                println!();
                println!("Account created. Welcome to Keepsake!");
                return Ok(());
            }
            FlowState::Failed => {
                let recoverable = controller
                    .last_error()
                    .map(|e| e.is_recoverable())
                    .unwrap_or(false);
                if !recoverable {
                    bail!("sign-up cannot continue; please start over");
                }
                println!("Registration failed. Enter: retry, back, quit");
                match prompt_line("> ")?.as_str() {
                    "retry" => {
                        if let Err(error) = controller.retry_registration().await {
                            print_flow_error(&error);
                        }
                    }
                    "back" => {
                        controller.back_to_credentials().ok();
                        bail!("sign-up abandoned; run `keepsake signup` to start over");
                    }
                    "quit" => bail!("sign-up abandoned"),
                    other => debug!(input = other, "unrecognized command"),
                }
            }
            _ => {
                println!();
                println!("  {}", render_cells(&controller.code_cells()));
                let input = prompt_line("> ")?;
                match input.as_str() {
                    "resend" => {
                        if let Err(error) = controller.resend_code().await {
                            print_flow_error(&error);
                        } else {
                            println!("A new code was sent to {}.", email);
                        }
                    }
                    "back" => {
                        controller.back_to_credentials().ok();
                        bail!("sign-up abandoned; run `keepsake signup` to start over");
                    }
                    "quit" => bail!("sign-up abandoned"),
                    digits if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
                        controller.set_code(digits);
                        if controller.code_is_full() {
                            println!("Verifying...");
                            if let Err(error) = controller.submit_code().await {
                                print_flow_error(&error);
                            }
                        }
                    }
                    other => {
                        if !other.is_empty() {
                            eprintln!("Unrecognized input; enter digits, resend, back, or quit.");
                        }
                    }
                }
            }
        }
    }
}
