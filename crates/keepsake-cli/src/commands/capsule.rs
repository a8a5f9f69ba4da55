//! Memory capsule commands.

use crate::commands::print_field_errors;
use crate::config::Config;
use anyhow::{bail, Context};
use backend_client::{BackendClient, NewCapsule};
use chrono::{DateTime, NaiveDate, Utc};
use form_schema::MemoryForm;

/// Parse a `YYYY-MM-DD` capture date, defaulting to now.
fn parse_date(date: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    match date {
        None => Ok(Utc::now()),
        Some(raw) => {
            let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", raw))?;
            let midnight = day
                .and_hms_opt(0, 0, 0)
                .context("date out of range")?;
            Ok(midnight.and_utc())
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn capsule_create(
    config: &Config,
    token: &str,
    title: String,
    description: String,
    location: Option<String>,
    date: Option<String>,
    tags: Option<String>,
    notes: Option<String>,
) -> anyhow::Result<()> {
    let date = parse_date(date.as_deref())?;
    let form = MemoryForm {
        title,
        description,
        location,
        date,
        tags,
        notes,
    };
    if let Err(errors) = form.validate() {
        eprintln!("Please fix the following:");
        print_field_errors(&errors);
        bail!("capsule form is invalid");
    }

    let capsule = NewCapsule {
        title: form.title,
        description: form.description,
        location: form.location,
        date: form.date,
        tags: form.tags,
        notes: form.notes,
    };

    let backend = BackendClient::new(&config.api_url);
    let receipt = backend.create_capsule(&capsule, token).await?;
    println!("Capsule created: {}", receipt.id);
    if let Some(message) = receipt.message {
        println!("{}", message);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_date_defaults_to_now() {
        assert!(parse_date(None).is_ok());
    }

    #[test]
    fn test_parse_date_accepts_iso_day() {
        let parsed = parse_date(Some("2025-12-24")).unwrap();
        assert_eq!(parsed.year(), 2025);
        assert_eq!(parsed.month(), 12);
        assert_eq!(parsed.day(), 24);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date(Some("yesterday")).is_err());
    }
}
