//! Field validation shared by forms and the API boundary.
//!
//! Validation is structural (no regex engine): each rule is a small check
//! over the raw string. Form-level helpers return the user-facing Spanish
//! message for a single field; payload types collect every failing field
//! into a list of [`FieldError`]s via [`Issues`].

use serde::Serialize;
use thiserror::Error;

/// A single failed field with its user-facing message.
///
/// Serialized into the `details` array of a `400 Datos inválidos` response.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Accumulates field errors so a validator can report all of them at once
/// instead of stopping at the first.
#[derive(Debug, Default)]
pub struct Issues {
    errors: Vec<FieldError>,
}

impl Issues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed field.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Record the outcome of a single-field helper, if it failed.
    pub fn check(&mut self, field: impl Into<String>, result: Result<(), String>) {
        if let Err(message) = result {
            self.push(field, message);
        }
    }

    /// `Ok(())` when no field failed, otherwise every collected error.
    pub fn into_result(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

// ==========================================
// Single-field helpers (form-level rules)
// ==========================================

/// Required field: present and not just whitespace.
pub fn required(label: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{label} es requerido"));
    }
    Ok(())
}

/// Email for forms: required, then `local@domain.tld` shape with no
/// whitespace anywhere.
pub fn email(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("El email es requerido".to_owned());
    }
    if !has_email_shape(value) {
        return Err("El email ingresado no es válido".to_owned());
    }
    Ok(())
}

/// Optional URL, with or without an `http(s)://` protocol. Empty input is
/// valid: an unset link just hides its icon.
pub fn optional_url(label: &str, value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    if has_url_shape(trimmed) {
        Ok(())
    } else {
        Err(format!("La {label} ingresada no es válida"))
    }
}

/// Phone/WhatsApp number: required, and at least 10 digits once spaces,
/// dashes, and parentheses are ignored.
pub fn phone(label: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("El {label} es requerido"));
    }
    let digits = value.chars().filter(char::is_ascii_digit).count();
    if digits < 10 {
        return Err(format!("El {label} debe tener al menos 10 dígitos"));
    }
    Ok(())
}

/// Password: required and at least 6 characters.
pub fn password(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("La contraseña es requerida".to_owned());
    }
    if value.len() < 6 {
        return Err("La contraseña debe tener al menos 6 caracteres".to_owned());
    }
    Ok(())
}

/// Maximum length in characters.
pub fn max_length(label: &str, value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("{label} no puede tener más de {max} caracteres"));
    }
    Ok(())
}

// ==========================================
// Structural checks
// ==========================================

/// Strict email shape used for login credentials: ASCII local part of
/// `[a-z0-9._%+-]`, one `@`, a host, and an alphabetic TLD of at least two
/// characters.
#[must_use]
pub fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
    {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// Loose email shape used for form fields: non-empty local and domain, a
/// dot somewhere in the domain, and no whitespace or second `@`.
fn has_email_shape(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    if domain.contains('@') || domain.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// `domain.tld`, `www.domain.tld/path`, optionally behind `http(s)://`.
fn has_url_shape(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .unwrap_or(value);

    let (host, path) = match rest.split_once('/') {
        Some((host, path)) => (host, Some(path)),
        None => (rest, None),
    };

    let mut labels = host.split('.');
    let label_ok = |label: &str| {
        !label.is_empty()
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    };
    // At least two dot-separated labels ("dominio.com").
    let Some(first) = labels.next() else {
        return false;
    };
    let mut count = 1;
    if !label_ok(first) {
        return false;
    }
    for label in labels {
        if !label_ok(label) {
            return false;
        }
        count += 1;
    }
    if count < 2 {
        return false;
    }

    path.is_none_or(|p| {
        p.chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./?%&=".contains(c))
    })
}
