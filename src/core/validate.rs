//! Payload validation.
//!
//! Every write payload implements [`Validate`]; resource managers call it
//! before touching the database so malformed input never reaches storage.

use crate::errors::{Error, Result};
use regex::Regex;
use std::net::IpAddr;
use std::sync::LazyLock;

static MAC_ADDRESS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]{2}([:-][0-9A-Fa-f]{2}){5}$").ok());

static EMAIL_ADDRESS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// Longest value accepted in a plain string column.
pub const MAX_FIELD_LENGTH: usize = 255;

/// A payload that can check itself before it is written.
pub trait Validate {
    /// Returns a `Validation` error describing the first problem found.
    fn validate(&self) -> Result<()>;
}

/// Rejects empty or whitespace-only values and values over [`MAX_FIELD_LENGTH`].
pub fn required(entity: &'static str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid(entity, format!("{field} cannot be empty")));
    }
    max_length(entity, field, value)
}

pub fn max_length(entity: &'static str, field: &str, value: &str) -> Result<()> {
    if value.chars().count() > MAX_FIELD_LENGTH {
        return Err(Error::invalid(
            entity,
            format!("{field} must be at most {MAX_FIELD_LENGTH} characters"),
        ));
    }
    Ok(())
}

/// Checks an optional string column; `None` always passes.
pub fn optional(entity: &'static str, field: &str, value: Option<&str>) -> Result<()> {
    value.map_or(Ok(()), |v| max_length(entity, field, v))
}

pub fn ip_address(entity: &'static str, field: &str, value: &str) -> Result<()> {
    value
        .trim()
        .parse::<IpAddr>()
        .map(|_| ())
        .map_err(|_| Error::invalid(entity, format!("{field} '{value}' is not an IP address")))
}

pub fn optional_ip_address(entity: &'static str, field: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) if !v.trim().is_empty() => ip_address(entity, field, v),
        _ => Ok(()),
    }
}

pub fn optional_mac_address(entity: &'static str, field: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) if !v.trim().is_empty() => matches_pattern(&MAC_ADDRESS, v.trim())
            .then_some(())
            .ok_or_else(|| Error::invalid(entity, format!("{field} '{v}' is not a MAC address"))),
        _ => Ok(()),
    }
}

pub fn email(entity: &'static str, field: &str, value: &str) -> Result<()> {
    required(entity, field, value)?;
    if matches_pattern(&EMAIL_ADDRESS, value) {
        Ok(())
    } else {
        Err(Error::invalid(
            entity,
            format!("{field} '{value}' is not an e-mail address"),
        ))
    }
}

pub fn optional_email(entity: &'static str, field: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) if !v.trim().is_empty() => email(entity, field, v),
        _ => Ok(()),
    }
}

/// Rejects negative, NaN and infinite values.
pub fn non_negative(entity: &'static str, field: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(Error::invalid(
            entity,
            format!("{field} must be a non-negative number"),
        )),
        _ => Ok(()),
    }
}

fn matches_pattern(pattern: &LazyLock<Option<Regex>>, value: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        assert!(required("device", "name", "murakami0").is_ok());
        assert!(matches!(
            required("device", "name", "   "),
            Err(Error::Validation { entity: "device", .. })
        ));
        assert!(required("device", "name", &"x".repeat(MAX_FIELD_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_ip_addresses() {
        assert!(ip_address("network", "ips", "1.1.1.1").is_ok());
        assert!(ip_address("network", "ips", "2001:db8::1").is_ok());
        assert!(ip_address("network", "ips", "1.1.1").is_err());
        assert!(optional_ip_address("device", "ip", None).is_ok());
        assert!(optional_ip_address("device", "ip", Some("")).is_ok());
        assert!(optional_ip_address("device", "ip", Some("not-an-ip")).is_err());
    }

    #[test]
    fn test_mac_addresses() {
        assert!(optional_mac_address("device", "mac", Some("ab:bc:cd:de:ef:01")).is_ok());
        assert!(optional_mac_address("device", "mac", Some("AB-BC-CD-DE-EF-01")).is_ok());
        assert!(optional_mac_address("device", "mac", Some("ab:bc:cd")).is_err());
        assert!(optional_mac_address("device", "mac", None).is_ok());
    }

    #[test]
    fn test_emails() {
        assert!(email("user", "email", "staff@mlk.example.org").is_ok());
        assert!(email("user", "email", "staff.example.org").is_err());
        assert!(optional_email("library", "it_contact_email", None).is_ok());
    }

    #[test]
    fn test_non_negative() {
        assert!(non_negative("network", "contracted_speed_upload", Some(10.0)).is_ok());
        assert!(non_negative("network", "contracted_speed_upload", Some(-1.0)).is_err());
        assert!(non_negative("network", "contracted_speed_upload", Some(f64::NAN)).is_err());
        assert!(non_negative("network", "contracted_speed_upload", None).is_ok());
    }
}
