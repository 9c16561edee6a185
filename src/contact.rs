//! Contact submission contract
//!
//! The site itself is read-only; the contact form is the one inbound
//! surface, and only its validation contract lives here. Delivery is the
//! deployment's problem.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex");
}

/// A contact form submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Validation failures, with user-facing messages
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ContactError {
    #[error("Name must be between 2 and 50 characters.")]
    Name,
    #[error("Please enter a valid email address.")]
    Email,
    #[error("Subject must be between 5 and 100 characters.")]
    Subject,
    #[error("Message must be between 10 and 1000 characters.")]
    Message,
}

impl ContactSubmission {
    /// Check all fields, returning every violated constraint
    pub fn validate(&self) -> Result<(), Vec<ContactError>> {
        let mut errors = Vec::new();

        if !within(&self.name, 2, 50) {
            errors.push(ContactError::Name);
        }
        if !EMAIL_RE.is_match(self.email.trim()) {
            errors.push(ContactError::Email);
        }
        if !within(&self.subject, 5, 100) {
            errors.push(ContactError::Subject);
        }
        if !within(&self.message, 10, 1000) {
            errors.push(ContactError::Message);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn within(value: &str, min: usize, max: usize) -> bool {
    let len = value.trim().chars().count();
    (min..=max).contains(&len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            subject: "About your projects".to_string(),
            message: "I would like to talk about a collaboration.".to_string(),
        }
    }

    #[test]
    fn test_valid_submission() {
        assert!(submission().validate().is_ok());
    }

    #[test]
    fn test_name_bounds() {
        let mut s = submission();
        s.name = "A".to_string();
        assert_eq!(s.validate().unwrap_err(), vec![ContactError::Name]);
        s.name = "x".repeat(51);
        assert_eq!(s.validate().unwrap_err(), vec![ContactError::Name]);
        s.name = "Al".to_string();
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_email_syntax() {
        let mut s = submission();
        for bad in ["not-an-email", "a@b", "a b@c.com", "@example.com"] {
            s.email = bad.to_string();
            assert_eq!(s.validate().unwrap_err(), vec![ContactError::Email], "{bad}");
        }
    }

    #[test]
    fn test_subject_and_message_bounds() {
        let mut s = submission();
        s.subject = "Hey".to_string();
        s.message = "Too short".to_string();
        let errors = s.validate().unwrap_err();
        assert!(errors.contains(&ContactError::Subject));
        assert!(errors.contains(&ContactError::Message));

        s.subject = "Hello there".to_string();
        s.message = "x".repeat(1001);
        assert_eq!(s.validate().unwrap_err(), vec![ContactError::Message]);
    }
}
