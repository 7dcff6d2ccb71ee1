//! Password strength policy and username validation.

use std::sync::LazyLock;

use regex::Regex;

use parley_core::config::AuthConfig;
use parley_core::error::AppError;
use parley_core::result::AppResult;

/// Length at which the bonus point is awarded.
const BONUS_LENGTH: usize = 12;

/// Base rules, in the fixed order feedback is reported in.
const BASE_RULES: [Rule; 5] = [
    Rule::Length,
    Rule::Uppercase,
    Rule::Lowercase,
    Rule::Digit,
    Rule::Symbol,
];

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,20}$").expect("valid regex"));

/// A single strength rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Length,
    Uppercase,
    Lowercase,
    Digit,
    Symbol,
}

impl Rule {
    fn feedback(self, min_length: usize) -> String {
        match self {
            Rule::Length => format!("Use at least {min_length} characters"),
            Rule::Uppercase => "Add an uppercase letter".to_string(),
            Rule::Lowercase => "Add a lowercase letter".to_string(),
            Rule::Digit => "Add a digit".to_string(),
            Rule::Symbol => "Add a punctuation symbol".to_string(),
        }
    }

    fn missing_class(self) -> &'static str {
        match self {
            Rule::Length => "length",
            Rule::Uppercase => "uppercase",
            Rule::Lowercase => "lowercase",
            Rule::Digit => "digit",
            Rule::Symbol => "symbol",
        }
    }

    fn satisfied_by(self, password: &str, min_length: usize) -> bool {
        match self {
            Rule::Length => password.chars().count() >= min_length,
            Rule::Uppercase => password.chars().any(|c| c.is_uppercase()),
            Rule::Lowercase => password.chars().any(|c| c.is_lowercase()),
            Rule::Digit => password.chars().any(|c| c.is_ascii_digit()),
            Rule::Symbol => password.chars().any(|c| c.is_ascii_punctuation()),
        }
    }
}

/// Result of scoring a candidate password.
///
/// Deterministic: the same input always yields the same score and the same
/// ordered feedback list, so client hints stay stable.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StrengthReport {
    /// Points scored, 0 through 6 (five base rules plus a length bonus).
    pub score: u8,
    /// Unmet base rules, in fixed order: length, uppercase, lowercase,
    /// digit, symbol.
    pub feedback: Vec<String>,
    /// Whether all five base rules are satisfied (the bonus is not
    /// required).
    pub is_valid: bool,
}

/// Validates password strength against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// Minimum password length.
    min_length: usize,
}

impl PasswordPolicy {
    /// Creates a policy from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Scores a candidate password for client-side hints.
    pub fn score(&self, password: &str) -> StrengthReport {
        let mut score = 0u8;
        let mut feedback = Vec::new();

        for rule in BASE_RULES {
            if rule.satisfied_by(password, self.min_length) {
                score += 1;
            } else {
                feedback.push(rule.feedback(self.min_length));
            }
        }

        let is_valid = feedback.is_empty();

        if password.chars().count() >= BONUS_LENGTH {
            score += 1;
        }

        StrengthReport {
            score,
            feedback,
            is_valid,
        }
    }

    /// Server-side acceptance gate.
    ///
    /// Returns a single composite error naming every missing class, or
    /// `Ok(())` when the password satisfies all base rules.
    pub fn validate(&self, password: &str) -> AppResult<()> {
        let missing: Vec<&str> = BASE_RULES
            .iter()
            .filter(|rule| !rule.satisfied_by(password, self.min_length))
            .map(|rule| rule.missing_class())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::weak_password(format!(
                "Password is missing: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Validates a display username: 3-20 characters from `[A-Za-z0-9_-]`.
pub fn validate_username(username: &str) -> AppResult<()> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(AppError::invalid_format(
            "Username must be 3-20 characters from letters, digits, '_' or '-'",
        ))
    }
}
