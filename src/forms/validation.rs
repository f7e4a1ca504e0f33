//! Field rules and error bookkeeping shared by every form.
//!
//! Rules follow the usual form-library semantics: only `Required` and
//! `MustAccept` fail on an empty value, every other rule passes it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::error::ApiError;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("Invalid email pattern")
});

/// E.164-style number, optional leading `+`.
static INTERNATIONAL_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("Invalid phone pattern"));

/// At least ten digits, spaces, dashes or parentheses.
static CONTACT_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[0-9\s\-\(\)]{10,}$").expect("Invalid phone pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    InternationalPhone,
    ContactPhone,
}

impl Pattern {
    fn regex(&self) -> &'static Regex {
        match self {
            Pattern::InternationalPhone => &INTERNATIONAL_PHONE,
            Pattern::ContactPhone => &CONTACT_PHONE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLength(usize),
    Email,
    Pattern(Pattern),
    Min(i64),
    Max(i64),
}

/// The first rule a field breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Required,
    MinLength(usize),
    Email,
    Pattern,
    Min(i64),
    Max(i64),
    MustAccept,
    PasswordMismatch,
}

impl FieldError {
    /// User-facing text for a field shown as `label`.
    pub fn message(&self, label: &str) -> String {
        match self {
            FieldError::Required => format!("{} is required", label),
            FieldError::MinLength(n) => format!("{} must be at least {} characters", label, n),
            FieldError::Email => "Please enter a valid email address".to_string(),
            FieldError::Pattern => "Please enter a valid phone number".to_string(),
            FieldError::Min(n) => format!("{} must be at least {}", label, n),
            FieldError::Max(n) => format!("{} must be at most {}", label, n),
            FieldError::MustAccept => "You must accept the terms and conditions".to_string(),
            FieldError::PasswordMismatch => "Passwords do not match".to_string(),
        }
    }
}

/// Checks `value` against `rules` in order.
pub fn check(value: &str, rules: &[Rule]) -> Option<FieldError> {
    let trimmed = value.trim();
    for rule in rules {
        let failed = match rule {
            Rule::Required => value.is_empty().then_some(FieldError::Required),
            _ if value.is_empty() => None,
            Rule::MinLength(n) => (value.chars().count() < *n).then_some(FieldError::MinLength(*n)),
            Rule::Email => (!EMAIL.is_match(value)).then_some(FieldError::Email),
            Rule::Pattern(p) => (!p.regex().is_match(value)).then_some(FieldError::Pattern),
            Rule::Min(n) => match trimmed.parse::<i64>() {
                Ok(v) if v >= *n => None,
                _ => Some(FieldError::Min(*n)),
            },
            Rule::Max(n) => match trimmed.parse::<i64>() {
                Ok(v) if v > *n => Some(FieldError::Max(*n)),
                _ => None,
            },
        };
        if failed.is_some() {
            return failed;
        }
    }
    None
}

/// Errors keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the first error for `field`; later ones are ignored.
    pub fn add(&mut self, field: &'static str, error: FieldError) {
        self.fields.entry(field).or_insert(error);
    }

    pub fn check(&mut self, field: &'static str, value: &str, rules: &[Rule]) {
        if let Some(error) = check(value, rules) {
            self.add(field, error);
        }
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, error) in other.fields {
            self.add(field, error);
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldError)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self.iter().map(|(field, error)| error.message(field)).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Fields the user has interacted with. Errors are only shown for these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Touched {
    fields: BTreeSet<&'static str>,
}

impl Touched {
    pub fn mark(&mut self, field: &'static str) {
        self.fields.insert(field);
    }

    pub fn mark_all(&mut self, fields: &[&'static str]) {
        self.fields.extend(fields.iter().copied());
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// The message to display for `field`, if it is touched and invalid.
    pub fn visible_error(&self, errors: &ValidationErrors, field: &'static str, label: &str) -> Option<String> {
        if !self.is_touched(field) {
            return None;
        }
        errors.get(field).map(|e| e.message(label))
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("Please fill all required fields correctly.")]
    Invalid(ValidationErrors),
    #[error("You do not have permission to perform this action")]
    PermissionDenied,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<ValidationErrors> for FormError {
    fn from(errors: ValidationErrors) -> Self {
        FormError::Invalid(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_rules_pass_empty_values() {
        assert_eq!(check("", &[Rule::MinLength(2), Rule::Email]), None);
        assert_eq!(check("", &[Rule::Required, Rule::MinLength(2)]), Some(FieldError::Required));
        assert_eq!(check("a", &[Rule::Required, Rule::MinLength(2)]), Some(FieldError::MinLength(2)));
    }

    #[test]
    fn test_email_and_phone_patterns() {
        assert_eq!(check("ops@clozzet.test", &[Rule::Email]), None);
        assert_eq!(check("not-an-email", &[Rule::Email]), Some(FieldError::Email));

        let intl = [Rule::Pattern(Pattern::InternationalPhone)];
        assert_eq!(check("+14155550123", &intl), None);
        assert_eq!(check("0123", &intl), Some(FieldError::Pattern));

        let contact = [Rule::Pattern(Pattern::ContactPhone)];
        assert_eq!(check("(415) 555-0123", &contact), None);
        assert_eq!(check("555-0123", &contact), Some(FieldError::Pattern));
    }

    #[test]
    fn test_numeric_bounds() {
        let rules = [Rule::Required, Rule::Min(1), Rule::Max(10_000)];
        assert_eq!(check("0", &rules), Some(FieldError::Min(1)));
        assert_eq!(check("10001", &rules), Some(FieldError::Max(10_000)));
        assert_eq!(check("250", &rules), None);
    }

    #[test]
    fn test_touched_gates_visible_errors() {
        let mut errors = ValidationErrors::new();
        errors.check("firstName", "", &[Rule::Required]);
        let mut touched = Touched::default();
        assert_eq!(touched.visible_error(&errors, "firstName", "First name"), None);
        touched.mark("firstName");
        assert_eq!(
            touched.visible_error(&errors, "firstName", "First name").as_deref(),
            Some("First name is required")
        );
    }
}
