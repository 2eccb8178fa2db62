//! TemplateAddress - Two-level (category, name) template key

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

const MAX_SEGMENT_LEN: usize = 128;

/// Address of a template: `{category}/{name}`
///
/// Both segments double as path components on disk, so they are restricted
/// to a conservative character set and may not start with a dot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTemplateAddress")]
pub struct TemplateAddress {
    category: String,
    name: String,
}

/// Unchecked wire form, validated on the way in
#[derive(Deserialize)]
struct RawTemplateAddress {
    category: String,
    name: String,
}

impl TryFrom<RawTemplateAddress> for TemplateAddress {
    type Error = DomainError;

    fn try_from(raw: RawTemplateAddress) -> Result<Self, Self::Error> {
        Self::new(raw.category, raw.name)
    }
}

impl TemplateAddress {
    /// Build a validated address
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Result<Self, DomainError> {
        let category = category.into();
        let name = name.into();
        validate_segment("category", &category)?;
        validate_segment("name", &name)?;
        Ok(Self { category, name })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for TemplateAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.category, self.name)
    }
}

impl std::str::FromStr for TemplateAddress {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((category, name)) => Self::new(category, name),
            None => Err(DomainError::Validation(format!(
                "Template address must be <category>/<name>: {}",
                s
            ))),
        }
    }
}

fn validate_segment(label: &str, value: &str) -> Result<(), DomainError> {
    if value.is_empty() {
        return Err(DomainError::Validation(format!(
            "Template {} must not be empty",
            label
        )));
    }
    if value.len() > MAX_SEGMENT_LEN {
        return Err(DomainError::Validation(format!(
            "Template {} exceeds {} characters",
            label, MAX_SEGMENT_LEN
        )));
    }
    if value.starts_with('.') {
        return Err(DomainError::Validation(format!(
            "Template {} must not start with '.': {}",
            label, value
        )));
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(DomainError::Validation(format!(
            "Template {} contains invalid character {:?}: {}",
            label, bad, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_address() {
        let addr = TemplateAddress::new("examples", "code-review_v2.1").unwrap();
        assert_eq!(addr.category(), "examples");
        assert_eq!(addr.name(), "code-review_v2.1");
        assert_eq!(addr.to_string(), "examples/code-review_v2.1");
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = TemplateAddress::new("custom", "").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_path_traversal_rejected() {
        assert!(TemplateAddress::new("..", "x").is_err());
        assert!(TemplateAddress::new("custom", "../etc").is_err());
        assert!(TemplateAddress::new("custom", "a/b").is_err());
        assert!(TemplateAddress::new("custom", ".hidden").is_err());
    }

    #[test]
    fn test_deserialize_validates_segments() {
        let addr: TemplateAddress =
            serde_json::from_str(r#"{"category":"custom","name":"greeting"}"#).unwrap();
        assert_eq!(addr.to_string(), "custom/greeting");

        assert!(
            serde_json::from_str::<TemplateAddress>(r#"{"category":"..","name":"passwd"}"#)
                .is_err()
        );
        assert!(
            serde_json::from_str::<TemplateAddress>(r#"{"category":"custom","name":""}"#).is_err()
        );
    }

    #[test]
    fn test_parse_from_str() {
        let addr: TemplateAddress = "custom/greeting".parse().unwrap();
        assert_eq!(addr.category(), "custom");
        assert_eq!(addr.name(), "greeting");
        assert!("no-slash".parse::<TemplateAddress>().is_err());
    }
}
