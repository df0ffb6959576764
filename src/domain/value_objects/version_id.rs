use crate::domain::errors::ValidationError;

/// A unique identifier for an object version, assigned by the storage service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionId(String);

impl VersionId {
    /// Create a new VersionId with validation
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyVersionId);
        }

        if value.len() > 1024 {
            return Err(ValidationError::VersionIdTooLong {
                actual: value.len(),
                max: 1024,
            });
        }

        // Service-issued ids are opaque but stay within this alphabet
        for c in value.chars() {
            if !c.is_alphanumeric() && c != '-' && c != '_' && c != '.' {
                return Err(ValidationError::InvalidVersionIdCharacter(c));
            }
        }

        Ok(Self(value))
    }

    /// Get the version ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VersionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_version_id() {
        assert!(VersionId::new("v1.0.0".to_string()).is_ok());
        assert!(VersionId::new("550e8400-e29b-41d4-a716-446655440000".to_string()).is_ok());
        assert!(VersionId::new("2023-10-01_12-34-56".to_string()).is_ok());
    }

    #[test]
    fn test_invalid_version_id() {
        assert!(VersionId::new("".to_string()).is_err());
        assert!(VersionId::new("version with spaces".to_string()).is_err());
        assert!(VersionId::new("version/with/slashes".to_string()).is_err());
        assert!(VersionId::new("x".repeat(1025)).is_err());
    }
}
