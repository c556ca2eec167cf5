//! Unmarshal configuration

use serde::{Deserialize, Serialize};

/// Options controlling how a card dump is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnmarshalOptions {
    /// Abort on the first elementary file that fails to decode. When
    /// false the block is kept raw and the failure is listed in the
    /// document's issues.
    pub strict: bool,
    /// Keep each record's originating bytes for canvas encoding
    pub preserve_raw_data: bool,
}

impl Default for UnmarshalOptions {
    fn default() -> Self {
        Self {
            strict: true,
            preserve_raw_data: true,
        }
    }
}

impl UnmarshalOptions {
    pub fn lenient() -> Self {
        Self {
            strict: false,
            ..Self::default()
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_preserve_raw_data(mut self, preserve_raw_data: bool) -> Self {
        self.preserve_raw_data = preserve_raw_data;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = UnmarshalOptions::default();
        assert!(options.strict);
        assert!(options.preserve_raw_data);
        assert!(!UnmarshalOptions::lenient().strict);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let options: UnmarshalOptions = serde_json::from_str(r#"{"strict": false}"#).unwrap();
        assert_eq!(options, UnmarshalOptions::default().with_strict(false));
    }
}
