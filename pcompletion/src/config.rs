//! Client configuration validated once at construction.
//!
//! ```rust
//! use pcompletion::ClientConfig;
//!
//! let config = ClientConfig::new("pm-4").validated().expect("defaults should be valid");
//! assert_eq!(config.temperature, 0.7);
//! ```

use pcommon::SamplingOptions;

use crate::CompletionError;

pub const MIN_TEMPERATURE: f32 = 0.0;
pub const MAX_TEMPERATURE: f32 = 2.0;
pub const MAX_OUTPUT_TOKENS_LIMIT: u32 = 4096;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl ClientConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: 0.7,
            max_output_tokens: 1024,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Applies caller-supplied sampling overrides; unset fields keep the
    /// configured defaults.
    pub fn with_sampling(mut self, sampling: SamplingOptions) -> Self {
        if let Some(temperature) = sampling.temperature {
            self.temperature = temperature;
        }

        if let Some(max_output_tokens) = sampling.max_output_tokens {
            self.max_output_tokens = max_output_tokens;
        }

        self
    }

    pub fn validated(self) -> Result<Self, CompletionError> {
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), CompletionError> {
        if self.model.trim().is_empty() {
            return Err(CompletionError::config("model must not be empty"));
        }

        if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(CompletionError::config(format!(
                "temperature must be in the inclusive range {MIN_TEMPERATURE}..={MAX_TEMPERATURE}"
            )));
        }

        if self.max_output_tokens == 0 || self.max_output_tokens > MAX_OUTPUT_TOKENS_LIMIT {
            return Err(CompletionError::config(format!(
                "max_output_tokens must be in 1..={MAX_OUTPUT_TOKENS_LIMIT}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompletionErrorKind;

    #[test]
    fn defaults_validate() {
        assert!(ClientConfig::new("pm-4").validate().is_ok());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let blank = ClientConfig::new("  ");
        assert_eq!(
            blank.validate().expect_err("blank model should fail").kind,
            CompletionErrorKind::Config
        );

        let hot = ClientConfig::new("pm-4").with_temperature(2.5);
        assert!(hot.validate().is_err());

        let cold = ClientConfig::new("pm-4").with_temperature(-0.1);
        assert!(cold.validate().is_err());

        let zero = ClientConfig::new("pm-4").with_max_output_tokens(0);
        assert!(zero.validate().is_err());

        let oversized = ClientConfig::new("pm-4").with_max_output_tokens(4097);
        assert!(oversized.validate().is_err());
    }

    #[test]
    fn sampling_overrides_only_replace_set_fields() {
        let config = ClientConfig::new("pm-4")
            .with_sampling(SamplingOptions::default().with_temperature(0.1));

        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.max_output_tokens, 1024);
    }

    #[test]
    fn boundary_values_are_accepted() {
        assert!(
            ClientConfig::new("pm-4")
                .with_temperature(0.0)
                .with_max_output_tokens(1)
                .validate()
                .is_ok()
        );
        assert!(
            ClientConfig::new("pm-4")
                .with_temperature(2.0)
                .with_max_output_tokens(4096)
                .validate()
                .is_ok()
        );
    }
}
