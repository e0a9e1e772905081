//! Creation-parameter validation.
//!
//! Runs before any provider call; the provider must never see invalid
//! input. All failures are accumulated into one list of human-readable
//! reasons rather than stopping at the first.

use crate::error::CoreError;
use crate::job::CreateJobParams;

/// Models accepted for generation.
pub const VALID_MODELS: &[&str] = &["sora-2", "sora-2-pro"];

/// Clip lengths (seconds) the provider accepts. Out-of-set values are
/// rejected, never coerced to a nearby legal value.
pub const VALID_SECONDS: &[u32] = &[4, 8, 12];

/// Submission parameters that passed validation.
#[derive(Debug, Clone)]
pub struct ValidParams {
    pub prompt: String,
    pub model: String,
    pub size: String,
    pub seconds: u32,
}

/// Validate raw submission parameters.
///
/// Returns the typed parameters on success, or
/// [`CoreError::Validation`] carrying every failed check.
pub fn validate_params(params: &CreateJobParams) -> Result<ValidParams, CoreError> {
    let mut reasons = Vec::new();

    let prompt = params.prompt.trim();
    if prompt.is_empty() {
        reasons.push("prompt must not be empty".to_string());
    }

    if !VALID_MODELS.contains(&params.model.as_str()) {
        reasons.push(format!(
            "model '{}' is not supported. Must be one of: {}",
            params.model,
            VALID_MODELS.join(", ")
        ));
    }

    if parse_size(&params.size).is_none() {
        reasons.push(format!(
            "size '{}' is invalid. Expected WIDTHxHEIGHT, e.g. 1280x720",
            params.size
        ));
    }

    let seconds = match params.seconds.trim().parse::<u32>() {
        Ok(value) if VALID_SECONDS.contains(&value) => Some(value),
        _ => {
            reasons.push(format!(
                "seconds '{}' is invalid. Must be one of: {}",
                params.seconds,
                VALID_SECONDS
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
            None
        }
    };

    if !reasons.is_empty() {
        return Err(CoreError::Validation(reasons));
    }

    Ok(ValidParams {
        prompt: prompt.to_string(),
        model: params.model.clone(),
        size: params.size.clone(),
        // reasons is empty, so the parse above succeeded
        seconds: seconds.unwrap(),
    })
}

/// Parse a `WIDTHxHEIGHT` size string into its dimensions.
pub fn parse_size(size: &str) -> Option<(u32, u32)> {
    let (width, height) = size.split_once('x')?;
    let width: u32 = width.parse().ok()?;
    let height: u32 = height.parse().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}
