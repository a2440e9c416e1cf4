use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid EVM address format: {0}")]
    InvalidEvmAddress(String),
}

/// Canonical form used for every address comparison and cache key.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

pub fn validate_evm_address(address: &str) -> Result<(), ValidationError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingParameter("address".to_string()));
    }

    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| ValidationError::InvalidEvmAddress(trimmed.to_string()))?;

    // 20 bytes
    match hex::decode(body) {
        Ok(bytes) if bytes.len() == 20 => Ok(()),
        _ => Err(ValidationError::InvalidEvmAddress(trimmed.to_string())),
    }
}
