//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URLs and contract addresses parse
//! - Validate value ranges (timeouts and intervals > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic validation failure.
#[derive(Debug)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration, collecting every failure.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "store.base_url", &config.store.base_url);
    check_positive(
        &mut errors,
        "store.request_timeout_secs",
        config.store.request_timeout_secs,
    );
    check_positive(
        &mut errors,
        "store.watch_poll_interval_ms",
        config.store.watch_poll_interval_ms,
    );

    check_url(&mut errors, "chain.rpc_url", &config.chain.rpc_url);
    for (i, failover) in config.chain.failover_urls.iter().enumerate() {
        check_url(&mut errors, &format!("chain.failover_urls[{i}]"), failover);
    }
    check_positive(&mut errors, "chain.rpc_timeout_secs", config.chain.rpc_timeout_secs);
    check_positive(
        &mut errors,
        "chain.mined_timeout_secs",
        config.chain.mined_timeout_secs,
    );

    if config
        .network
        .campaign_factory_address
        .parse::<Address>()
        .is_err()
    {
        errors.push(ValidationError {
            field: "network.campaign_factory_address".to_string(),
            message: "not a valid contract address".to_string(),
        });
    }
    check_url(&mut errors, "network.explorer_url", &config.network.explorer_url);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.parse::<Url>().is_err() {
        errors.push(ValidationError {
            field: field.to_string(),
            message: format!("`{value}` is not a valid URL"),
        });
    }
}

fn check_positive(errors: &mut Vec<ValidationError>, field: &str, value: u64) {
    if value == 0 {
        errors.push(ValidationError {
            field: field.to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
}
