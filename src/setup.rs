use anyhow::Result;
use log::debug;

use crate::config::Config;
use crate::error::{AdvisorError, AdvisorResult};
use crate::llm::{AdvisoryClient, HttpTransport, Transport};

/// Production transport: blocking reqwest with the configured timeout.
pub fn http_transport(cfg: &Config) -> Result<Box<dyn Transport>> {
    Ok(Box::new(HttpTransport::new(cfg.timeout)?))
}

/// Build the advisory client once per run, after the credential check.
///
/// `make_transport` is not called at all when the credential is missing.
pub fn build_advisory_client<F>(cfg: &Config, make_transport: F) -> AdvisorResult<AdvisoryClient>
where
    F: FnOnce(&Config) -> Result<Box<dyn Transport>>,
{
    let key = cfg.credential()?.to_string();
    let transport =
        make_transport(cfg).map_err(|e| AdvisorError::Configuration(format!("{e:#}")))?;

    debug!(
        "Using {} client with model {} at {}",
        cfg.provider.label(),
        cfg.model,
        cfg.api_base_url
    );

    Ok(AdvisoryClient::new(
        transport,
        cfg.provider,
        key,
        cfg.model.clone(),
        cfg.api_base_url.clone(),
        cfg.retry,
    ))
}
