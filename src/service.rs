use crate::config::Config;
use callback_core::{AuthQuery, HmacError, generate_signature, sign_query, validate_hmac};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error(transparent)]
    Hmac(#[from] HmacError),

    /// The signing task was cancelled or panicked before producing a result.
    #[error("verification did not complete: {0}")]
    Cancelled(String),
}

/// Signs and verifies callback queries with the process-wide secret.
///
/// Cloning is cheap and every clone shares the same immutable configuration.
#[derive(Debug, Clone)]
pub struct CallbackVerifier {
    config: Arc<Config>,
}

impl CallbackVerifier {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub fn signature(&self, query: &AuthQuery) -> Result<String, VerifyError> {
        generate_signature(&self.config.api_secret_key, query)
            .map_err(|error| log_failure(query, error).into())
    }

    pub fn sign(&self, query: &AuthQuery) -> Result<AuthQuery, VerifyError> {
        sign_query(&self.config.api_secret_key, query)
            .map_err(|error| log_failure(query, error).into())
    }

    /// Verifies on the calling thread.
    pub fn verify_blocking(&self, query: &AuthQuery) -> Result<bool, VerifyError> {
        let outcome = validate_hmac(&self.config.api_secret_key, query);
        record_outcome(query, outcome)
    }

    /// Verifies on the blocking pool. A cancelled or panicked task fails the
    /// whole verification.
    pub async fn verify(&self, query: AuthQuery) -> Result<bool, VerifyError> {
        let config = Arc::clone(&self.config);
        let (query, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = validate_hmac(&config.api_secret_key, &query);
            (query, outcome)
        })
        .await
        .map_err(|join_error| {
            warn!(error = %join_error, "callback verification task did not complete");
            VerifyError::Cancelled(join_error.to_string())
        })?;

        record_outcome(&query, outcome)
    }
}

fn record_outcome(
    query: &AuthQuery,
    outcome: Result<bool, HmacError>,
) -> Result<bool, VerifyError> {
    match outcome {
        Ok(true) => {
            info!(shop = query.get("shop"), "callback hmac verified");
            Ok(true)
        }
        Ok(false) => {
            warn!(shop = query.get("shop"), "callback hmac mismatch");
            Ok(false)
        }
        Err(error) => Err(log_failure(query, error).into()),
    }
}

fn log_failure(query: &AuthQuery, error: HmacError) -> HmacError {
    if error.is_configuration_fault() {
        error!(reason = %error, "shared secret unusable for hmac signing");
    } else {
        warn!(shop = query.get("shop"), reason = %error, "callback rejected");
    }
    error
}
