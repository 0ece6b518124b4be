use crate::compare::constant_time_eq;
use crate::error::{HmacError, HmacResult};
use crate::model::AuthQuery;
use crate::signatures::{SharedSecret, generate_signature};

/// Checks the `hmac` parameter of a callback query against the signature
/// recomputed from the rest of the query.
///
/// Returns `Ok(false)` on a mismatch. Fails with [`HmacError::InvalidHmac`]
/// when the query has no (or an empty) `hmac`, and with
/// [`HmacError::KeyImport`] when the secret is unusable.
pub fn validate_hmac(secret: &SharedSecret, query: &AuthQuery) -> HmacResult<bool> {
    let Some(claimed) = query.hmac() else {
        return Err(HmacError::InvalidHmac(
            "query does not contain an hmac value",
        ));
    };

    let expected = generate_signature(secret, query)?;
    let authentic = constant_time_eq(claimed, &expected);
    if !authentic {
        tracing::debug!(shop = query.get("shop"), "callback hmac mismatch");
    }

    Ok(authentic)
}
