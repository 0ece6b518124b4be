use crate::canonical::canonical_query;
use crate::error::{HmacError, HmacResult};
use crate::model::{AuthQuery, HMAC_FIELD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded HMAC-SHA256 signature.
pub const SIGNATURE_HEX_LEN: usize = 64;

/// Key shared with the callback issuer.
///
/// Set once at startup and only borrowed afterwards. It has no `Serialize`
/// impl and its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret(String);

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

/// HMAC-SHA256 of `payload` keyed by `secret`, as lowercase hex.
pub fn compute_hmac_sha256_hex(secret: &SharedSecret, payload: &[u8]) -> HmacResult<String> {
    if secret.is_empty() {
        return Err(HmacError::KeyImport("shared secret is empty".to_string()));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|error| HmacError::KeyImport(error.to_string()))?;
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Expected signature for a callback query.
///
/// Only the signable subset is covered (`code`, `timestamp`, `state`, `shop`
/// and a non-empty `host`); `hmac` and unrecognized parameters are ignored.
pub fn generate_signature(secret: &SharedSecret, query: &AuthQuery) -> HmacResult<String> {
    let pairs = query.signable_pairs();
    let fields: Vec<&str> = pairs.iter().map(|(key, _)| *key).collect();
    tracing::debug!(?fields, "computing callback signature");

    let message = canonical_query(pairs);
    compute_hmac_sha256_hex(secret, message.as_bytes())
}

/// Returns a copy of `query` with `hmac` set to its signature, replacing any
/// previous value. Used to build outbound signed callbacks.
pub fn sign_query(secret: &SharedSecret, query: &AuthQuery) -> HmacResult<AuthQuery> {
    let signature = generate_signature(secret, query)?;
    let mut signed = query.clone();
    signed.insert(HMAC_FIELD, signature);
    Ok(signed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALLBACK_SIGNATURE: &str =
        "7afcc9b1cb1495883d76b4e10c817db8bcb6dd9c559b4aa68ff2325509091979";

    fn callback_query() -> AuthQuery {
        [
            ("code", "abc"),
            ("timestamp", "1"),
            ("state", "xyz"),
            ("shop", "s.myshopify.com"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn matches_known_hmac_sha256_vector() {
        let digest = compute_hmac_sha256_hex(&SharedSecret::new("key"), b"message")
            .expect("non-empty key");
        assert_eq!(
            digest,
            "6e9ef29b75fffc5b7abae527d58fdadb2fe42e7219011976917343065f58ed4a"
        );
    }

    #[test]
    fn signs_canonical_callback_fields() {
        let signature =
            generate_signature(&SharedSecret::new("K"), &callback_query()).expect("signature");

        assert_eq!(signature, CALLBACK_SIGNATURE);
        assert_eq!(signature.len(), SIGNATURE_HEX_LEN);
        assert!(
            signature
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        );
    }

    #[test]
    fn host_participates_when_present() {
        let mut query = callback_query();
        query.insert("host", "YWRtaW4uc2hvcGlmeS5jb20vc3RvcmUvcw");

        let signature = generate_signature(&SharedSecret::new("K"), &query).expect("signature");
        assert_eq!(
            signature,
            "c2b573b6b3d410fc1d2fd56682b8c398ec173b2d6e712939638339f4b34f85d3"
        );
    }

    #[test]
    fn ignores_hmac_and_unrecognized_fields() {
        let secret = SharedSecret::new("K");
        let mut query = callback_query();
        query.insert("hmac", "ffff");
        query.insert("locale", "en");

        assert_eq!(
            generate_signature(&secret, &query).expect("signature"),
            CALLBACK_SIGNATURE
        );
    }

    #[test]
    fn is_deterministic_and_sensitive_to_inputs() {
        let secret = SharedSecret::new("K");
        let first = generate_signature(&secret, &callback_query()).expect("signature");
        let second = generate_signature(&secret, &callback_query()).expect("signature");
        assert_eq!(first, second);

        let mut changed = callback_query();
        changed.insert("state", "xyy");
        assert_ne!(
            generate_signature(&secret, &changed).expect("signature"),
            first
        );

        assert_ne!(
            generate_signature(&SharedSecret::new("L"), &callback_query()).expect("signature"),
            first
        );
    }

    #[test]
    fn empty_secret_is_a_key_import_error() {
        let error = generate_signature(&SharedSecret::new(""), &callback_query())
            .expect_err("empty secret must fail");

        assert!(matches!(error, HmacError::KeyImport(_)));
        assert!(error.is_configuration_fault());
    }

    #[test]
    fn sign_query_populates_hmac_field() {
        let signed = sign_query(&SharedSecret::new("K"), &callback_query()).expect("signed");

        assert_eq!(signed.hmac(), Some(CALLBACK_SIGNATURE));
        assert_eq!(signed.get("code"), Some("abc"));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let rendered = format!("{:?}", SharedSecret::new("hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
