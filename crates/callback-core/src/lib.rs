//! Signature verification for OAuth authorization callbacks.
//!
//! An issuer holding a shared secret signs the callback parameters with
//! HMAC-SHA256 and sends the hex digest in the `hmac` parameter. This crate
//! recomputes that digest over a canonical form of the query and compares the
//! two in constant time.
//!
//! ```
//! use callback_core::{AuthQuery, SharedSecret, sign_query, validate_hmac};
//!
//! let secret = SharedSecret::new("K");
//! let query = AuthQuery::parse("code=abc&timestamp=1&state=xyz&shop=s.myshopify.com");
//! let signed = sign_query(&secret, &query).expect("usable secret");
//!
//! assert_eq!(validate_hmac(&secret, &signed), Ok(true));
//! ```

pub mod canonical;
pub mod compare;
pub mod error;
pub mod model;
pub mod signatures;
pub mod verify;

pub use canonical::canonical_query;
pub use compare::constant_time_eq;
pub use error::{HmacError, HmacResult};
pub use model::AuthQuery;
pub use signatures::{SharedSecret, compute_hmac_sha256_hex, generate_signature, sign_query};
pub use verify::validate_hmac;
