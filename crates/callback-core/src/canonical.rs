//! Canonical query-string construction.
//!
//! Both the issuer and the verifier sign the same bytes only if the parameter
//! set is serialized identically. The canonical form is:
//!
//! ```text
//! key1=value1&key2=value2&...
//! ```
//!
//! with pairs sorted by the raw bytes of the key and every key and value
//! encoded with `application/x-www-form-urlencoded` rules (alphanumerics and
//! `*-._` kept, space as `+`, everything else percent-encoded as UTF-8).

use crate::model::HMAC_FIELD;

/// Build the canonical query string for a set of parameters.
///
/// The `hmac` parameter is always dropped. Input order does not matter.
///
/// # Examples
///
/// ```
/// use callback_core::canonical::canonical_query;
///
/// assert_eq!(canonical_query([("shop", "a b"), ("code", "1")]), "code=1&shop=a+b");
/// assert_eq!(canonical_query(Vec::<(&str, &str)>::new()), "");
/// ```
#[must_use]
pub fn canonical_query<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut pairs: Vec<(&str, &str)> = pairs
        .into_iter()
        .filter(|(key, _)| *key != HMAC_FIELD)
        .collect();

    // Byte order; values break ties so repeated keys stay deterministic.
    pairs.sort_unstable();

    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_keys_by_byte_order() {
        let canonical = canonical_query([
            ("timestamp", "1"),
            ("state", "xyz"),
            ("shop", "s.myshopify.com"),
            ("code", "abc"),
        ]);

        assert_eq!(
            canonical,
            "code=abc&shop=s.myshopify.com&state=xyz&timestamp=1"
        );
    }

    #[test]
    fn output_is_independent_of_input_order() {
        let pairs = [
            ("code", "abc"),
            ("host", "h"),
            ("shop", "s.myshopify.com"),
            ("state", "xyz"),
            ("timestamp", "1"),
        ];
        let expected = canonical_query(pairs);

        let mut permuted = pairs;
        for rotation in 0..pairs.len() {
            permuted.rotate_left(1);
            assert_eq!(canonical_query(permuted), expected, "rotation {rotation}");
            let mut reversed = permuted;
            reversed.reverse();
            assert_eq!(canonical_query(reversed), expected, "reversed {rotation}");
        }
    }

    #[test]
    fn never_emits_hmac_pair() {
        let canonical = canonical_query([("hmac", "abc"), ("code", "1"), ("shop", "hmac=")]);

        assert_eq!(canonical, "code=1&shop=hmac%3D");
        assert!(!canonical.contains("hmac="));
    }

    #[test]
    fn empty_input_yields_empty_string() {
        assert_eq!(canonical_query(std::iter::empty::<(&str, &str)>()), "");
        assert_eq!(canonical_query([("hmac", "only")]), "");
    }

    #[test]
    fn percent_encodes_reserved_and_non_ascii_characters() {
        let canonical = canonical_query([("a", "x y&z=1"), ("b", "é*~-._")]);
        assert_eq!(canonical, "a=x+y%26z%3D1&b=%C3%A9*%7E-._");
    }

    #[test]
    fn encodes_keys_as_well_as_values() {
        assert_eq!(canonical_query([("a key", "v")]), "a+key=v");
    }
}
