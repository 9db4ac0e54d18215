// Request fingerprinting - cache key derivation for text and media requests
// Author: kelexine (https://github.com/kelexine)

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Separator between the namespace tag and the normalized input.
/// Namespace tags never contain it, so keys of different features cannot collide.
const NAMESPACE_SEPARATOR: char = ':';

/// How a media payload is reduced to a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKeyStrategy {
    /// First `n` characters of the base64 payload.
    /// Distinct media sharing a common leading segment will collide.
    Prefix(usize),
    /// SHA-256 of the whole base64 payload.
    Digest,
}

impl Default for MediaKeyStrategy {
    fn default() -> Self {
        MediaKeyStrategy::Prefix(100)
    }
}

/// Deterministic cache key: `<namespace>:<normalized input>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint a free-text request.
    ///
    /// Leading/trailing whitespace is trimmed and the text is lower-cased, so
    /// requests that differ only by case or surrounding whitespace share a key.
    pub fn for_text(namespace: &str, text: &str) -> Self {
        debug_assert!(!namespace.contains(NAMESPACE_SEPARATOR));
        Self(format!(
            "{}{}{}",
            namespace,
            NAMESPACE_SEPARATOR,
            text.trim().to_lowercase()
        ))
    }

    /// Fingerprint a base64-encoded media payload.
    ///
    /// A data-URL header (`data:<mime>;base64,`) is ignored so the same bytes
    /// map to the same key whichever way they were submitted.
    pub fn for_media(namespace: &str, encoded: &str, strategy: MediaKeyStrategy) -> Self {
        debug_assert!(!namespace.contains(NAMESPACE_SEPARATOR));
        let payload = strip_data_url_header(encoded);

        let key = match strategy {
            MediaKeyStrategy::Prefix(len) => payload.chars().take(len).collect::<String>(),
            MediaKeyStrategy::Digest => {
                let mut hasher = Sha256::new();
                hasher.update(payload.as_bytes());
                hex::encode(hasher.finalize())
            }
        };

        Self(format!("{}{}{}", namespace, NAMESPACE_SEPARATOR, key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The namespace tag this key was derived under
    pub fn namespace(&self) -> &str {
        self.0
            .split_once(NAMESPACE_SEPARATOR)
            .map(|(ns, _)| ns)
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip an optional `data:...;base64,` header from an encoded payload.
pub(crate) fn strip_data_url_header(encoded: &str) -> &str {
    match encoded.rsplit_once(";base64,") {
        Some((_, payload)) => payload,
        None => encoded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_text_normalization() {
        let a = Fingerprint::for_text("symptoms", "  My Dog is LIMPING \n");
        let b = Fingerprint::for_text("symptoms", "my dog is limping");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "symptoms:my dog is limping");
        assert_eq!(a.namespace(), "symptoms");
    }

    #[test]
    fn test_inner_whitespace_is_significant() {
        let a = Fingerprint::for_text("behavior", "barks  at night");
        let b = Fingerprint::for_text("behavior", "barks at night");
        assert_ne!(a, b);
    }

    #[test]
    fn test_media_prefix_ignores_data_url_header() {
        let payload = "A".repeat(150);
        let with_header = format!("data:image/jpeg;base64,{}", payload);

        let a = Fingerprint::for_media("media", &payload, MediaKeyStrategy::Prefix(100));
        let b = Fingerprint::for_media("media", &with_header, MediaKeyStrategy::Prefix(100));
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), "media:".len() + 100);
    }

    #[test]
    fn test_media_prefix_collides_on_shared_header() {
        let common = "B".repeat(100);
        let a = Fingerprint::for_media("media", &format!("{}xxxx", common), MediaKeyStrategy::Prefix(100));
        let b = Fingerprint::for_media("media", &format!("{}yyyy", common), MediaKeyStrategy::Prefix(100));
        assert_eq!(a, b);

        // The digest strategy tells them apart
        let a = Fingerprint::for_media("media", &format!("{}xxxx", common), MediaKeyStrategy::Digest);
        let b = Fingerprint::for_media("media", &format!("{}yyyy", common), MediaKeyStrategy::Digest);
        assert_ne!(a, b);
    }

    #[test]
    fn test_media_digest_is_hex_sha256() {
        let fp = Fingerprint::for_media("media", "abc", MediaKeyStrategy::Digest);
        assert_eq!(
            fp.as_str(),
            "media:ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    proptest! {
        #[test]
        fn prop_case_and_padding_do_not_matter(
            text in "[a-zA-Z ]{0,40}",
            left in "[ \t\n]{0,4}",
            right in "[ \t\n]{0,4}",
        ) {
            let padded = format!("{}{}{}", left, text.to_uppercase(), right);
            prop_assert_eq!(
                Fingerprint::for_text("symptoms", &text),
                Fingerprint::for_text("symptoms", &padded)
            );
        }

        #[test]
        fn prop_namespaces_never_collide(text in ".{0,60}") {
            let namespaces = ["symptoms", "firstaid", "behavior", "media"];
            for (i, x) in namespaces.iter().enumerate() {
                for y in namespaces.iter().skip(i + 1) {
                    prop_assert_ne!(
                        Fingerprint::for_text(x, &text),
                        Fingerprint::for_text(y, &text)
                    );
                }
            }
        }
    }
}
