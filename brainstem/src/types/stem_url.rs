//! NewTypes for values used when first connecting and authenticating with the API.

use crate::errors::InvalidStemUrl;
use aliri_braid::braid;

/// A [StemUrl] is the base URL for a BrainSTEM server, e.g.
/// `https://www.brainstem.org/api/`
#[braid(validator, serde)]
pub struct StemUrl(String);

impl aliri_braid::Validator for StemUrl {
    type Error = InvalidStemUrl;

    fn validate(s: &str) -> Result<(), Self::Error> {
        if !(s.starts_with("http://") || s.starts_with("https://")) {
            Err(InvalidStemUrl::Protocol(s.to_string()))
        } else if !s.ends_with("/api/") {
            Err(InvalidStemUrl::ApiRoot(s.to_string()))
        } else {
            Ok(())
        }
    }
}
