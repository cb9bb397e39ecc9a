//! Errors for this crate.

use crate::models::ResourceType;
use reqwest::StatusCode;

#[derive(thiserror::Error, Debug)]
pub enum InvalidStemUrl {
    #[error("Given URL does not end with \"/api/\": {0}")]
    ApiRoot(String),

    #[error("Given URL does not start with \"http://\" or \"https://\": {0}")]
    Protocol(String),
}

aliri_braid::from_infallible!(InvalidStemUrl);

/// Errors representing failed interactions with the BrainSTEM API.
#[derive(thiserror::Error, Debug)]
pub enum StemError {
    /// Error response with an explanation from the server.
    #[error("({status:?} {reason:?}): {text}")]
    Remote {
        status: StatusCode,
        reason: &'static str,
        text: String,
        source: reqwest::Error,
    },

    /// Error response without explanation from the server.
    #[error(transparent)]
    Raw(#[from] reqwest::Error),

    /// Response body did not contain the expected model key.
    #[error("response has no \"{0}\" key")]
    MissingKey(&'static str),
}

/// The given model name is not one of the platform's resource types.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown resource type \"{0}\"")]
pub struct UnknownResourceType(pub String);

/// The given scope is not one of the platform's portals.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown portal \"{0}\"")]
pub struct UnknownPortal(pub String);

/// Errors from the token endpoint.
#[derive(thiserror::Error, Debug)]
pub enum LoginError {
    /// Non-2xx status from the token endpoint.
    #[error("({0}) user/password combination incorrect or user does not exist")]
    Failed(StatusCode),

    #[error(transparent)]
    Raw(#[from] reqwest::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum DeleteError {
    /// A collection-level DELETE must never be constructed.
    #[error("delete requires a non-empty id")]
    MissingId,

    #[error(transparent)]
    Stem(#[from] StemError),
}

/// Errors while assembling the denormalized dataset metadata document.
#[derive(thiserror::Error, Debug)]
pub enum AggregateError {
    /// A relation the traversal depends on is absent from the record.
    #[error("{model} record has no usable \"{field}\" relation")]
    MissingRelation {
        model: ResourceType,
        field: &'static str,
    },

    #[error(transparent)]
    Stem(#[from] StemError),
}

pub(crate) async fn check(res: reqwest::Response) -> Result<reqwest::Response, StemError> {
    match res.error_for_status_ref() {
        Ok(_) => Ok(res),
        Err(source) => {
            let status = res.status();
            let reason = status.canonical_reason().unwrap_or("unknown reason");
            let text = res.text().await.map_err(StemError::Raw)?;
            Err(StemError::Remote {
                status,
                reason,
                text,
                source,
            })
        }
    }
}
