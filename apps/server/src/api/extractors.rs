//! Custom Axum extractors that report failures as [`Error`] responses.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use crate::Error;

/// JSON body that has been deserialized and then validated.
///
/// Malformed JSON, missing required fields and failed validation rules all become
/// `Error::Validation` (400). The `Content-Type` header is not inspected.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| Error::Validation(format!("Failed to read request body: {e}")))?;

        let value: T = serde_json::from_slice(&bytes)
            .map_err(|e| Error::Validation(format!("Invalid request body: {e}")))?;
        value.validate()?;

        Ok(ValidJson(value))
    }
}

/// Query string parameters; a missing or unparsable parameter is a 400.
pub struct ListParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ListParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| Error::Validation(e.body_text()))?;
        Ok(ListParams(value))
    }
}

/// Entity id from the last path segment. Anything that is not a UUID cannot name
/// an entity, so it is answered like an unknown id: a bare 404.
pub struct EntityId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        Uuid::parse_str(&raw)
            .map(EntityId)
            .map_err(|_| StatusCode::NOT_FOUND.into_response())
    }
}
