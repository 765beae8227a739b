//! Request extractors that reject with [`ApiError`] instead of axum's
//! plain-text rejections, so malformed input gets the usual JSON body.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts};
use kasir_core::ValidationError;

use crate::error::ApiError;

/// `Json<T>` with a 400 `VALIDATION_ERROR` on a bad body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Path<T>` with a 400 `VALIDATION_ERROR` on a bad segment, e.g. `/products/abc`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ValidationError::invalid("Body JSON", rejection.body_text()).into()
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ValidationError::invalid("ID", rejection.body_text()).into()
    }
}
