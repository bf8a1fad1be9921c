/// Request extractors
///
/// [`ValidatedJson`] deserializes a JSON body and runs its `validator`
/// rules, so handlers only see well-formed input. Malformed bodies become
/// 400 and rule violations 422, both in the standard error format.
/// [`QueryParams`] does the same for query strings (without rules).

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// JSON body that has passed validation
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        value.validate()?;

        Ok(Self(value))
    }
}

/// Query string parameters with rejections in the API error format
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| {
                ApiError::BadRequest(format!("Invalid query parameters: {}", rejection.body_text()))
            })?;

        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    let message = match rejection {
        JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
        JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err.body_text()),
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        other => other.body_text(),
    };

    ApiError::BadRequest(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, response::IntoResponse};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 1, max = 5))]
        name: String,
    }

    fn request(content_type: &str, body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap()
    }

    async fn extract(req: Request) -> Result<ValidatedJson<Payload>, ApiError> {
        ValidatedJson::<Payload>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_valid_body() {
        let ValidatedJson(payload) = extract(request("application/json", r#"{"name":"ok"}"#))
            .await
            .unwrap();
        assert_eq!(payload.name, "ok");
    }

    #[tokio::test]
    async fn test_rule_violation_is_422() {
        let err = extract(request("application/json", r#"{"name":"too long"}"#))
            .await
            .err()
            .unwrap();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[derive(Debug, Deserialize)]
    struct Filter {
        page: Option<i64>,
    }

    #[tokio::test]
    async fn test_query_params() {
        let (mut parts, _) = Request::builder()
            .uri("/?page=3")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        let QueryParams(filter) = QueryParams::<Filter>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(filter.page, Some(3));

        let (mut parts, _) = Request::builder()
            .uri("/?page=three")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        let err = QueryParams::<Filter>::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        for req in [
            request("application/json", "{not json"),
            request("application/json", r#"{"title":"x"}"#),
            request("text/plain", r#"{"name":"ok"}"#),
        ] {
            let err = extract(req).await.err().unwrap();
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }
}
