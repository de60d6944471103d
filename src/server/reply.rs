use serde::Serialize;
use warp::http::header::HeaderValue;
use warp::http::status::StatusCode;
use warp::reply::Response;
use warp::Reply;

use super::JSON_MIME_TYPE;
use crate::directory::DirectoryError;

/// Serialize a value as the JSON body of a reply.
///
/// `serde_json` keeps map ordering and we only serialize ordered collections,
/// so repeated serialization of unchanged data is byte-identical
pub fn json<T>(val: &T) -> SerializedJson
where
    T: Serialize,
{
    SerializedJson {
        inner: serde_json::to_vec(val).map_err(|e| {
            tracing::error!(error = %e, "Error while serializing JSON");
        }),
    }
}

/// A serialized JSON body
pub struct SerializedJson {
    inner: Result<Vec<u8>, ()>,
}

impl Reply for SerializedJson {
    #[inline]
    fn into_response(self) -> Response {
        match self.inner {
            Ok(body) => {
                let mut res = Response::new(body.into());
                res.headers_mut().insert(
                    warp::http::header::CONTENT_TYPE,
                    HeaderValue::from_static(JSON_MIME_TYPE),
                );
                res
            }
            Err(()) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

/// A helper for converting a [`DirectoryError`](crate::directory::DirectoryError) into a warp
/// `Reply` with the proper status code. It will return a JSON body that looks like:
/// ```json
/// {"error": "directory could not be loaded"}
/// ```
pub fn into_reply(error: DirectoryError) -> warp::reply::WithStatus<SerializedJson> {
    // A directory fault at request time is an infrastructure failure, never a client error.
    // Load-time validation errors cannot reach here because the server refuses to start on them
    reply_from_error(error, StatusCode::INTERNAL_SERVER_ERROR)
}

// A more generic wrapper that takes any ToString implementation (which includes Errors) and builds
// a JSON error body with the given status code
pub fn reply_from_error(
    error: impl std::string::ToString,
    status_code: warp::http::StatusCode,
) -> warp::reply::WithStatus<SerializedJson> {
    warp::reply::with_status(
        json(&crate::ErrorResponse {
            error: error.to_string(),
        }),
        status_code,
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_json_reply_sets_content_type() {
        let res = json(&crate::Permission::new("permission.list")).into_response();
        assert_eq!(
            JSON_MIME_TYPE,
            res.headers()
                .get(warp::http::header::CONTENT_TYPE)
                .expect("content type should be set")
                .to_str()
                .expect("content type should be ascii")
        );
    }

    #[test]
    fn test_error_reply_carries_status() {
        let res = reply_from_error("access denied", StatusCode::FORBIDDEN).into_response();
        assert_eq!(StatusCode::FORBIDDEN, res.status());
    }
}
