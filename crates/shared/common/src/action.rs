//! Uniform `{ ok, message }` result for user-triggered actions.
//!
//! Callers branch only on `ok`; error kinds are folded into `message`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// Action outcome shown to the admin UI (toast text + success flag).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
    #[serde(skip)]
    status: Option<StatusCode>,
}

impl ActionResponse {
    /// Successful action with a confirmation message
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            status: None,
        }
    }

    /// Failed action with a human-readable message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            status: None,
        }
    }

    /// Fold any service result into the action shape.
    pub fn from_result<T>(result: AppResult<T>, success_message: impl Into<String>) -> Self {
        match result {
            Ok(_) => Self::success(success_message),
            Err(err) => Self {
                ok: false,
                message: err.user_message(),
                status: Some(err.status()),
            },
        }
    }
}

impl IntoResponse for ActionResponse {
    fn into_response(self) -> Response {
        let status = match (self.ok, self.status) {
            (true, _) => StatusCode::OK,
            (false, Some(status)) => status,
            (false, None) => StatusCode::BAD_REQUEST,
        };
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn success_result_is_ok() {
        let response = ActionResponse::from_result(Ok::<_, AppError>(()), "Deleted");
        assert!(response.ok);
        assert_eq!(response.message, "Deleted");
    }

    #[test]
    fn error_result_carries_user_message() {
        let response =
            ActionResponse::from_result::<()>(Err(AppError::NotFound), "Deleted");
        assert!(!response.ok);
        assert_eq!(response.message, "Resource not found");
        assert_eq!(response.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn serializes_only_ok_and_message() {
        let json = serde_json::to_value(ActionResponse::failure("nope")).unwrap();
        assert_eq!(json, serde_json::json!({ "ok": false, "message": "nope" }));
    }
}
