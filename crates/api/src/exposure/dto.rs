//! Wire shapes of exposed routes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use exposer_model::Filter;

const STATUS_OK: &str = "Ok";
const STATUS_ERROR: &str = "Error";

/// `{status:"Ok", code, metadata?, data}`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ListMetadata>,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(code: StatusCode, data: T) -> Self {
        Self {
            status: STATUS_OK,
            code: code.as_u16(),
            metadata: None,
            data,
        }
    }

    pub fn with_metadata(mut self, metadata: ListMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::OK);
        (status, axum::Json(self)).into_response()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListMetadata {
    pub model_name: String,
    pub fields_readable: Vec<String>,
    pub page: u64,
    pub items_per_page: u64,
    pub number_of_pages: u64,
    pub count: u64,
    pub filter: Filter,
}

/// `{status:"Ok", code, message}` for operations without a payload.
#[derive(Debug, Serialize)]
pub struct Acknowledgement {
    pub status: &'static str,
    pub code: u16,
    pub message: String,
}

impl Acknowledgement {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_OK,
            code: StatusCode::OK.as_u16(),
            message: message.into(),
        }
    }
}

impl IntoResponse for Acknowledgement {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorEnvelope {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub errors: Vec<ErrorEntry>,
}

impl ErrorEnvelope {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR,
            code: Some(code),
            message: Some(message.into()),
            errors: Vec::new(),
        }
    }

    /// Envelope with only an `errors` list, used by the catch-all route.
    pub fn bare(errors: Vec<ErrorEntry>) -> Self {
        Self {
            status: STATUS_ERROR,
            code: None,
            message: None,
            errors,
        }
    }

    pub fn with_errors(mut self, errors: Vec<ErrorEntry>) -> Self {
        self.errors = errors;
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorEntry {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ErrorEntry {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
            value: None,
        }
    }

    pub fn for_field(code: u16, message: impl Into<String>, field: impl Into<String>, value: Value) -> Self {
        Self {
            code,
            message: message.into(),
            field: Some(field.into()),
            value: Some(value),
        }
    }
}

/// Body of `POST <mount>/method` and `POST <mount>/:id/method`.
#[derive(Debug, Clone, Deserialize)]
pub struct MethodRequest {
    pub method: String,
    #[serde(default)]
    pub args: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_metadata_is_camel_case() {
        let envelope = Envelope::ok(StatusCode::OK, Vec::<Value>::new()).with_metadata(ListMetadata {
            model_name: "Article".into(),
            fields_readable: vec!["title".into()],
            page: 1,
            items_per_page: 100,
            number_of_pages: 1,
            count: 0,
            filter: Filter::new(),
        });
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            json!({
                "status": "Ok",
                "code": 200,
                "metadata": {
                    "modelName": "Article",
                    "fieldsReadable": ["title"],
                    "page": 1,
                    "itemsPerPage": 100,
                    "numberOfPages": 1,
                    "count": 0,
                    "filter": {}
                },
                "data": []
            })
        );
    }

    #[test]
    fn method_request_args_default_to_null() {
        let req: MethodRequest = serde_json::from_value(json!({"method": "countPublished"})).unwrap();
        assert_eq!(req.method, "countPublished");
        assert_eq!(req.args, Value::Null);
    }
}
