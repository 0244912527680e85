use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::FoodScanError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(FoodScanError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for FoodScanError {
    fn from(rejection: JsonRejection) -> Self {
        map_json_rejection(rejection)
    }
}

fn map_json_rejection(rejection: JsonRejection) -> FoodScanError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let message = err.body_text();
            if let Some(field) = extract_missing_field(&message) {
                FoodScanError::Validation(format!("Missing required field: {field}"))
            } else {
                FoodScanError::Validation(format!("Invalid JSON: {message}"))
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            FoodScanError::Validation(format!("JSON syntax error: {}", err.body_text()))
        }
        JsonRejection::MissingJsonContentType(_) => FoodScanError::Validation(
            "Missing `Content-Type: application/json` header".to_string(),
        ),
        JsonRejection::BytesRejection(err) => {
            FoodScanError::Validation(format!("Failed to read request body: {}", err.body_text()))
        }
        _ => FoodScanError::Validation(rejection.body_text()),
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let prefix = "missing field `";
    let start = message.find(prefix)? + prefix.len();
    let remaining = message.get(start..)?;
    let end = remaining.find('`')?;
    remaining.get(..end)
}
