//! Success envelope: `{"success": true, "data": ..., "message": ..., "count": ...}`

use serde::Serialize;

/// JSON envelope wrapping every successful response
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Envelope carrying a payload
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            count: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

impl ApiResponse<()> {
    /// Envelope carrying only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            count: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_envelope() {
        let json = serde_json::to_string(&ApiResponse::data(vec![1, 2, 3]).with_count(3)).unwrap();
        assert_eq!(json, r#"{"success":true,"data":[1,2,3],"count":3}"#);
    }

    #[test]
    fn test_message_envelope() {
        let json = serde_json::to_string(&ApiResponse::message("Email verified successfully!"))
            .unwrap();
        assert_eq!(
            json,
            r#"{"success":true,"message":"Email verified successfully!"}"#
        );
    }
}
