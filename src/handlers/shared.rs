use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    // Success with data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    // Success with message
    pub fn success_with_message(data: Option<T>, message: &str) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.to_string()),
        }
    }
}

impl ApiResponse<()> {
    // Error response (no data)
    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Inline message rendered above a screen. Remote failures become `Error`
/// notices instead of failed requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Unwraps a remote read for a screen: on failure the default value is used
/// and an error notice is recorded.
pub fn or_notice<T: Default>(
    result: Result<T, crate::error::AppError>,
    what: &str,
    notices: &mut Vec<Notice>,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            log::error!("Error loading {}: {}", what, e);
            notices.push(Notice::error(format!("Error loading {}: {}", what, e)));
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn failed_read_falls_back_to_default_with_notice() {
        let mut notices = Vec::new();
        let count: i64 = or_notice(
            Err(AppError::RemoteRead("connection reset".into())),
            "employees",
            &mut notices,
        );
        assert_eq!(count, 0);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(notices[0].text.contains("connection reset"));

        let rows: Vec<i32> = or_notice(Ok(vec![1, 2]), "attendance", &mut notices);
        assert_eq!(rows, vec![1, 2]);
        assert_eq!(notices.len(), 1);
    }

    #[test]
    fn envelope_shapes() {
        let ok = serde_json::to_value(ApiResponse::success(1)).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["data"], 1);

        let err = serde_json::to_value(ApiResponse::<()>::error("nope")).unwrap();
        assert_eq!(err["success"], false);
        assert!(err["data"].is_null());
        assert_eq!(err["message"], "nope");
    }
}
