//! Body formats of the backend file monitoring endpoint

use serde::{Deserialize, Serialize};

/// Request body posted to the monitoring endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadFileRequest {
    pub file_path: String,
    pub last_line_count: u64,
}

/// Response body of the monitoring endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadFileResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub total_lines: u64,
    #[serde(default)]
    pub new_lines: Vec<String>,
}

impl ReadFileResponse {
    pub fn ok(total_lines: u64, new_lines: Vec<String>) -> Self {
        Self {
            success: true,
            error: None,
            total_lines,
            new_lines,
        }
    }

    pub fn has_new_lines(&self) -> bool {
        !self.new_lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_body_without_line_fields() {
        let body: ReadFileResponse = serde_json::from_str(r#"{"success":false,"error":"Arquivo não encontrado"}"#).unwrap();
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("Arquivo não encontrado"));
        assert_eq!(body.total_lines, 0);
        assert!(!body.has_new_lines());
    }

    #[test]
    fn test_success_body_with_null_error() {
        let body: ReadFileResponse =
            serde_json::from_str(r#"{"success":true,"error":null,"total_lines":5,"new_lines":["a","b"]}"#).unwrap();
        assert_eq!(body, ReadFileResponse::ok(5, vec!["a".to_string(), "b".to_string()]));
        assert!(body.has_new_lines());
    }
}
