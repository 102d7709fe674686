use std::fmt;

#[derive(Debug)]
pub enum LLMError {
    Request(String),
    Response(String),
}

impl fmt::Display for LLMError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LLMError::Request(e) => write!(f, "LLMError::Request: {}", e),
            LLMError::Response(e) => write!(f, "LLMError::Response: {}", e),
        }
    }
}
impl From<reqwest::Error> for LLMError {
    fn from(e: reqwest::Error) -> Self {
        LLMError::Request(e.to_string())
    }
}
impl From<serde_json::Error> for LLMError {
    fn from(e: serde_json::Error) -> Self {
        LLMError::Response(e.to_string())
    }
}
