use std::fmt;

#[derive(Debug)]
pub enum OWMError {
    NoData(String),
    Transport(String),
    Decode(String),
}

impl fmt::Display for OWMError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OWMError::NoData(e) => write!(f, "OWMError::NoData: {}", e),
            OWMError::Transport(e) => write!(f, "OWMError::Transport: {}", e),
            OWMError::Decode(e) => write!(f, "OWMError::Decode: {}", e),
        }
    }
}
impl From<reqwest::Error> for OWMError {
    fn from(e: reqwest::Error) -> Self {
        OWMError::Transport(e.to_string())
    }
}
impl From<serde_json::Error> for OWMError {
    fn from(e: serde_json::Error) -> Self {
        OWMError::Decode(e.to_string())
    }
}
