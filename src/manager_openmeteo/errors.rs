use std::fmt;

#[derive(Debug)]
pub enum OpenMeteoError {
    Request(String),
    Status(u16),
    Document(String),
}

impl fmt::Display for OpenMeteoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OpenMeteoError::Request(e) => write!(f, "OpenMeteoError::Request: {}", e),
            OpenMeteoError::Status(e) => write!(f, "OpenMeteoError::Status: {}", e),
            OpenMeteoError::Document(e) => write!(f, "OpenMeteoError::Document: {}", e),
        }
    }
}
impl From<reqwest::Error> for OpenMeteoError {
    fn from(e: reqwest::Error) -> Self {
        OpenMeteoError::Request(e.to_string())
    }
}
impl From<serde_json::Error> for OpenMeteoError {
    fn from(e: serde_json::Error) -> Self {
        OpenMeteoError::Document(e.to_string())
    }
}
