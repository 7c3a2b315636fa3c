use std::fmt;

#[derive(Debug)]
pub enum LookupError {
    UnknownWeatherCode(u8),
    UnknownAzimuth(String),
    MissingLocale(String),
    Document(String),
    Io(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LookupError::UnknownWeatherCode(e) => write!(f, "LookupError::UnknownWeatherCode: {}", e),
            LookupError::UnknownAzimuth(e) => write!(f, "LookupError::UnknownAzimuth: {}", e),
            LookupError::MissingLocale(e) => write!(f, "LookupError::MissingLocale: {}", e),
            LookupError::Document(e) => write!(f, "LookupError::Document: {}", e),
            LookupError::Io(e) => write!(f, "LookupError::Io: {}", e),
        }
    }
}
impl From<serde_json::Error> for LookupError {
    fn from(e: serde_json::Error) -> Self {
        LookupError::Document(e.to_string())
    }
}
impl From<std::io::Error> for LookupError {
    fn from(e: std::io::Error) -> Self {
        LookupError::Io(e.to_string())
    }
}
