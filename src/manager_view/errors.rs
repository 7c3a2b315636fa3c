use std::fmt;
use crate::lookups::errors::LookupError;

#[derive(Debug)]
pub enum ViewError {
    Lookup(LookupError),
    InvalidTimestamp(String),
    MisalignedSeries(String),
    UnknownTimezone(String),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ViewError::Lookup(e) => write!(f, "ViewError::Lookup: {}", e),
            ViewError::InvalidTimestamp(e) => write!(f, "ViewError::InvalidTimestamp: {}", e),
            ViewError::MisalignedSeries(e) => write!(f, "ViewError::MisalignedSeries: {}", e),
            ViewError::UnknownTimezone(e) => write!(f, "ViewError::UnknownTimezone: {}", e),
        }
    }
}
impl From<LookupError> for ViewError {
    fn from(e: LookupError) -> Self {
        ViewError::Lookup(e)
    }
}
