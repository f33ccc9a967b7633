use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wrapper for secrets (bearer tokens, passwords) that masks the value in
/// Debug and Display output while serializing transparently.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Redacted<T>(pub T);

impl<T> fmt::Debug for Redacted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T> fmt::Display for Redacted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Redacted<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // The session file and the Authorization header need the real value;
        // masking applies only to log macros like tracing::debug!("{:?}", auth).
        self.0.serialize(serializer)
    }
}

impl<T> Redacted<T> {
    pub fn new(value: T) -> Self {
        Redacted(value)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl Redacted<String> {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Redacted<String> {
    fn from(value: String) -> Self {
        Redacted(value)
    }
}

impl From<&str> for Redacted<String> {
    fn from(value: &str) -> Self {
        Redacted(value.to_string())
    }
}
