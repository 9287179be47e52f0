use serde::de::IgnoredAny;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Result object returned by every public comparison operation.
///
/// Serializes as `{"status": "success", "data": ...}` or
/// `{"status": "error", "message": "...", "data": []}`. An absent payload is
/// always written as an empty list so callers can iterate `data` either way.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(
        default,
        serialize_with = "serialize_data",
        deserialize_with = "deserialize_data"
    )]
    pub data: Option<T>,
}

fn serialize_data<T, S>(data: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match data {
        Some(value) => value.serialize(serializer),
        None => serializer.serialize_seq(Some(0))?.end(),
    }
}

fn deserialize_data<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Data<T> {
        Present(T),
        Empty([IgnoredAny; 0]),
        Null(()),
    }

    Ok(match Data::<T>::deserialize(deserializer)? {
        Data::Present(value) => Some(value),
        Data::Empty(_) | Data::Null(()) => None,
    })
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: Status::Success,
            message: None,
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Converts back into a `Result`, with the error message on failure.
    pub fn into_result(self) -> Result<T, String> {
        match (self.status, self.data) {
            (Status::Success, Some(data)) => Ok(data),
            _ => Err(self.message.unwrap_or_default()),
        }
    }
}

impl<T> From<Result<T, EngineError>> for Envelope<T> {
    fn from(result: Result<T, EngineError>) -> Self {
        match result {
            Ok(data) => Envelope::success(data),
            Err(err) => Envelope::error(err.to_string()),
        }
    }
}
