use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

/// The gateway nests every payload under `response.result.data`.
#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    response: Option<EnvelopeResponse>,
    message: Option<Value>,
    error: Option<Value>,
}

#[derive(Deserialize)]
struct EnvelopeResponse {
    result: Option<Value>,
    message: Option<Value>,
}

/// Auxiliary fields are only read when they are strings.
fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ShapeError {
    Unsuccessful(Option<String>),
    MissingData,
    MissingField(&'static str),
    Decode(serde_json::Error),
    Body(reqwest::Error),
    InvalidBase64(base64::DecodeError),
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsuccessful(Some(message)) => write!(f, "gateway reported failure: {message}"),
            Self::Unsuccessful(None) => f.write_str("gateway reported failure"),
            Self::MissingData => f.write_str("response has no result data"),
            Self::MissingField(field) => write!(f, "response data is missing {field:?}"),
            Self::Decode(err) => write!(f, "malformed response envelope: {err}"),
            Self::Body(err) => write!(f, "response body is not JSON: {err}"),
            Self::InvalidBase64(err) => write!(f, "invalid base64 media: {err}"),
        }
    }
}

fn open(body: Value) -> Result<Envelope, ShapeError> {
    let envelope = serde_json::from_value::<Envelope>(body).map_err(ShapeError::Decode)?;

    if !envelope.success {
        let message = text(envelope.error).or_else(|| text(envelope.message));
        return Err(ShapeError::Unsuccessful(message));
    }

    Ok(envelope)
}

/// Returns `response.result.data`, failing unless `success` is true and the whole path exists.
pub fn unpack_data(body: Value) -> Result<Map<String, Value>, ShapeError> {
    let data = open(body)?
        .response
        .and_then(|response| response.result)
        .and_then(|result| match result {
            Value::Object(mut result) => result.remove("data"),
            _ => None,
        });

    match data {
        Some(Value::Object(data)) => Ok(data),
        _ => Err(ShapeError::MissingData),
    }
}

/// Chat replies come back either as a bare `response.result` string, under
/// `response.result.data.message`, or as a `message` next to the result.
pub fn unpack_chat_reply(body: Value) -> Result<String, ShapeError> {
    let envelope = open(body)?;
    let (result, response_message) = envelope
        .response
        .map_or((None, None), |response| (response.result, response.message));

    let from_result = match result {
        Some(Value::String(reply)) => Some(reply),
        Some(Value::Object(mut result)) => match result.remove("data") {
            Some(Value::Object(mut data)) => match data.remove("message") {
                Some(Value::String(reply)) => Some(reply),
                _ => None,
            },
            Some(Value::String(reply)) => Some(reply),
            _ => None,
        },
        _ => None,
    };

    from_result
        .or_else(|| text(response_message))
        .or_else(|| text(envelope.message))
        .filter(|reply| !reply.trim().is_empty())
        .ok_or(ShapeError::MissingField("message"))
}
