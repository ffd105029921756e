//! Extractors and helpers for the JSON API.
//!
//! Request bodies are deserialized into structs whose fields are all optional
//! so that handlers can report exactly which required field is missing, rather
//! than the generic message from a failed deserialization.

use axum::extract::{FromRequest, FromRequestParts};
use serde::Deserialize;

use crate::Error;

/// A JSON extractor that turns rejections into the app's JSON error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// A path extractor that turns rejections, such as a non-numeric ID, into the
/// app's JSON error envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct ApiPath<T>(pub T);

/// A number sent either as a JSON number or as a string such as `"4.50"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    /// A JSON number.
    Number(f64),
    /// A string that should contain a number.
    Text(String),
}

impl NumberInput {
    /// Read the number as a float, treating `field` as the name of the field it came from.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidNumber] if the text is not a number, or if the
    /// number is NaN or infinite (these cannot be written back out as JSON).
    pub fn coerce(&self, field: &'static str) -> Result<f64, Error> {
        let number = match self {
            NumberInput::Number(number) => *number,
            NumberInput::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::InvalidNumber(field, text.clone()))?,
        };

        if number.is_finite() {
            Ok(number)
        } else {
            Err(Error::InvalidNumber(field, number.to_string()))
        }
    }
}

/// Unwrap a required request field.
///
/// # Errors
///
/// Returns an [Error::MissingField] naming `field` if `value` is `None`.
pub fn require<T>(value: Option<T>, field: &'static str) -> Result<T, Error> {
    value.ok_or(Error::MissingField(field))
}

#[cfg(test)]
mod number_input_tests {
    use crate::Error;

    use super::{NumberInput, require};

    #[test]
    fn coerces_number() {
        assert_eq!(NumberInput::Number(4.5).coerce("amount"), Ok(4.5));
    }

    #[test]
    fn coerces_numeric_string() {
        let input = NumberInput::Text(" 12.25 ".to_owned());

        assert_eq!(input.coerce("amount"), Ok(12.25));
    }

    #[test]
    fn rejects_non_numeric_string() {
        let input = NumberInput::Text("twelve".to_owned());

        assert_eq!(
            input.coerce("savings"),
            Err(Error::InvalidNumber("savings", "twelve".to_owned()))
        );
    }

    #[test]
    fn rejects_non_finite_string() {
        let input = NumberInput::Text("NaN".to_owned());

        assert!(matches!(
            input.coerce("amount"),
            Err(Error::InvalidNumber("amount", _))
        ));
    }

    #[test]
    fn deserializes_number_and_string() {
        let number: NumberInput = serde_json::from_str("3").unwrap();
        let text: NumberInput = serde_json::from_str("\"3\"").unwrap();

        assert_eq!(number, NumberInput::Number(3.0));
        assert_eq!(text, NumberInput::Text("3".to_owned()));
    }

    #[test]
    fn require_reports_missing_field() {
        assert_eq!(
            require::<String>(None, "description"),
            Err(Error::MissingField("description"))
        );
        assert_eq!(require(Some(1), "description"), Ok(1));
    }
}
