//! Payload validation for movie records.
//!
//! Payloads arrive as raw JSON so that every problem can be reported at once:
//! first each known field is typed on its own (a wrong type in one field does
//! not stop the others from being read), then the typed fields are checked
//! with `garde` rules. Unknown fields are ignored.

use std::fmt::Display;

use garde::Validate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::movie::Genre;

const TITLE_REQUIRED: &str = "Movie title is required.";
const TITLE_TYPE: &str = "Movie title must be a string";
const GENRE_REQUIRED: &str = "Movie genre is required.";
const GENRE_TYPE: &str = "Movie genre must be an array of enum Genre";
const POSTER_URL: &str = "Poster must be a valid URL";
const REQUIRED: &str = "Required";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All problems found in one payload, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    fn extend_from_report(&mut self, report: garde::Report) {
        for (path, error) in report.iter() {
            let field = path.to_string();
            let message = match field.as_str() {
                "poster" => POSTER_URL.to_string(),
                _ => error.message().to_string(),
            };
            self.push(field, message);
        }
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A complete, validated movie payload, ready to be stored under a new id.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateMovie {
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: u32,
    pub rate: f64,
    pub poster: String,
    pub genre: Vec<Genre>,
}

impl CreateMovie {
    /// Validates a full payload; every field except `rate` must be present.
    pub fn from_json(payload: &Value) -> Result<Self, ValidationErrors> {
        let (fields, errors) = read_fields(payload, true);
        let UpdateMovie {
            title: Some(title),
            year: Some(year),
            director: Some(director),
            duration: Some(duration),
            rate,
            poster: Some(poster),
            genre: Some(genre),
        } = fields
        else {
            return Err(errors);
        };

        errors.into_result(CreateMovie {
            title,
            year,
            director,
            duration,
            rate: rate.unwrap_or(crate::DEFAULT_RATE),
            poster,
            genre,
        })
    }
}

/// Validated subset of movie fields, merged over an existing record.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct UpdateMovie {
    #[garde(length(min = 1))]
    pub title: Option<String>,
    #[garde(range(min = 1900, max = 2024))]
    pub year: Option<i32>,
    #[garde(skip)]
    pub director: Option<String>,
    #[garde(range(min = 1))]
    pub duration: Option<u32>,
    #[garde(range(min = 0.0, max = 10.0))]
    pub rate: Option<f64>,
    #[garde(url)]
    pub poster: Option<String>,
    #[garde(length(min = 1))]
    pub genre: Option<Vec<Genre>>,
}

impl UpdateMovie {
    /// Validates a partial payload; only the fields present are checked.
    pub fn from_json(payload: &Value) -> Result<Self, ValidationErrors> {
        let (fields, errors) = read_fields(payload, false);
        errors.into_result(fields)
    }

    pub fn is_empty(&self) -> bool {
        *self == UpdateMovie::default()
    }
}

fn read_fields(payload: &Value, required: bool) -> (UpdateMovie, ValidationErrors) {
    let Some(object) = payload.as_object() else {
        let mut errors = ValidationErrors::new();
        errors.push(
            "",
            format!("Expected object, received {}", json_kind(payload)),
        );
        return (UpdateMovie::default(), errors);
    };

    let mut reader = FieldReader {
        object,
        required,
        errors: ValidationErrors::new(),
    };
    let fields = UpdateMovie {
        title: reader.read("title", "string", TITLE_REQUIRED, Some(TITLE_TYPE)),
        year: reader.read_integer("year"),
        director: reader.read("director", "string", REQUIRED, None),
        duration: reader.read_integer("duration"),
        rate: reader.read_optional("rate", "number"),
        poster: reader.read("poster", "string", REQUIRED, None),
        genre: reader.read_genres(),
    };

    let mut errors = reader.errors;
    if let Err(report) = fields.validate() {
        errors.extend_from_report(report);
    }
    (fields, errors)
}

struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    required: bool,
    errors: ValidationErrors,
}

impl FieldReader<'_> {
    fn read<T: DeserializeOwned>(
        &mut self,
        field: &'static str,
        expected: &str,
        required_message: &str,
        type_message: Option<&str>,
    ) -> Option<T> {
        if self.required && !self.object.contains_key(field) {
            self.errors.push(field, required_message);
            return None;
        }
        self.read_optional_with(field, expected, type_message)
    }

    fn read_optional<T: DeserializeOwned>(
        &mut self,
        field: &'static str,
        expected: &str,
    ) -> Option<T> {
        self.read_optional_with(field, expected, None)
    }

    fn read_optional_with<T: DeserializeOwned>(
        &mut self,
        field: &'static str,
        expected: &str,
        type_message: Option<&str>,
    ) -> Option<T> {
        let value = self.object.get(field)?;
        match T::deserialize(value) {
            Ok(v) => Some(v),
            Err(_) => {
                let message = type_message.map(str::to_string).unwrap_or_else(|| {
                    format!("Expected {expected}, received {}", json_kind(value))
                });
                self.errors.push(field, message);
                None
            }
        }
    }

    /// Any JSON number with no fractional part is an integer, `1999.0` included.
    fn read_integer<T: TryFrom<i64>>(&mut self, field: &'static str) -> Option<T> {
        if self.required && !self.object.contains_key(field) {
            self.errors.push(field, REQUIRED);
            return None;
        }
        let value = self.object.get(field)?;
        let Some(number) = value.as_f64() else {
            self.errors
                .push(field, format!("Expected number, received {}", json_kind(value)));
            return None;
        };
        if number.fract() != 0.0 {
            self.errors.push(field, "Expected integer, received float");
            return None;
        }
        match T::try_from(number as i64) {
            Ok(v) => Some(v),
            Err(_) => {
                self.errors.push(field, format!("{number} is out of range"));
                None
            }
        }
    }

    /// Genres get an error per offending element rather than one for the list.
    fn read_genres(&mut self) -> Option<Vec<Genre>> {
        let values: Vec<Value> = self.read("genre", "array", GENRE_REQUIRED, Some(GENRE_TYPE))?;
        let mut genres = Vec::with_capacity(values.len());
        let mut valid = true;
        for (index, value) in values.iter().enumerate() {
            match Genre::deserialize(value) {
                Ok(genre) => genres.push(genre),
                Err(_) => {
                    valid = false;
                    self.errors.push(
                        format!("genre[{index}]"),
                        format!(
                            "Invalid enum value. Expected {}, received {value}",
                            Genre::ALL
                                .iter()
                                .map(|g| format!("'{g}'"))
                                .collect::<Vec<_>>()
                                .join(" | ")
                        ),
                    );
                }
            }
        }
        valid.then_some(genres)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
