use std::fmt;

/// Errors surfaced by the mapping engine.
///
/// Malformed rows, unknown columns and unparseable numbers are never errors; they
/// are skipped and the affected field keeps its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// A sequence of records to encode was empty.
    EmptyInput,
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::EmptyInput => write!(f, "no records to encode"),
        }
    }
}

impl std::error::Error for MapError {}

/// Errors returned when building a [`Point`](crate::point::Point).
#[derive(Debug, Clone, PartialEq)]
pub enum PointError {
    /// The measurement name was empty.
    MissingMeasurement,
    /// The point had no fields.
    NoFields,
    /// A float field was NaN or infinite.
    NonFiniteField(String),
}

impl fmt::Display for PointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointError::MissingMeasurement => write!(f, "point has an empty measurement name"),
            PointError::NoFields => write!(f, "point has no fields"),
            PointError::NonFiniteField(key) => {
                write!(f, "field '{key}' is not a finite number")
            }
        }
    }
}

impl std::error::Error for PointError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_error_display() {
        let display = format!("{}", MapError::EmptyInput);
        assert!(display.contains("no records"));
    }

    #[test]
    fn test_point_error_display() {
        let display = format!("{}", PointError::NonFiniteField("temperature".to_string()));
        assert!(display.contains("temperature"));

        let display = format!("{}", PointError::NoFields);
        assert!(display.contains("no fields"));
    }

    #[test]
    fn test_errors_are_std_errors() {
        let err: Box<dyn std::error::Error> = Box::new(MapError::EmptyInput);
        assert!(err.source().is_none());
    }
}
