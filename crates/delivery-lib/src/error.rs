use thiserror::Error;

/// Convenient result alias for the delivery library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when no map matches the requested name.
    #[error("map not found: {name}")]
    MapNotFound { name: String },

    /// Raised when a location label does not appear in the selected map.
    #[error("unknown location: {name}{}", format_suggestions(.suggestions))]
    UnknownLocation {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when no walk connects the origin to the destination.
    #[error("no path found between {origin} and {destination}")]
    PathNotFound { origin: String, destination: String },

    /// Raised when the fuel price or vehicle autonomy cannot be used for pricing.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Raised when a map fails validation before it is stored.
    #[error("invalid map: {message}")]
    InvalidMap { message: String },

    /// Raised when a map with the same name already exists.
    #[error("a map named {name} already exists")]
    DuplicateMap { name: String },

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON encoding and decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error belongs to the not-found family (map, location, or path).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::MapNotFound { .. } | Error::UnknownLocation { .. } | Error::PathNotFound { .. }
        )
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
