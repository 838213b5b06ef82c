//! Error types.

use crate::value::RecordId;
use thiserror::Error;

/// A malformed schema, or a request naming something the schema does not
/// define.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("{0} id must not be empty")]
    EmptyIdentifier(&'static str),

    #[error("field '{0}' is defined more than once")]
    DuplicateField(String),

    #[error("filter '{0}' is defined more than once")]
    DuplicateFilter(String),

    #[error("filter '{filter}' has more than one option with value '{value}'")]
    DuplicateOptionValue { filter: String, value: String },

    #[error("action '{0}' is defined more than once")]
    DuplicateAction(String),

    #[error("field '{0}' not found in schema")]
    UnknownField(String),

    #[error("field '{0}' is not sortable")]
    NotSortable(String),

    #[error("filter '{0}' not found in schema")]
    UnknownFilter(String),

    #[error("action '{0}' not found in schema")]
    UnknownAction(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A resource repository rejected an operation. The base collection was
    /// left as it was before the call.
    #[error("repository {operation} failed: {source}")]
    Collaborator {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("record {0} not found")]
    UnknownRecord(RecordId),
}

impl EngineError {
    pub(crate) fn collaborator<E>(operation: &'static str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        EngineError::Collaborator {
            operation,
            source: Box::new(err),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, EngineError::Configuration(_))
    }

    pub fn is_collaborator(&self) -> bool {
        matches!(self, EngineError::Collaborator { .. })
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ConfigurationError::DuplicateOptionValue {
            filter: "status".to_string(),
            value: "Active".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "filter 'status' has more than one option with value 'Active'"
        );

        let err: EngineError = ConfigurationError::UnknownField("age".to_string()).into();
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "field 'age' not found in schema");
    }

    #[test]
    fn test_collaborator_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
        let err = EngineError::collaborator("update", io);
        assert!(err.is_collaborator());
        assert_eq!(err.to_string(), "repository update failed: connection reset");
        assert!(std::error::Error::source(&err).is_some());
    }
}
