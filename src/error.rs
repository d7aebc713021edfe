use crate::synth::SynthesisState;
use std::fmt;

/// Resource configuration error
///
/// Fatal for the resource being assembled. A catalog run records the error
/// against that resource and carries on with the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The resource marker does not name an entity
    MissingEntity {
        /// Type declaring the resource marker
        resource: String,
    },
    /// The entity named by a resource marker is not declared in the catalog
    UnknownType {
        /// Type declaring the resource marker
        resource: String,
        /// Unresolved type id
        type_id: String,
    },
    /// A DTO given by simple name matches more than one declared type
    AmbiguousDto {
        /// Type declaring the resource marker
        resource: String,
        /// Simple name as written
        name: String,
        /// Every declared type id carrying that simple name
        candidates: Vec<String>,
    },
    /// Two members resolve to the same relation name
    DuplicateRelation {
        /// Entity type owning the relations
        resource: String,
        /// Relation name declared twice
        relation: String,
    },
    /// A marker value could not be interpreted
    InvalidMarkerValue {
        /// Member carrying the marker (e.g. `shop.OrderController#list`)
        location: String,
        /// Flattened key (e.g. `method`, `dtoConfig/list`)
        key: String,
        /// Offending value
        value: String,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::MissingEntity { resource } => {
                write!(
                    f,
                    "Resource configuration error in '{resource}': the resource marker does not name an entity"
                )
            }
            ConfigurationError::UnknownType { resource, type_id } => {
                write!(
                    f,
                    "Resource configuration error in '{resource}': entity type '{type_id}' is not declared"
                )
            }
            ConfigurationError::AmbiguousDto {
                resource,
                name,
                candidates,
            } => {
                write!(
                    f,
                    "Resource configuration error in '{resource}': DTO '{name}' is ambiguous, candidates: {}",
                    candidates.join(", ")
                )
            }
            ConfigurationError::DuplicateRelation { resource, relation } => {
                write!(
                    f,
                    "Resource configuration error in '{resource}': relation '{relation}' is declared more than once"
                )
            }
            ConfigurationError::InvalidMarkerValue {
                location,
                key,
                value,
            } => {
                write!(
                    f,
                    "Resource configuration error at '{location}': invalid value '{value}' for '{key}'"
                )
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Synthesis error
///
/// Either the configuration could not be assembled or a stage was entered
/// out of order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// Assembly failed
    Configuration(ConfigurationError),
    /// A transition was requested from the wrong state
    OutOfOrder {
        /// State the transition requires
        expected: SynthesisState,
        /// State the resource was in
        actual: SynthesisState,
    },
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisError::Configuration(err) => write!(f, "{err}"),
            SynthesisError::OutOfOrder { expected, actual } => {
                write!(
                    f,
                    "Synthesis stage out of order: expected {expected:?}, resource is {actual:?}"
                )
            }
        }
    }
}

impl std::error::Error for SynthesisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SynthesisError::Configuration(err) => Some(err),
            SynthesisError::OutOfOrder { .. } => None,
        }
    }
}

impl From<ConfigurationError> for SynthesisError {
    fn from(err: ConfigurationError) -> Self {
        SynthesisError::Configuration(err)
    }
}
