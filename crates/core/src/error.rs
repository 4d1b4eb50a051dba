use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the core when an identifier-keyed target is missing.
///
/// The message is shown to API callers verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersonaError {
    #[error("Persona no encontrada con id: {0}")]
    NotFound(Uuid),
}
