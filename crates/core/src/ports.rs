use crate::domain::Persona;
use crate::error::PersonaError;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, PersonaError>;

/// CRUD store for personas, keyed by identifier.
///
/// Reads and `try_delete` treat absence as a normal outcome. `update` and
/// `delete_or_fail` were handed a record the caller believed to exist, so they
/// report absence as `PersonaError::NotFound`.
pub trait PersonasRepository {
    /// All records in insertion order
    fn get_all(&self) -> Vec<Persona>;

    fn get_by_id(&self, id: Uuid) -> Option<Persona>;

    /// Records sharing the given national ID, in insertion order
    fn find_by_national_id(&self, national_id: &str) -> Vec<Persona>;

    /// Appends unconditionally; saving the same record twice stores it twice
    fn save(&mut self, persona: Persona) -> Persona;

    /// Overwrites name, age and national ID of the record with the same identifier
    fn update(&mut self, persona: &Persona) -> Result<Persona>;

    /// Removes the record with the same identifier, failing if there is none
    fn delete_or_fail(&mut self, persona: &Persona) -> Result<Persona>;

    /// Removes the record with this identifier, if any
    fn try_delete(&mut self, id: Uuid) -> Option<Persona>;
}

/// Bulk backup/restore of the full record set to an external medium.
///
/// Implementations keep their own error types; the core only sees the outcome.
pub trait PersonasStorage {
    fn restore(&self) -> Vec<Persona>;

    fn backup(&self, personas: &[Persona]) -> bool;
}
