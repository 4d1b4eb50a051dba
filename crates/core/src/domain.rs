use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// A single person record.
///
/// The identifier is generated once at construction and never changes; it is
/// the only key the repository uses to find a record. Equality is structural
/// over every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    id: Uuid,
    pub name: String,
    pub age: u32,
    pub national_id: String,
}

impl Persona {
    /// Creates a new Persona with a freshly generated identifier
    pub fn new(name: impl Into<String>, age: u32, national_id: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, age, national_id)
    }

    /// Rebuilds a Persona whose identifier is already known (e.g. read back from a backup)
    pub fn with_id(
        id: Uuid,
        name: impl Into<String>,
        age: u32,
        national_id: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            national_id: national_id.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_age(&mut self, age: u32) {
        self.age = age;
    }

    pub fn set_national_id(&mut self, national_id: impl Into<String>) {
        self.national_id = national_id.into();
    }

    /// Copies the mutable fields of `other` into `self`, keeping the identifier
    pub(crate) fn overwrite_from(&mut self, other: &Persona) {
        self.name.clone_from(&other.name);
        self.age = other.age;
        self.national_id.clone_from(&other.national_id);
    }
}

impl Display for Persona {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) {} [{}]",
            self.name, self.age, self.national_id, self.id
        )
    }
}
