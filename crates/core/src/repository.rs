use crate::domain::Persona;
use crate::error::PersonaError;
use crate::ports::{PersonasRepository, Result};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// In-memory implementation of the PersonasRepository trait
///
/// Records live in a `Vec` so enumeration keeps insertion order. Contents last
/// as long as the value itself; nothing is written anywhere.
#[derive(Debug, Default)]
pub struct InMemoryPersonasRepository {
    personas: Vec<Persona>,
}

impl InMemoryPersonasRepository {
    /// Creates an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    fn position_of(&self, id: Uuid) -> Option<usize> {
        self.personas.iter().position(|p| p.id() == id)
    }
}

impl PersonasRepository for InMemoryPersonasRepository {
    fn get_all(&self) -> Vec<Persona> {
        debug!(count = self.personas.len(), "listing personas");
        self.personas.clone()
    }

    fn get_by_id(&self, id: Uuid) -> Option<Persona> {
        debug!(%id, "looking up persona");
        self.personas.iter().find(|p| p.id() == id).cloned()
    }

    fn find_by_national_id(&self, national_id: &str) -> Vec<Persona> {
        debug!(national_id, "looking up personas by national id");
        self.personas
            .iter()
            .filter(|p| p.national_id == national_id)
            .cloned()
            .collect()
    }

    fn save(&mut self, persona: Persona) -> Persona {
        info!(id = %persona.id(), "saving persona");
        self.personas.push(persona.clone());
        persona
    }

    fn update(&mut self, persona: &Persona) -> Result<Persona> {
        let Some(stored) = self.personas.iter_mut().find(|p| p.id() == persona.id()) else {
            warn!(id = %persona.id(), "update rejected, persona not found");
            return Err(PersonaError::NotFound(persona.id()));
        };

        stored.overwrite_from(persona);
        info!(id = %stored.id(), "updated persona");
        Ok(stored.clone())
    }

    fn delete_or_fail(&mut self, persona: &Persona) -> Result<Persona> {
        let Some(index) = self.position_of(persona.id()) else {
            warn!(id = %persona.id(), "delete rejected, persona not found");
            return Err(PersonaError::NotFound(persona.id()));
        };

        let removed = self.personas.remove(index);
        info!(id = %removed.id(), "deleted persona");
        Ok(removed)
    }

    fn try_delete(&mut self, id: Uuid) -> Option<Persona> {
        let removed = self.position_of(id).map(|index| self.personas.remove(index));
        match &removed {
            Some(_) => info!(%id, "deleted persona"),
            None => debug!(%id, "nothing to delete"),
        }
        removed
    }
}
