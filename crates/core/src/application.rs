use crate::domain::Persona;
use crate::error::PersonaError;
use crate::ports::{PersonasRepository, PersonasStorage, Result};
use tracing::{info, warn};
use uuid::Uuid;

/// Application controller for personas: record CRUD plus bulk backup/restore
pub struct PersonasController {
    repository: Box<dyn PersonasRepository>,
    storage: Box<dyn PersonasStorage>,
}

impl PersonasController {
    /// Creates a new PersonasController with the given dependencies
    pub fn new(
        repository: Box<dyn PersonasRepository>,
        storage: Box<dyn PersonasStorage>,
    ) -> Self {
        Self {
            repository,
            storage,
        }
    }

    pub fn get_personas(&self) -> Vec<Persona> {
        self.repository.get_all()
    }

    /// Looks a persona up by id; a missing persona is an error at this layer
    pub fn get_persona(&self, id: Uuid) -> Result<Persona> {
        self.repository
            .get_by_id(id)
            .ok_or(PersonaError::NotFound(id))
    }

    pub fn get_personas_by_national_id(&self, national_id: &str) -> Vec<Persona> {
        self.repository.find_by_national_id(national_id)
    }

    pub fn save_persona(&mut self, persona: Persona) -> Result<Persona> {
        Ok(self.repository.save(persona))
    }

    pub fn update_persona(&mut self, persona: &Persona) -> Result<Persona> {
        self.repository.update(persona)
    }

    /// Deletes by id, turning "nothing deleted" into `NotFound`
    pub fn delete_persona(&mut self, id: Uuid) -> Result<Persona> {
        self.repository.try_delete(id).ok_or_else(|| {
            warn!(%id, "delete requested for unknown persona");
            PersonaError::NotFound(id)
        })
    }

    pub fn delete_persona_record(&mut self, persona: &Persona) -> Result<Persona> {
        self.repository.delete_or_fail(persona)
    }

    /// Replaces the repository contents with the set held by the storage medium
    pub fn restore_data(&mut self) -> Vec<Persona> {
        let restored = self.storage.restore();
        self.load_personas(&restored);
        info!(count = restored.len(), "restored personas");
        restored
    }

    /// Replaces the repository contents with `personas`, keeping their order
    pub fn load_personas(&mut self, personas: &[Persona]) {
        for current in self.repository.get_all() {
            self.repository.try_delete(current.id());
        }
        for persona in personas {
            self.repository.save(persona.clone());
        }
    }

    /// Writes the repository's current contents to the storage medium
    pub fn backup_data(&self) -> bool {
        let personas = self.repository.get_all();
        let ok = self.storage.backup(&personas);
        if ok {
            info!(count = personas.len(), "backed up personas");
        } else {
            warn!(count = personas.len(), "backup failed");
        }
        ok
    }
}
