//! Core of the personas record store: domain model, ports, the in-memory
//! repository and the controller that ties them together.

pub mod application;
pub mod domain;
pub mod error;
pub mod ports;
pub mod repository;

pub use application::PersonasController;
pub use domain::Persona;
pub use error::PersonaError;
pub use ports::{PersonasRepository, PersonasStorage};
pub use repository::InMemoryPersonasRepository;
