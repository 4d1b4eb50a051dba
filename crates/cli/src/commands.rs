use crate::{Command, StorageKind};
use anyhow::{bail, Context};
use json_adapter::JsonPersonasStorage;
use personas_core::ports::PersonasStorage;
use personas_core::{InMemoryPersonasRepository, Persona, PersonasController};
use sqlite_adapter::SqlitePersonasStorage;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Concrete backup medium, kept unboxed until its contents have been read
pub(crate) enum Backend {
    Json(JsonPersonasStorage),
    Sqlite(SqlitePersonasStorage),
}

impl Backend {
    pub(crate) fn new(kind: StorageKind, path: PathBuf) -> Self {
        match kind {
            StorageKind::Json => Backend::Json(JsonPersonasStorage::new(path)),
            StorageKind::Sqlite => Backend::Sqlite(SqlitePersonasStorage::new(path)),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        match self {
            Backend::Json(storage) => storage.file_path(),
            Backend::Sqlite(storage) => storage.db_path(),
        }
    }

    /// Reads the medium, keeping the failures the storage port only logs
    pub(crate) fn try_restore(&self) -> anyhow::Result<Vec<Persona>> {
        let personas = match self {
            Backend::Json(storage) => storage.try_restore()?,
            Backend::Sqlite(storage) => storage.try_restore()?,
        };
        Ok(personas)
    }

    fn into_storage(self) -> Box<dyn PersonasStorage> {
        match self {
            Backend::Json(storage) => Box::new(storage),
            Backend::Sqlite(storage) => Box::new(storage),
        }
    }
}

/// Loads the backup into a fresh in-memory store.
///
/// An unreadable backup is an error: carrying on with an empty store would
/// overwrite it on the next backup.
pub(crate) fn open_store(backend: Backend) -> anyhow::Result<(PersonasController, Vec<Persona>)> {
    let restored = backend
        .try_restore()
        .with_context(|| format!("cannot read backup at {}", backend.path().display()))?;

    let repository = Box::new(InMemoryPersonasRepository::new());
    let mut controller = PersonasController::new(repository, backend.into_storage());
    controller.load_personas(&restored);

    Ok((controller, restored))
}

fn print_all(out: &mut impl Write, personas: &[Persona]) -> anyhow::Result<()> {
    for persona in personas {
        writeln!(out, "{}", persona)?;
    }
    Ok(())
}

/// Runs one command against the store, backing it up afterwards if the command changed it
pub(crate) fn execute(
    controller: &mut PersonasController,
    restored: &[Persona],
    command: Command,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mutating = command.is_mutating();

    match command {
        Command::List => print_all(out, &controller.get_personas())?,
        Command::Get { id } => writeln!(out, "{}", controller.get_persona(id)?)?,
        Command::Find { national_id } => {
            print_all(out, &controller.get_personas_by_national_id(&national_id))?
        }
        Command::Add {
            name,
            age,
            national_id,
        } => {
            let saved = controller.save_persona(Persona::new(name, age, national_id))?;
            writeln!(out, "{}", saved)?;
        }
        Command::Update {
            id,
            name,
            age,
            national_id,
        } => {
            let mut persona = controller.get_persona(id)?;
            if let Some(name) = name {
                persona.set_name(name);
            }
            if let Some(age) = age {
                persona.set_age(age);
            }
            if let Some(national_id) = national_id {
                persona.set_national_id(national_id);
            }
            writeln!(out, "{}", controller.update_persona(&persona)?)?;
        }
        Command::Delete { id } => writeln!(out, "{}", controller.delete_persona(id)?)?,
        Command::Restore => print_all(out, restored)?,
        Command::Backup => writeln!(out, "{} personas", restored.len())?,
    }

    if mutating && !controller.backup_data() {
        bail!("backup failed, previous backup left in place");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn json_store(path: &Path) -> (PersonasController, Vec<Persona>) {
        open_store(Backend::new(StorageKind::Json, path.to_path_buf())).unwrap()
    }

    fn run_command(path: &Path, command: Command) -> anyhow::Result<String> {
        let (mut controller, restored) = json_store(path);
        let mut out = Vec::new();
        execute(&mut controller, &restored, command, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    /// Compact JSON, so any rewrite by the pretty-printing adapter changes the bytes
    fn compact_json(personas: &[Persona]) -> String {
        let items: Vec<String> = personas
            .iter()
            .map(|p| {
                format!(
                    r#"{{"id":"{}","name":"{}","age":{},"national_id":"{}"}}"#,
                    p.id(),
                    p.name,
                    p.age,
                    p.national_id
                )
            })
            .collect();
        format!("[{}]", items.join(","))
    }

    fn write_compact_backup(path: &Path, persona: &Persona) -> String {
        let content = compact_json(std::slice::from_ref(persona));
        fs::write(path, &content).unwrap();
        content
    }

    /// Storage whose backups always fail
    struct RejectingStorage;

    impl PersonasStorage for RejectingStorage {
        fn restore(&self) -> Vec<Persona> {
            Vec::new()
        }

        fn backup(&self, _personas: &[Persona]) -> bool {
            false
        }
    }

    #[test]
    fn test_add_then_list_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("personas.json");

        let added = run_command(
            &path,
            Command::Add {
                name: "Azahara".to_string(),
                age: 29,
                national_id: "53717929B".to_string(),
            },
        )
        .unwrap();
        let listed = run_command(&path, Command::List).unwrap();

        assert!(added.starts_with("Azahara (29) 53717929B ["));
        assert_eq!(listed, added);
    }

    #[test]
    fn test_update_age_keeps_other_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("personas.json");
        let p = Persona::new("Azahara", 29, "53717929B");
        write_compact_backup(&path, &p);

        run_command(
            &path,
            Command::Update {
                id: p.id(),
                name: None,
                age: Some(30),
                national_id: None,
            },
        )
        .unwrap();

        let stored = JsonPersonasStorage::new(&path).try_restore().unwrap();
        assert_eq!(stored, vec![Persona::with_id(p.id(), "Azahara", 30, "53717929B")]);
    }

    #[test]
    fn test_delete_removes_from_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("personas.json");
        let p = Persona::new("Azahara", 29, "53717929B");
        write_compact_backup(&path, &p);

        run_command(&path, Command::Delete { id: p.id() }).unwrap();

        assert!(JsonPersonasStorage::new(&path).try_restore().unwrap().is_empty());
    }

    #[test]
    fn test_read_commands_leave_backup_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("personas.json");
        let p = Persona::new("Azahara", 29, "53717929B");
        let original = write_compact_backup(&path, &p);

        let got = run_command(&path, Command::Get { id: p.id() }).unwrap();
        run_command(&path, Command::List).unwrap();
        run_command(
            &path,
            Command::Find {
                national_id: "53717929B".to_string(),
            },
        )
        .unwrap();
        let restored = run_command(&path, Command::Restore).unwrap();

        assert_eq!(got, format!("{}\n", p));
        assert_eq!(restored, got);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_get_unknown_id_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("personas.json");
        let id = Uuid::new_v4();

        let err = run_command(&path, Command::Get { id }).unwrap_err();

        assert_eq!(err.to_string(), format!("Persona no encontrada con id: {}", id));
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_backup_is_an_error() {
        let mut controller = PersonasController::new(
            Box::new(InMemoryPersonasRepository::new()),
            Box::new(RejectingStorage),
        );
        let mut out = Vec::new();

        let err = execute(
            &mut controller,
            &[],
            Command::Add {
                name: "Azahara".to_string(),
                age: 29,
                national_id: "53717929B".to_string(),
            },
            &mut out,
        )
        .unwrap_err();
        assert!(err.to_string().contains("backup failed"));

        execute(&mut controller, &[], Command::List, &mut out).unwrap();
    }

    #[test]
    fn test_unwritable_backup_path_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("personas.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep.txt"), "x").unwrap();

        let backend = Backend::new(StorageKind::Json, path.clone());
        assert!(open_store(backend).is_err());
        assert!(path.join("keep.txt").exists());
    }

    #[test]
    fn test_corrupt_json_backup_aborts_before_mutating() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("personas.json");
        let first = Persona::new("Azahara", 29, "53717929B");
        let second = Persona::new("Maria", 23, "45445454A");
        let corrupt = format!("{},", compact_json(&[first, second]));
        fs::write(&path, &corrupt).unwrap();

        let err = open_store(Backend::new(StorageKind::Json, path.clone())).err().unwrap();

        assert!(format!("{:#}", err).contains("cannot read backup at"));
        assert_eq!(fs::read_to_string(&path).unwrap(), corrupt);
    }

    #[test]
    fn test_non_sqlite_file_aborts_before_mutating() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("personas.db");
        fs::write(&path, "plain text, not a database file at all").unwrap();

        assert!(open_store(Backend::new(StorageKind::Sqlite, path.clone())).is_err());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "plain text, not a database file at all"
        );
    }

    #[test]
    fn test_sqlite_backup_then_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("personas.db");
        let p = Persona::new("Azahara", 29, "53717929B");

        let (mut controller, restored) =
            open_store(Backend::new(StorageKind::Sqlite, path.clone())).unwrap();
        controller.save_persona(p.clone()).unwrap();
        execute(&mut controller, &restored, Command::Backup, &mut Vec::new()).unwrap();

        let (controller, restored) = open_store(Backend::new(StorageKind::Sqlite, path)).unwrap();
        assert_eq!(restored, vec![p.clone()]);
        assert_eq!(controller.get_personas(), vec![p]);
    }
}
