//! Load a project, transform it, and write it back only if it changed.
//!
//! Every write is preceded by a copy of the untouched file to a timestamped
//! backup next to it, so a bad refactor is undone by copying the backup back.

pub mod selector;
pub mod transform;

pub use selector::Selector;
pub use transform::{transform_instances, transform_layouts, transform_objects, Edit, LayoutView};

use crate::error::{RefactorError, Result};
use crate::project::document::Document;
use crate::project::Project;
use chrono::Utc;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Settings for a single refactor run.
#[derive(Debug, Clone)]
pub struct RefactorOptions {
    /// Project file to load and rewrite.
    pub path: PathBuf,
    /// Run the transform but never touch the file.
    pub read_only: bool,
    /// Copy the original file aside before overwriting it.
    pub backup: bool,
    /// File name prefix for backups.
    pub backup_prefix: String,
}

impl RefactorOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            read_only: false,
            backup: true,
            backup_prefix: "backup".to_string(),
        }
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

/// What a refactor run did to the project file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefactorOutcome {
    /// The transform left the document as it was.
    Unchanged { project_path: PathBuf },
    /// The transform changed the document, but the run was read-only.
    ReadOnly { project_path: PathBuf },
    /// The document was rewritten.
    Written {
        project_path: PathBuf,
        backup_path: Option<PathBuf>,
    },
}

impl RefactorOutcome {
    pub fn project_path(&self) -> &Path {
        match self {
            Self::Unchanged { project_path }
            | Self::ReadOnly { project_path }
            | Self::Written { project_path, .. } => project_path,
        }
    }
}

/// Run `mutation` against the project at `options.path`.
///
/// An error from the mutation aborts the run before anything is written.
pub fn refactor<F, E>(options: &RefactorOptions, mutation: F) -> std::result::Result<RefactorOutcome, E>
where
    F: FnOnce(&mut Project) -> std::result::Result<(), E>,
    E: From<RefactorError>,
{
    let project_path = absolute(&options.path)?;
    debug!("Loading project: {}", project_path.display());

    let original = Document::load(&project_path)?;
    let mut project = original.project()?;

    mutation(&mut project)?;

    let edited = original.with_project(&project)?;
    if edited == original {
        info!("No changes to {}", project_path.display());
        return Ok(RefactorOutcome::Unchanged { project_path });
    }

    if options.read_only {
        info!("Read-only: not writing changes to {}", project_path.display());
        return Ok(RefactorOutcome::ReadOnly { project_path });
    }

    let backup_path = if options.backup {
        Some(write_backup(&project_path, &options.backup_prefix)?)
    } else {
        None
    };

    write_in_place(&project_path, &edited.to_pretty_string()?)?;
    info!("Wrote {}", project_path.display());

    Ok(RefactorOutcome::Written {
        project_path,
        backup_path,
    })
}

/// Backup location for `project_path`: `<prefix>-<epoch millis>.<file name>`
/// in the same directory.
pub fn backup_path_for(project_path: &Path, prefix: &str, millis: i64) -> PathBuf {
    let file_name = project_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = project_path.parent().unwrap_or_else(|| Path::new("."));
    dir.join(format!("{}-{}.{}", prefix, millis, file_name))
}

fn write_backup(project_path: &Path, prefix: &str) -> Result<PathBuf> {
    let backup = backup_path_for(project_path, prefix, Utc::now().timestamp_millis());
    std::fs::copy(project_path, &backup).map_err(|source| RefactorError::Backup {
        path: project_path.to_path_buf(),
        backup: backup.clone(),
        source,
    })?;
    info!("Backed up to {}", backup.display());
    Ok(backup)
}

/// Replace `project_path` with `content` through a temporary file in the same
/// directory, so the project is either fully old or fully new.
fn write_in_place(project_path: &Path, content: &str) -> Result<()> {
    let write_error = |source: std::io::Error| RefactorError::Write {
        path: project_path.to_path_buf(),
        source,
    };
    let dir = project_path.parent().unwrap_or_else(|| Path::new("."));

    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(content.as_bytes()).map_err(write_error)?;
    let permissions = std::fs::metadata(project_path).map_err(write_error)?.permissions();
    file.as_file().set_permissions(permissions).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;

    debug!("Replacing {} from {}", project_path.display(), file.path().display());
    file.persist(project_path).map_err(|e| write_error(e.error))?;
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|source| RefactorError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PROJECT: &str = r#"{
  "firstLayout": "L_1",
  "layouts": [
    {
      "name": "L_1",
      "instances": [
        {
          "name": "BindIndicator",
          "layer": "",
          "x": 10,
          "y": 20,
          "zOrder": 1
        }
      ],
      "layers": [],
      "objects": []
    }
  ]
}
"#;

    fn setup() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("unbound.json");
        std::fs::write(&path, PROJECT).unwrap();
        (dir, path)
    }

    fn backups(dir: &TempDir) -> Vec<PathBuf> {
        std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.file_name().unwrap().to_string_lossy().starts_with("backup-"))
            .collect()
    }

    #[test]
    fn test_unchanged_does_not_write() {
        let (dir, path) = setup();
        let outcome = refactor(&RefactorOptions::new(&path), |_| Ok::<_, RefactorError>(())).unwrap();

        assert!(matches!(outcome, RefactorOutcome::Unchanged { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), PROJECT);
        assert!(backups(&dir).is_empty());
    }

    #[test]
    fn test_read_only_does_not_write() {
        let (dir, path) = setup();
        let options = RefactorOptions::new(&path).read_only(true);
        let outcome = refactor(&options, |project| {
            project.layouts[0].instances[0].x = 99.0;
            Ok::<_, RefactorError>(())
        })
        .unwrap();

        assert!(matches!(outcome, RefactorOutcome::ReadOnly { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), PROJECT);
        assert!(backups(&dir).is_empty());
    }

    #[test]
    fn test_written_with_backup() {
        let (dir, path) = setup();
        let outcome = refactor(&RefactorOptions::new(&path), |project| {
            project.layouts[0].instances[0].x = 99.0;
            Ok::<_, RefactorError>(())
        })
        .unwrap();

        let RefactorOutcome::Written { backup_path, .. } = outcome else {
            panic!("expected the project to be written");
        };
        let backup_path = backup_path.unwrap();
        assert_eq!(std::fs::read_to_string(&backup_path).unwrap(), PROJECT);
        assert_eq!(backups(&dir), vec![backup_path]);

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, PROJECT.replace("\"x\": 10", "\"x\": 99"));
    }

    #[test]
    fn test_write_leaves_no_temporary_files() {
        let (dir, path) = setup();
        let mut options = RefactorOptions::new(&path);
        options.backup = false;

        refactor(&options, |project| {
            project.layouts[0].instances[0].y = 4.0;
            Ok::<_, RefactorError>(())
        })
        .unwrap();

        let entries: Vec<PathBuf> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries, vec![path.clone()]);
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"y\": 4"));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_keeps_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, path) = setup();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        refactor(&RefactorOptions::new(&path), |project| {
            project.layouts[0].instances[0].y = 4.0;
            Ok::<_, RefactorError>(())
        })
        .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_backup_can_be_disabled() {
        let (dir, path) = setup();
        let mut options = RefactorOptions::new(&path);
        options.backup = false;

        let outcome = refactor(&options, |project| {
            project.layouts[0].instances.clear();
            Ok::<_, RefactorError>(())
        })
        .unwrap();

        assert_eq!(
            outcome,
            RefactorOutcome::Written {
                project_path: path.clone(),
                backup_path: None
            }
        );
        assert!(backups(&dir).is_empty());
    }

    #[test]
    fn test_mutation_error_aborts() {
        let (dir, path) = setup();
        let result = refactor(&RefactorOptions::new(&path), |project| {
            project.layouts.clear();
            Err(RefactorError::UnknownLayout("Nope".to_string()))
        });

        assert!(matches!(result, Err(RefactorError::UnknownLayout(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), PROJECT);
        assert!(backups(&dir).is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let options = RefactorOptions::new(dir.path().join("missing.json"));
        let result = refactor(&options, |_| Ok::<_, RefactorError>(()));
        assert!(matches!(result, Err(RefactorError::Read { .. })));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let (_dir, path) = setup();
        std::fs::write(&path, "{ not json").unwrap();
        let result = refactor(&RefactorOptions::new(&path), |_| Ok::<_, RefactorError>(()));
        assert!(matches!(result, Err(RefactorError::Parse { .. })));
    }

    #[test]
    fn test_backup_path_for() {
        let path = Path::new("/games/unbound/unbound.json");
        assert_eq!(
            backup_path_for(path, "backup", 1_600_000_000_000),
            PathBuf::from("/games/unbound/backup-1600000000000.unbound.json")
        );
    }
}
