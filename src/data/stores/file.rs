use super::PopulationStore;
use crate::data::codec;
use crate::data::validator::PopulationValidator;
use crate::engines::generation::seed::seed_population;
use crate::error::{Result, StorageError};
use crate::types::{Population, PopulationShape};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Population persisted as one versioned JSON document.
pub struct JsonFileStore {
    path: PathBuf,
    shape: PopulationShape,
    seed_voices: usize,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P, shape: PopulationShape, seed_voices: usize) -> Self {
        Self {
            path: path.into(),
            shape,
            seed_voices,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PopulationStore for JsonFileStore {
    fn load(&mut self) -> Result<Population> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let population = codec::decode(&text, &self.shape)?;
                log::debug!(
                    "Loaded generation {} from {}",
                    population.generation,
                    self.path.display()
                );
                Ok(population)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No population at {}, seeding", self.path.display());
                self.reset()
            }
            Err(source) => Err(StorageError::Read {
                path: self.path.clone(),
                source,
            }
            .into()),
        }
    }

    fn save(&mut self, population: &Population) -> Result<()> {
        PopulationValidator::validate_population(population, &self.shape)?;
        let text = codec::encode(population, &self.shape)?;
        atomic_write(&self.path, text.as_bytes())?;
        log::debug!(
            "Saved generation {} to {}",
            population.generation,
            self.path.display()
        );
        Ok(())
    }

    fn reset(&mut self) -> Result<Population> {
        let population = seed_population(&self.shape, self.seed_voices)?;
        self.save(&population)?;
        Ok(population)
    }

    fn shape(&self) -> PopulationShape {
        self.shape
    }
}

/// Write `contents` next to `path`, flush it to disk, then rename over `path`.
///
/// Readers see either the old file or the new one, never a partial write.
/// Each call writes through its own temp file, so concurrent writers never
/// clobber each other's partial output; the last rename wins.
pub fn atomic_write(path: &Path, contents: &[u8]) -> std::result::Result<(), StorageError> {
    let write_error = |source: std::io::Error| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }

    let tmp = temp_path(path);
    if let Err(source) = write_synced(&tmp, contents).and_then(|_| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(write_error(source));
    }
    Ok(())
}

fn write_synced(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(
        ".{}.{}.tmp",
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    path.with_file_name(name)
}
