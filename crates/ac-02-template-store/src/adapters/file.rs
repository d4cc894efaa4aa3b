//! File-backed template store
//!
//! Keeps the whole template map in memory and rewrites a single JSON file
//! (an object keyed by template id) on every mutation. Writes go to a
//! temp file first and are renamed into place. The in-memory map only
//! changes after the file write succeeded, so a failed save or delete
//! leaves both views on the previous state.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use shared_types::ChartTemplate;
use tracing::{debug, info, warn};

use super::memory::InMemoryTemplateStore;
use crate::errors::StoreError;
use crate::ports::TemplateStore;

/// Template store persisted to a JSON file.
pub struct FileTemplateStore {
    inner: InMemoryTemplateStore,
    path: PathBuf,
    /// Serializes mutations, from snapshot to swap.
    write_lock: Mutex<()>,
}

impl FileTemplateStore {
    /// Open the store at `path`, loading existing templates.
    ///
    /// A missing file starts an empty store. Templates in the file that
    /// fail validation are skipped with a warning.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let templates = Self::load(&path)?;

        info!(path = %path.display(), templates = templates.len(), "Template file opened");

        Ok(Self {
            inner: InMemoryTemplateStore::from_map(templates),
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<HashMap<String, ChartTemplate>, StoreError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(io_error(path, e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(HashMap::new());
        }

        let stored: BTreeMap<String, ChartTemplate> = serde_json::from_slice(&bytes)?;
        let mut templates = HashMap::with_capacity(stored.len());

        for (id, template) in stored {
            if let Err(e) = template.validate() {
                warn!(template_id = %id, error = %e, "Skipping invalid stored template");
                continue;
            }
            templates.insert(template.id.clone(), template);
        }
        Ok(templates)
    }

    /// Write `templates` as the new file contents. Caller holds `write_lock`.
    fn persist(&self, templates: HashMap<String, ChartTemplate>) -> Result<(), StoreError> {
        let all: BTreeMap<_, _> = templates.into_iter().collect();
        let bytes = serde_json::to_vec_pretty(&all)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
            }
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| io_error(&temp_path, e))?;
        file.write_all(&bytes).map_err(|e| io_error(&temp_path, e))?;
        file.sync_all().map_err(|e| io_error(&temp_path, e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| io_error(&self.path, e))?;

        debug!(path = %self.path.display(), templates = all.len(), "Template file written");
        Ok(())
    }
}

impl TemplateStore for FileTemplateStore {
    fn get(&self, id: &str) -> Option<ChartTemplate> {
        self.inner.get(id)
    }

    fn save(&self, template: ChartTemplate) -> Result<(), StoreError> {
        template.validate()?;
        let _guard = self.write_lock.lock();

        let mut next = self.inner.snapshot();
        next.insert(template.id.clone(), template.clone());
        self.persist(next)?;

        self.inner.insert_unchecked(template);
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();

        let mut next = self.inner.snapshot();
        if next.remove(id).is_none() {
            return Ok(false);
        }
        self.persist(next)?;

        self.inner.delete(id)
    }

    fn get_all(&self) -> BTreeMap<String, ChartTemplate> {
        self.inner.get_all()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

fn io_error(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}
