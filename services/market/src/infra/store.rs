use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use anyhow::Context as _;
use chrono::Local;
use serde::{Deserialize as _, Serialize};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::repository::CollectionStore;

// ── JSON file store ──────────────────────────────────────────────────────────

/// One pretty-printed UTF-8 JSON document per collection: `{ "<id>": record }`.
///
/// Records that fail to deserialize are kept verbatim and written back on
/// every flush. A document that fails to parse is renamed to
/// `<name>.corrupt-<YYYYmmddHHMMSS>` before the first flush replaces it.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    skipped: Mutex<BTreeMap<String, Value>>,
    unreadable: AtomicBool,
}

/// A flushed entry: either a live record or a raw one carried through.
#[derive(Serialize)]
#[serde(untagged)]
enum Entry<'a, R> {
    Live(&'a R),
    Raw(&'a Value),
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            skipped: Mutex::new(BTreeMap::new()),
            unreadable: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    fn skipped(&self) -> anyhow::Result<MutexGuard<'_, BTreeMap<String, Value>>> {
        self.skipped
            .lock()
            .map_err(|_| anyhow::anyhow!("skipped-record lock poisoned"))
    }

    /// Rename an unreadable document out of the way. Refuses to continue if
    /// the original cannot be moved.
    fn quarantine(&self) -> anyhow::Result<()> {
        if !self.unreadable.load(Ordering::SeqCst) {
            return Ok(());
        }
        if self.path.exists() {
            let stamp = Local::now().format("%Y%m%d%H%M%S");
            let aside = self.sibling(&format!(".corrupt-{stamp}"));
            fs::rename(&self.path, &aside).with_context(|| {
                format!("move unreadable {} aside", self.path.display())
            })?;
            warn!(
                path = %self.path.display(),
                moved_to = %aside.display(),
                "unreadable collection moved aside before overwrite"
            );
        }
        self.unreadable.store(false, Ordering::SeqCst);
        Ok(())
    }
}

impl<R> CollectionStore<R> for JsonFileStore
where
    R: Serialize + DeserializeOwned,
{
    fn load(&self) -> anyhow::Result<BTreeMap<String, R>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "collection file absent, starting empty");
                return Ok(BTreeMap::new());
            }
            Err(e) => {
                self.unreadable.store(true, Ordering::SeqCst);
                return Err(e).with_context(|| format!("read {}", self.path.display()));
            }
        };

        let document: BTreeMap<String, Value> = match serde_json::from_str(&raw) {
            Ok(document) => document,
            Err(e) => {
                self.unreadable.store(true, Ordering::SeqCst);
                return Err(e).with_context(|| format!("parse {}", self.path.display()));
            }
        };

        let mut records = BTreeMap::new();
        let mut skipped = self.skipped()?;
        skipped.clear();
        for (key, value) in document {
            match R::deserialize(&value) {
                Ok(record) => {
                    records.insert(key, record);
                }
                Err(e) => {
                    warn!(path = %self.path.display(), key = %key, error = %e, "skipping unreadable record");
                    skipped.insert(key, value);
                }
            }
        }
        Ok(records)
    }

    /// Writes to a sibling temp file, then renames over the target so a crash
    /// mid-write never leaves a truncated document.
    fn flush(&self, records: &BTreeMap<String, R>) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        self.quarantine()?;

        let skipped = self.skipped()?;
        let mut document: BTreeMap<&str, Entry<'_, R>> = skipped
            .iter()
            .map(|(key, value)| (key.as_str(), Entry::Raw(value)))
            .collect();
        for (key, record) in records {
            document.insert(key.as_str(), Entry::Live(record));
        }
        let json = serde_json::to_string_pretty(&document).context("serialize collection")?;

        let temp = self.temp_path();
        let mut file =
            fs::File::create(&temp).with_context(|| format!("create {}", temp.display()))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("write {}", temp.display()))?;
        file.sync_all()
            .with_context(|| format!("sync {}", temp.display()))?;
        fs::rename(&temp, &self.path)
            .with_context(|| format!("replace {}", self.path.display()))?;
        Ok(())
    }

    fn reserved_keys(&self) -> anyhow::Result<BTreeSet<String>> {
        Ok(self.skipped()?.keys().cloned().collect())
    }
}

// ── In-memory store ──────────────────────────────────────────────────────────

/// Volatile store: keeps the last flushed collection in memory. Used for
/// tests and for running the service without a data directory.
#[derive(Debug)]
pub struct MemoryStore<R> {
    records: Mutex<BTreeMap<String, R>>,
    flushes: AtomicUsize,
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
            flushes: AtomicUsize::new(0),
        }
    }
}

impl<R> MemoryStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: BTreeMap<String, R>) -> Self {
        Self {
            records: Mutex::new(records),
            flushes: AtomicUsize::new(0),
        }
    }

    /// Number of completed flushes.
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl<R> CollectionStore<R> for MemoryStore<R>
where
    R: Clone + Send,
{
    fn load(&self) -> anyhow::Result<BTreeMap<String, R>> {
        let records = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        Ok(records.clone())
    }

    fn flush(&self, records: &BTreeMap<String, R>) -> anyhow::Result<()> {
        let mut stored = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        *stored = records.clone();
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
