//! JSON file night store.
//!
//! The whole table lives in memory and is rewritten to disk after every
//! mutation (write to a sibling temp file, then rename). File I/O runs on the
//! blocking pool so callers on the async runtime never block on disk.
//!
//! A mutation writes the file and commits the in-memory table on the same
//! blocking task. Dropping the caller's future (cancellation, timeout) cannot
//! separate the two.

use super::table::{NightTable, TableFile};
use async_trait::async_trait;
use sleep_application::{NightStore, StoreError};
use sleep_domain::{NightId, SleepNight};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

/// Night store persisted as a single JSON document
pub struct JsonFileNightStore {
    path: PathBuf,
    table: Arc<Mutex<NightTable>>,
    tx: Arc<watch::Sender<Vec<SleepNight>>>,
}

impl JsonFileNightStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let load_path = path.clone();
        let table = run_blocking(move || load_table(&load_path)).await?;
        info!(path = %path.display(), nights = table.len(), "night store opened");

        let (tx, _) = watch::channel(table.snapshot());
        Ok(Self {
            path,
            table: Arc::new(Mutex::new(table)),
            tx: Arc::new(tx),
        })
    }

    /// `$XDG_DATA_HOME/sleep-tracker/nights.json` (or the platform equivalent).
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("sleep-tracker").join("nights.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the table, persist it, then commit.
    ///
    /// The blocking task owns the table lock until the commit, so the next
    /// mutation always starts from what is on disk. On a write failure the
    /// in-memory table is left as it was.
    async fn mutate<T, F>(&self, change: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut NightTable) -> Result<T, StoreError>,
        T: Send + 'static,
    {
        let mut table = self.table.clone().lock_owned().await;
        let mut next = table.clone();
        let value = change(&mut next)?;

        let path = self.path.clone();
        let tx = self.tx.clone();
        run_blocking(move || {
            save_table(&path, &next.to_file())?;
            *table = next;
            tx.send_replace(table.snapshot());
            Ok(value)
        })
        .await
    }
}

#[async_trait]
impl NightStore for JsonFileNightStore {
    fn all_nights(&self) -> watch::Receiver<Vec<SleepNight>> {
        self.tx.subscribe()
    }

    async fn current_night(&self) -> Result<Option<SleepNight>, StoreError> {
        Ok(self.table.lock().await.current())
    }

    async fn get(&self, id: NightId) -> Result<Option<SleepNight>, StoreError> {
        Ok(self.table.lock().await.get(id))
    }

    async fn insert(&self, night: &SleepNight) -> Result<NightId, StoreError> {
        let id = self.mutate(|table| Ok(table.insert(night))).await?;
        debug!(%id, "night inserted");
        Ok(id)
    }

    async fn update(&self, night: &SleepNight) -> Result<(), StoreError> {
        self.mutate(|table| table.update(night)).await?;
        debug!(id = %night.id, "night updated");
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        self.mutate(|table| {
            table.clear();
            Ok(())
        })
        .await?;
        debug!("all nights deleted");
        Ok(())
    }
}

async fn run_blocking<T, F>(job: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| StoreError::Other(format!("store worker failed: {}", e)))?
}

fn load_table(path: &Path) -> Result<NightTable, StoreError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no store file yet, starting empty");
            return Ok(NightTable::default());
        }
        Err(e) => return Err(e.into()),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        warn!(path = %path.display(), "store file is empty, starting empty");
        return Ok(NightTable::default());
    }
    let file: TableFile = serde_json::from_slice(&bytes)?;
    NightTable::from_file(file)
}

fn save_table(path: &Path, file: &TableFile) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("json.tmp");
    {
        let mut writer = std::io::BufWriter::new(std::fs::File::create(&tmp)?);
        serde_json::to_writer_pretty(&mut writer, file)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}
