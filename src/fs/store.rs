use serde::Serialize;
#[cfg(test)]
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::models::Database;

/// Persistence seam for the whole collection.
///
/// Every mutation in the tracker is followed by a full `save`; there is no
/// batching.
pub trait TaskStore {
    fn load(&self) -> Result<Database, StoreError>;
    fn save(&self, db: &Database) -> Result<(), StoreError>;

    /// Move an unreadable backing file out of the way so the next `save`
    /// does not overwrite it. Stores without a file have nothing to do.
    fn quarantine(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// JSON 文件存储（database.json）
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "database.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Where [`TaskStore::quarantine`] moves an unreadable file
    pub fn corrupt_backup_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "database.json".into());
        name.push(".corrupt");
        self.path.with_file_name(name)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// 4 空格缩进，非 ASCII 字符不转义
pub fn to_pretty_json(db: &Database) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    db.serialize(&mut ser).map_err(StoreError::Serialize)?;
    buf.push(b'\n');
    Ok(buf)
}

impl TaskStore for JsonFileStore {
    fn load(&self) -> Result<Database, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no database file yet");
            return Ok(Database::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| io_error(&self.path, e))?;
        let db: Database =
            serde_json::from_str(&content).map_err(|source| StoreError::CorruptState {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), users = db.users.len(), "database loaded");
        Ok(db)
    }

    fn save(&self, db: &Database) -> Result<(), StoreError> {
        // 确保目录存在
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
            }
        }

        let bytes = to_pretty_json(db)?;
        let tmp = self.temp_path();

        // 先写临时文件再重命名，避免写到一半崩溃导致文件损坏
        fs::write(&tmp, bytes).map_err(|e| io_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| io_error(&self.path, e))?;

        debug!(path = %self.path.display(), users = db.users.len(), "database saved");
        Ok(())
    }

    fn quarantine(&self) -> Result<(), StoreError> {
        if !self.path.exists() {
            return Ok(());
        }
        let backup = self.corrupt_backup_path();
        warn!(
            path = %self.path.display(),
            backup = %backup.display(),
            "moving corrupt database aside"
        );
        fs::rename(&self.path, &backup).map_err(|e| io_error(&self.path, e))
    }
}

/// In-memory store for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    db: RefCell<Database>,
    saves: RefCell<usize>,
    fail_saves: RefCell<bool>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new(db: Database) -> Self {
        Self {
            db: RefCell::new(db),
            saves: RefCell::new(0),
            fail_saves: RefCell::new(false),
        }
    }

    pub fn snapshot(&self) -> Database {
        self.db.borrow().clone()
    }

    /// 已执行的 save 次数
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }

    /// 模拟磁盘写入失败
    pub fn set_fail_saves(&self, fail: bool) {
        *self.fail_saves.borrow_mut() = fail;
    }
}

#[cfg(test)]
impl TaskStore for MemoryStore {
    fn load(&self) -> Result<Database, StoreError> {
        Ok(self.db.borrow().clone())
    }

    fn save(&self, db: &Database) -> Result<(), StoreError> {
        if *self.fail_saves.borrow() {
            return Err(StoreError::Io {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::other("disk full"),
            });
        }
        *self.db.borrow_mut() = db.clone();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
