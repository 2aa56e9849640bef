// shop_api/src/cart/storage.rs

//! Key-value persistence underneath the cart.

use crate::cart::CartError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// String values stored under string keys.
pub trait CartStorage: Send + Sync {
  fn load(&self, key: &str) -> Result<Option<String>, CartError>;
  fn save(&self, key: &str, value: &str) -> Result<(), CartError>;
  fn remove(&self, key: &str) -> Result<(), CartError>;
}

#[derive(Debug, Default)]
pub struct MemoryCartStorage {
  values: Mutex<HashMap<String, String>>,
}

impl MemoryCartStorage {
  pub fn new() -> Self {
    Self::default()
  }
}

impl CartStorage for MemoryCartStorage {
  fn load(&self, key: &str) -> Result<Option<String>, CartError> {
    Ok(self.values.lock().get(key).cloned())
  }

  fn save(&self, key: &str, value: &str) -> Result<(), CartError> {
    self.values.lock().insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), CartError> {
    self.values.lock().remove(key);
    Ok(())
  }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileCartStorage {
  dir: PathBuf,
}

impl FileCartStorage {
  /// Creates `dir` if it does not exist yet.
  pub fn open(dir: impl AsRef<Path>) -> Result<Self, CartError> {
    std::fs::create_dir_all(dir.as_ref())?;
    Ok(Self {
      dir: dir.as_ref().to_path_buf(),
    })
  }

  fn path_for(&self, key: &str) -> PathBuf {
    self.dir.join(format!("{}.json", key))
  }
}

impl CartStorage for FileCartStorage {
  fn load(&self, key: &str) -> Result<Option<String>, CartError> {
    match std::fs::read_to_string(self.path_for(key)) {
      Ok(contents) => Ok(Some(contents)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  fn save(&self, key: &str, value: &str) -> Result<(), CartError> {
    // Replaced atomically through a sibling temp file.
    let path = self.path_for(key);
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, value)?;
    std::fs::rename(&tmp, &path)?;
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), CartError> {
    match std::fs::remove_file(self.path_for(key)) {
      Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
      _ => Ok(()),
    }
  }
}
