// wow-workflow/src/core/context_data.rs
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared, lockable state threaded through every handler of a pipeline run.
///
/// Cloning is cheap and yields another handle onto the same data, so a caller
/// can keep one handle and inspect the outcome after the run finishes.
///
/// Guards are `parking_lot` guards: never hold one across an `.await`.
#[derive(Debug)]
pub struct ContextData<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> ContextData<T> {
  pub fn new(data: T) -> Self {
    ContextData(Arc::new(RwLock::new(data)))
  }

  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read()
  }

  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write()
  }

  /// Replaces the value inside the lock and returns the previous one.
  pub fn replace(&self, data: T) -> T {
    std::mem::replace(&mut *self.0.write(), data)
  }
}

impl<T: Send + Sync + Clone + 'static> ContextData<T> {
  /// Clones the current value out of the lock.
  pub fn snapshot(&self) -> T {
    self.0.read().clone()
  }
}

impl<T: Send + Sync + 'static> Clone for ContextData<T> {
  fn clone(&self) -> Self {
    ContextData(Arc::clone(&self.0))
  }
}

impl<T: Send + Sync + Default + 'static> Default for ContextData<T> {
  fn default() -> Self {
    Self::new(T::default())
  }
}
