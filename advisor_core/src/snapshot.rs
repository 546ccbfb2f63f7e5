//! Process-wide advisor snapshot.
//!
//! Readers take an `Arc` to the current advisor and keep using it for as long
//! as they hold it. Installing a new advisor swaps the pointer; it never
//! mutates a snapshot someone is reading.

use crate::advisor::Advisor;
use once_cell::sync::Lazy;
use std::sync::{Arc, RwLock};

static CURRENT: Lazy<RwLock<Arc<Advisor>>> =
    Lazy::new(|| RwLock::new(Arc::new(Advisor::builtin())));

/// The advisor currently in effect, the built-in one until replaced
pub fn current() -> Arc<Advisor> {
    let guard = CURRENT.read().unwrap_or_else(|e| e.into_inner());
    Arc::clone(&guard)
}

/// Replace the process-wide advisor, returning the previous one
pub fn install(advisor: Advisor) -> Arc<Advisor> {
    let next = Arc::new(advisor);
    let mut guard = CURRENT.write().unwrap_or_else(|e| e.into_inner());
    tracing::info!("Installing advisor snapshot with {} courses", next.catalog().len());
    std::mem::replace(&mut *guard, next)
}
