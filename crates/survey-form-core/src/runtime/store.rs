// crates/survey-form-core/src/runtime/store.rs
// ============================================================================
// Module: Survey Form In-Memory Store
// Description: Simple in-memory survey store for tests and local runs.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides an in-memory implementation of [`SurveyStore`] for
//! tests and local demos, plus [`SharedSurveyStore`] for handing any store
//! to concurrent request handlers. Records vanish on restart.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::ResponseId;
use crate::core::SurveyResponse;
use crate::interfaces::StoreError;
use crate::interfaces::SurveyStore;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Mutable state behind the in-memory store lock.
#[derive(Debug, Default)]
struct InMemoryState {
    /// Last identifier handed out.
    last_id: i64,
    /// Stored responses keyed by identifier.
    records: BTreeMap<ResponseId, SurveyResponse>,
}

/// In-memory survey store for tests and examples.
///
/// # Invariants
/// - Identifiers start at 1 and increase by one per record.
#[derive(Debug, Default, Clone)]
pub struct InMemorySurveyStore {
    /// Store state protected by a mutex.
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemorySurveyStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored responses.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store mutex is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Store("survey store mutex poisoned".to_string()))?;
        Ok(guard.records.len())
    }

    /// Returns true when no responses are stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store mutex is poisoned.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Returns a stored response by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store mutex is poisoned.
    pub fn get(&self, id: ResponseId) -> Result<Option<SurveyResponse>, StoreError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Store("survey store mutex poisoned".to_string()))?;
        Ok(guard.records.get(&id).cloned())
    }

    /// Returns every stored response in identifier order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store mutex is poisoned.
    pub fn records(&self) -> Result<Vec<(ResponseId, SurveyResponse)>, StoreError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Store("survey store mutex poisoned".to_string()))?;
        Ok(guard.records.iter().map(|(id, response)| (*id, response.clone())).collect())
    }
}

impl SurveyStore for InMemorySurveyStore {
    fn create(&self, response: &SurveyResponse) -> Result<ResponseId, StoreError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Store("survey store mutex poisoned".to_string()))?;
        let next = guard
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Store("survey store identifier overflow".to_string()))?;
        let id = ResponseId::new(next);
        guard.last_id = next;
        guard.records.insert(id, response.clone());
        drop(guard);
        Ok(id)
    }
}

// ============================================================================
// SECTION: Shared Store
// ============================================================================

/// Shared survey store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedSurveyStore {
    /// Inner store implementation.
    inner: Arc<dyn SurveyStore + Send + Sync>,
}

impl SharedSurveyStore {
    /// Wraps a survey store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl SurveyStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn SurveyStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl SurveyStore for SharedSurveyStore {
    fn create(&self, response: &SurveyResponse) -> Result<ResponseId, StoreError> {
        self.inner.create(response)
    }

    fn readiness(&self) -> Result<(), StoreError> {
        self.inner.readiness()
    }
}
