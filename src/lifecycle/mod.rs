//! Keyed ownership of live visualizations.
//!
//! Each slot holds at most one live handle. A render bumps the slot's
//! generation, tears down whatever was there, and only installs its result
//! if no newer render or destroy happened while the renderer was working.

pub mod renderer;

pub use self::renderer::{
    ChartKind, ChartPayload, RenderError, Series, TablePayload, VisualPayload, VisualRenderer,
};

use crate::status::{StatusLevel, StatusSink, TracingStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey(String);

impl SlotKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SlotKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    NoData,
    Error(String),
}

/// Observable lifecycle phase of a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    Empty,
    Pending,
    Active,
    Failed(FailureKind),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    Rendered { generation: u64 },
    NoData,
    /// A newer render or a destroy claimed the slot first; the result was
    /// released without being installed.
    Superseded,
    Failed(RenderError),
}

impl RenderOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, RenderOutcome::Rendered { .. })
    }
}

enum Phase<H> {
    Empty,
    Pending,
    Active(H),
    Failed(FailureKind),
}

struct SlotEntry<H> {
    generation: u64,
    phase: Phase<H>,
}

impl<H> Default for SlotEntry<H> {
    fn default() -> Self {
        Self {
            generation: 0,
            phase: Phase::Empty,
        }
    }
}

impl<H> SlotEntry<H> {
    /// Claims the slot for a new operation, handing back any live handle.
    fn claim(&mut self, next: Phase<H>) -> (u64, Option<H>) {
        self.generation += 1;
        let previous = std::mem::replace(&mut self.phase, next);
        let handle = match previous {
            Phase::Active(h) => Some(h),
            _ => None,
        };
        (self.generation, handle)
    }
}

pub struct InstanceManager<R: VisualRenderer> {
    renderer: Arc<R>,
    slots: Mutex<HashMap<SlotKey, SlotEntry<R::Handle>>>,
    status: Arc<dyn StatusSink>,
}

impl<R: VisualRenderer> InstanceManager<R> {
    pub fn new(renderer: Arc<R>) -> Self {
        Self::with_status(renderer, Arc::new(TracingStatus))
    }

    pub fn with_status(renderer: Arc<R>, status: Arc<dyn StatusSink>) -> Self {
        Self {
            renderer,
            slots: Mutex::new(HashMap::new()),
            status,
        }
    }

    pub fn renderer(&self) -> &Arc<R> {
        &self.renderer
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SlotKey, SlotEntry<R::Handle>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn render(&self, slot: impl Into<SlotKey>, payload: VisualPayload) -> RenderOutcome {
        self.render_checked(slot, payload, |_| true).await
    }

    /// Renders `payload` into `slot` if `validate` accepts it. A rejected
    /// payload still clears the slot and leaves it in the no-data state.
    pub async fn render_checked<F>(
        &self,
        slot: impl Into<SlotKey>,
        payload: VisualPayload,
        validate: F,
    ) -> RenderOutcome
    where
        F: FnOnce(&VisualPayload) -> bool,
    {
        let slot = slot.into();
        let accepted = validate(&payload);
        let next = if accepted {
            Phase::Pending
        } else {
            Phase::Failed(FailureKind::NoData)
        };

        let (generation, stale) = self.lock().entry(slot.clone()).or_default().claim(next);
        if let Some(handle) = stale {
            debug!("🧹 Releasing previous instance in '{}'", slot);
            self.renderer.destroy(handle);
        }

        if !accepted {
            debug!("📭 No data for '{}'", slot);
            return RenderOutcome::NoData;
        }

        let result = self.renderer.create(&slot, &payload).await;

        let mut slots = self.lock();
        let entry = slots.entry(slot.clone()).or_default();
        if entry.generation != generation {
            drop(slots);
            debug!(
                "⏭️ Render gen {} for '{}' superseded, discarding",
                generation, slot
            );
            if let Ok(handle) = result {
                self.renderer.destroy(handle);
            }
            return RenderOutcome::Superseded;
        }

        match result {
            Ok(handle) => {
                entry.phase = Phase::Active(handle);
                debug!("📊 '{}' active at gen {}", slot, generation);
                RenderOutcome::Rendered { generation }
            }
            Err(e) => {
                entry.phase = Phase::Failed(FailureKind::Error(e.to_string()));
                drop(slots);
                warn!("❌ Render failed for '{}': {}", slot, e);
                self.status
                    .report(StatusLevel::Error, "status.chartError", &e.to_string());
                RenderOutcome::Failed(e)
            }
        }
    }

    /// Releases whatever the slot holds and invalidates in-flight renders.
    /// Safe on unknown or already-empty slots.
    pub fn destroy(&self, slot: &SlotKey) {
        let stale = {
            let mut slots = self.lock();
            match slots.get_mut(slot) {
                Some(entry) => entry.claim(Phase::Empty).1,
                None => None,
            }
        };
        if let Some(handle) = stale {
            debug!("🗑️ Destroyed '{}'", slot);
            self.renderer.destroy(handle);
        }
    }

    pub fn destroy_all(&self) {
        let keys: Vec<SlotKey> = self.lock().keys().cloned().collect();
        for key in &keys {
            self.destroy(key);
        }
    }

    pub fn slot_state(&self, slot: &SlotKey) -> SlotState {
        match self.lock().get(slot).map(|e| &e.phase) {
            None | Some(Phase::Empty) => SlotState::Empty,
            Some(Phase::Pending) => SlotState::Pending,
            Some(Phase::Active(_)) => SlotState::Active,
            Some(Phase::Failed(kind)) => SlotState::Failed(kind.clone()),
        }
    }

    pub fn generation(&self, slot: &SlotKey) -> u64 {
        self.lock().get(slot).map_or(0, |e| e.generation)
    }

    /// Active slots, sorted by key.
    pub fn active_slots(&self) -> Vec<SlotKey> {
        let mut keys: Vec<SlotKey> = self
            .lock()
            .iter()
            .filter(|(_, e)| matches!(e.phase, Phase::Active(_)))
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Inspects the live handle in `slot`, if any.
    pub fn with_active<T>(&self, slot: &SlotKey, f: impl FnOnce(&R::Handle) -> T) -> Option<T> {
        match self.lock().get(slot).map(|e| &e.phase) {
            Some(Phase::Active(handle)) => Some(f(handle)),
            _ => None,
        }
    }
}

impl<R: VisualRenderer> Drop for InstanceManager<R> {
    fn drop(&mut self) {
        let slots = std::mem::take(self.slots.get_mut().unwrap_or_else(PoisonError::into_inner));
        for (_, entry) in slots {
            if let Phase::Active(handle) = entry.phase {
                self.renderer.destroy(handle);
            }
        }
    }
}
