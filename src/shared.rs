/*!
 # Shared preference store

 A cloneable handle around [`PreferenceStore`] for code that reads and
 writes preferences from several tasks. Writers are serialized by a mutex
 and every successful change is published on a watch channel, so a lighting
 output task can wait for changes instead of polling.

 The mutex is never held while the watch channel is touched. Each change
 gets a revision number under the mutex and is published afterwards; a
 publication older than what the channel already holds is dropped.
*/

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{instrument, trace};

use crate::color::Rgb;
use crate::preference::{PreferenceDraft, RangePolicy, UserPreference};
use crate::store::PreferenceStore;
use crate::Result;

/// A published record and its position in the write order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revision {
    /// Increases by one with every change, starting at 0
    pub number: u64,
    /// The record as of this revision
    pub record: UserPreference,
}

#[derive(Debug)]
struct Inner {
    store: PreferenceStore,
    last: Revision,
}

impl Inner {
    /// Records a new revision if the store no longer matches the last one
    fn next_revision(&mut self) -> Option<Revision> {
        let record = *self.store.get();
        if record == self.last.record {
            return None;
        }
        self.last = Revision {
            number: self.last.number + 1,
            record,
        };
        Some(self.last)
    }
}

/// Lock-protected preference store with change notification
#[derive(Debug, Clone)]
pub struct SharedPreferences {
    inner: Arc<Mutex<Inner>>,
    updates: Arc<watch::Sender<Revision>>,
}

impl Default for SharedPreferences {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedPreferences {
    /// Creates a shared store holding the default record
    pub fn new() -> Self {
        Self::from_store(PreferenceStore::new())
    }

    /// Creates a shared store holding the default record under `policy`
    pub fn with_policy(policy: RangePolicy) -> Self {
        Self::from_store(PreferenceStore::with_policy(policy))
    }

    /// Wraps an existing store, e.g. one already loaded from storage
    pub fn from_store(store: PreferenceStore) -> Self {
        let last = Revision {
            number: 0,
            record: *store.get(),
        };
        let (updates, _) = watch::channel(last);
        Self {
            inner: Arc::new(Mutex::new(Inner { store, last })),
            updates: Arc::new(updates),
        }
    }

    /// Snapshot of the current record
    pub fn get(&self) -> UserPreference {
        *self.inner.lock().store.get()
    }

    /// Receiver that yields the latest revision after every change.
    ///
    /// Drop any `borrow()` guard before writing from the same thread; the
    /// write waits for it.
    pub fn subscribe(&self) -> watch::Receiver<Revision> {
        self.updates.subscribe()
    }

    /// Replaces the whole record, see [`PreferenceStore::set`]
    #[instrument(skip(self, draft))]
    pub fn set(&self, draft: impl Into<PreferenceDraft>) -> Result<()> {
        self.try_update(|store| store.set(draft))
    }

    /// Updates the preset color of one group, see [`PreferenceStore::set_group_color`]
    #[instrument(skip(self))]
    pub fn set_group_color(&self, index: i64, color: Rgb) -> Result<()> {
        self.try_update(|store| store.set_group_color(index, color))
    }

    /// Preset color of one group
    pub fn group_color(&self, index: i64) -> Result<Rgb> {
        self.inner.lock().store.group_color(index)
    }

    /// Restores the documented defaults
    pub fn reset(&self) {
        self.update(PreferenceStore::reset);
    }

    /// Flags the record as matching storage
    pub fn mark_saved(&self) {
        self.update(PreferenceStore::mark_saved);
    }

    /// Flags the record as transient
    pub fn mark_unsaved(&self) {
        self.update(PreferenceStore::mark_unsaved);
    }

    /// Applies a fallible change; nothing is published when it fails
    fn try_update(&self, f: impl FnOnce(&mut PreferenceStore) -> Result<()>) -> Result<()> {
        let revision = {
            let mut inner = self.inner.lock();
            f(&mut inner.store)?;
            inner.next_revision()
        };
        self.publish(revision);
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut PreferenceStore)) {
        let revision = {
            let mut inner = self.inner.lock();
            f(&mut inner.store);
            inner.next_revision()
        };
        self.publish(revision);
    }

    /// Must be called without the store lock held
    fn publish(&self, revision: Option<Revision>) {
        let Some(revision) = revision else {
            return;
        };
        let sent = self.updates.send_if_modified(|current| {
            if revision.number <= current.number {
                return false;
            }
            *current = revision;
            true
        });
        trace!(
            "Revision {} {} to {} subscribers",
            revision.number,
            if sent { "published" } else { "superseded" },
            self.updates.receiver_count()
        );
    }
}
