/*!
 # Preference store

 Holds the single current [`UserPreference`] and guards every write.
 A failed update leaves the previous record in place.
*/

use tracing::{debug, info, instrument, warn};

use crate::color::Rgb;
use crate::preference::{PreferenceDraft, RangePolicy, UserPreference, GROUP_COUNT};
use crate::{Error, Result};

/// Owner of the current preference record
#[derive(Debug, Clone, Default)]
pub struct PreferenceStore {
    /// Record handed out to readers
    current: UserPreference,
    /// Treatment of out-of-range scalars on `set`
    policy: RangePolicy,
}

impl PreferenceStore {
    /// Creates a store holding the default record, rejecting bad input
    pub const fn new() -> Self {
        Self::with_policy(RangePolicy::Reject)
    }

    /// Creates a store holding the default record under `policy`
    pub const fn with_policy(policy: RangePolicy) -> Self {
        Self {
            current: UserPreference::new(),
            policy,
        }
    }

    /// How out-of-range scalars are treated on `set`
    pub fn policy(&self) -> RangePolicy {
        self.policy
    }

    /// Read-only view of the current record
    pub fn get(&self) -> &UserPreference {
        &self.current
    }

    /// Replaces the whole record.
    ///
    /// # Arguments
    ///
    /// * `draft` - The new values; a [`UserPreference`] converts losslessly
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPreference`] when a scalar is out of range (under the
    /// reject policy) or the preset list does not hold exactly
    /// [`GROUP_COUNT`] colors.
    #[instrument(skip(self, draft))]
    pub fn set(&mut self, draft: impl Into<PreferenceDraft>) -> Result<()> {
        let draft = draft.into();
        let pref = draft
            .validate(self.policy)
            .inspect_err(|e| warn!("Rejected preference update: {}", e))?;

        self.current = pref;
        info!("Preference record replaced");
        debug!("New record: {}", self.current);
        Ok(())
    }

    /// Updates the preset color of one group.
    ///
    /// # Arguments
    ///
    /// * `index` - Group index (0-5)
    /// * `color` - The new preset color
    #[instrument(skip(self))]
    pub fn set_group_color(&mut self, index: i64, color: Rgb) -> Result<()> {
        let slot = group_slot(index)?;
        self.current.led_preset[slot] = color;
        info!("Group {} preset set to {}", slot, color);
        Ok(())
    }

    /// Preset color of one group
    pub fn group_color(&self, index: i64) -> Result<Rgb> {
        Ok(self.current.led_preset[group_slot(index)?])
    }

    /// Restores the documented defaults
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.current = UserPreference::new();
        info!("Preference record reset to defaults");
    }

    /// Flags the record as matching storage
    pub fn mark_saved(&mut self) {
        debug!("Marking preference record as saved");
        self.current.saved = 1;
    }

    /// Flags the record as transient
    pub fn mark_unsaved(&mut self) {
        debug!("Marking preference record as unsaved");
        self.current.saved = 0;
    }
}

fn group_slot(index: i64) -> Result<usize> {
    match usize::try_from(index) {
        Ok(slot) if slot < GROUP_COUNT => Ok(slot),
        _ => {
            warn!("Group index {} out of range (0-{})", index, GROUP_COUNT - 1);
            Err(Error::IndexOutOfRange(index))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, BLUE, GREEN, RED, WHITE};
    use crate::preference::PreferenceError;

    fn sample() -> UserPreference {
        UserPreference {
            saved: 1,
            brightness: 0,
            color_mode: 3,
            rainbow_time: 255,
            hue: 200,
            saturation: 17,
            led_preset: [RED, GREEN, BLUE, WHITE, Rgb::new(1, 2, 3), BLACK],
        }
    }

    #[test]
    fn initialize_then_get_yields_defaults() {
        let store = PreferenceStore::new();
        let pref = store.get();
        assert_eq!(pref.saved, 0);
        assert_eq!(pref.brightness, 130);
        assert_eq!(pref.color_mode, 0);
        assert_eq!(pref.rainbow_time, 192);
        assert_eq!(pref.hue, 0);
        assert_eq!(pref.saturation, 255);
        assert_eq!(pref.led_preset, [Rgb::default(); GROUP_COUNT]);
        assert_eq!(store.policy(), RangePolicy::Reject);
    }

    #[test]
    fn set_then_get_returns_same_record() {
        let mut store = PreferenceStore::new();
        store.set(sample()).unwrap();
        assert_eq!(*store.get(), sample());

        let edges = UserPreference {
            saved: 255,
            brightness: 255,
            color_mode: 255,
            rainbow_time: 0,
            hue: 255,
            saturation: 0,
            led_preset: [WHITE; GROUP_COUNT],
        };
        store.set(PreferenceDraft::from(edges)).unwrap();
        assert_eq!(*store.get(), edges);
    }

    #[test]
    fn set_group_color_touches_only_that_group() {
        for index in 0..GROUP_COUNT {
            let mut store = PreferenceStore::new();
            store.set(sample()).unwrap();
            let color = Rgb::new(9, 8, 7);

            store.set_group_color(index as i64, color).unwrap();

            let pref = store.get();
            for (i, entry) in pref.led_preset.iter().enumerate() {
                if i == index {
                    assert_eq!(*entry, color);
                } else {
                    assert_eq!(*entry, sample().led_preset[i]);
                }
            }
            assert_eq!(store.group_color(index as i64).unwrap(), color);
        }
    }

    #[test]
    fn out_of_range_group_index_is_rejected() {
        let mut store = PreferenceStore::new();
        store.set(sample()).unwrap();

        for index in [6, -1, i64::MAX, i64::MIN] {
            assert_eq!(
                store.set_group_color(index, RED),
                Err(Error::IndexOutOfRange(index))
            );
            assert_eq!(store.group_color(index), Err(Error::IndexOutOfRange(index)));
        }
        assert_eq!(*store.get(), sample());
    }

    #[test]
    fn index_error_message_uses_group_count() {
        let err = PreferenceStore::new().set_group_color(-1, RED).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Group index -1 out of range (0..{GROUP_COUNT})")
        );
    }

    #[test]
    fn wrong_preset_count_keeps_prior_record() {
        let mut store = PreferenceStore::new();
        store.set(sample()).unwrap();

        for count in [5, 7] {
            let draft = PreferenceDraft {
                led_preset: vec![GREEN; count],
                ..PreferenceDraft::from(sample())
            };
            assert_eq!(
                store.set(draft),
                Err(Error::InvalidPreference(PreferenceError::PresetCount(count)))
            );
            assert_eq!(*store.get(), sample());
        }
    }

    #[test]
    fn out_of_range_scalar_keeps_prior_record() {
        let mut store = PreferenceStore::new();
        store.set(sample()).unwrap();

        let draft = PreferenceDraft {
            saturation: 300,
            ..Default::default()
        };
        assert!(matches!(
            store.set(draft),
            Err(Error::InvalidPreference(PreferenceError::FieldOutOfRange {
                field: "saturation",
                value: 300,
            }))
        ));
        assert_eq!(*store.get(), sample());
    }

    #[test]
    fn clamp_policy_store_accepts_out_of_range_scalars() {
        let mut store = PreferenceStore::with_policy(RangePolicy::Clamp);
        let draft = PreferenceDraft {
            brightness: 999,
            hue: -5,
            ..Default::default()
        };
        store.set(draft).unwrap();
        assert_eq!(store.get().brightness, 255);
        assert_eq!(store.get().hue, 0);
    }

    #[test]
    fn reset_and_saved_flag() {
        let mut store = PreferenceStore::new();
        store.set(sample()).unwrap();
        store.mark_unsaved();
        assert!(!store.get().is_saved());
        store.mark_saved();
        assert!(store.get().is_saved());

        store.reset();
        assert_eq!(*store.get(), UserPreference::new());
    }
}
