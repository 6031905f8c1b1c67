/*!
 # User preference record

 The settings a user picks for the strip, with one preset color per group.
 A constructed [`UserPreference`] always satisfies its invariants: every
 scalar is a byte and the preset array has exactly [`GROUP_COUNT`] entries.
 Unchecked input arrives as a [`PreferenceDraft`] and is validated under a
 [`RangePolicy`].
*/

use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::color::{Rgb, BLACK};
use crate::Result;

/// Number of LED groups that carry a preset color
pub const GROUP_COUNT: usize = 6;

/// Fresh records are not yet in storage
pub const DEFAULT_SAVED: u8 = 0;
/// Default output level
pub const DEFAULT_BRIGHTNESS: u8 = 130;
/// Default lighting mode discriminator
pub const DEFAULT_COLOR_MODE: u8 = 0;
/// Default rainbow cycle time
pub const DEFAULT_RAINBOW_TIME: u8 = 192;
/// Default static hue
pub const DEFAULT_HUE: u8 = 0;
/// Default static saturation (full)
pub const DEFAULT_SATURATION: u8 = 255;

/// Why a draft could not become a [`UserPreference`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreferenceError {
    /// Scalar outside the byte range
    #[error("{field} value {value} out of range (0..=255)")]
    FieldOutOfRange { field: &'static str, value: i64 },

    /// Preset list with the wrong number of entries
    #[error("expected {count} preset colors, got {0}", count = GROUP_COUNT)]
    PresetCount(usize),
}

/// How out-of-range scalars in a draft are handled
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RangePolicy {
    /// Fail with [`PreferenceError::FieldOutOfRange`]
    #[default]
    Reject,
    /// Limit the value to 0..=255 and log a warning
    Clamp,
}

/// User-selected lighting parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserPreference {
    /// Non-zero when the record matches what is in storage
    pub saved: u8,
    /// Overall light output level
    pub brightness: u8,
    /// Lighting mode discriminator, interpreted by the output side
    pub color_mode: u8,
    /// Speed of the rainbow color cycle
    pub rainbow_time: u8,
    /// Color angle for static color mode
    pub hue: u8,
    /// Color intensity for static color mode
    pub saturation: u8,
    /// One saved color per group
    pub led_preset: [Rgb; GROUP_COUNT],
}

impl UserPreference {
    /// Creates a record holding the documented defaults
    pub const fn new() -> Self {
        Self {
            saved: DEFAULT_SAVED,
            brightness: DEFAULT_BRIGHTNESS,
            color_mode: DEFAULT_COLOR_MODE,
            rainbow_time: DEFAULT_RAINBOW_TIME,
            hue: DEFAULT_HUE,
            saturation: DEFAULT_SATURATION,
            led_preset: [BLACK; GROUP_COUNT],
        }
    }

    /// True when `saved` is non-zero
    pub const fn is_saved(&self) -> bool {
        self.saved != 0
    }
}

impl Default for UserPreference {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{saved:{}, brightness:{}, colorMode:{}, rainbowTime:{}, hue:{}, saturation:{}, ledPreset:[",
            self.saved, self.brightness, self.color_mode, self.rainbow_time, self.hue, self.saturation
        )?;
        for (i, color) in self.led_preset.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{color}")?;
        }
        f.write_str("]}")
    }
}

/// Unchecked preference input, as received from a settings collaborator.
///
/// Scalars are wide and the preset list is growable so that bad input can be
/// represented and rejected instead of silently wrapped or truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceDraft {
    pub saved: i64,
    pub brightness: i64,
    pub color_mode: i64,
    pub rainbow_time: i64,
    pub hue: i64,
    pub saturation: i64,
    pub led_preset: Vec<Rgb>,
}

impl Default for PreferenceDraft {
    fn default() -> Self {
        UserPreference::new().into()
    }
}

impl From<UserPreference> for PreferenceDraft {
    fn from(pref: UserPreference) -> Self {
        Self {
            saved: pref.saved.into(),
            brightness: pref.brightness.into(),
            color_mode: pref.color_mode.into(),
            rainbow_time: pref.rainbow_time.into(),
            hue: pref.hue.into(),
            saturation: pref.saturation.into(),
            led_preset: pref.led_preset.to_vec(),
        }
    }
}

impl PreferenceDraft {
    /// Turns the draft into a record, applying `policy` to the scalars.
    ///
    /// A preset list of the wrong length fails under every policy.
    pub fn validate(&self, policy: RangePolicy) -> Result<UserPreference> {
        let led_preset: [Rgb; GROUP_COUNT] = self
            .led_preset
            .as_slice()
            .try_into()
            .map_err(|_| PreferenceError::PresetCount(self.led_preset.len()))?;

        let pref = UserPreference {
            saved: byte_field("saved", self.saved, policy)?,
            brightness: byte_field("brightness", self.brightness, policy)?,
            color_mode: byte_field("colorMode", self.color_mode, policy)?,
            rainbow_time: byte_field("rainbowTime", self.rainbow_time, policy)?,
            hue: byte_field("hue", self.hue, policy)?,
            saturation: byte_field("saturation", self.saturation, policy)?,
            led_preset,
        };

        debug!("Validated preference draft under {:?} policy", policy);
        Ok(pref)
    }
}

impl TryFrom<PreferenceDraft> for UserPreference {
    type Error = crate::Error;

    fn try_from(draft: PreferenceDraft) -> Result<Self> {
        draft.validate(RangePolicy::Reject)
    }
}

fn byte_field(field: &'static str, value: i64, policy: RangePolicy) -> Result<u8> {
    if let Ok(byte) = u8::try_from(value) {
        return Ok(byte);
    }

    match policy {
        RangePolicy::Reject => Err(PreferenceError::FieldOutOfRange { field, value }.into()),
        RangePolicy::Clamp => {
            let limited = value.clamp(0, u8::MAX.into()) as u8;
            warn!(
                "{} value {} out of range (0-255), limiting to {}",
                field, value, limited
            );
            Ok(limited)
        }
    }
}
