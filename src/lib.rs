/*!
 # LED Strip User Preference Library

 A Rust library holding the user-selected settings of an addressable LED
 strip: brightness, color mode, rainbow timing, hue, saturation and one
 preset color per LED group.

 ## Features

 * Preference record with documented defaults
 * Validated replacement of the whole record
 * Per-group preset color updates
 * Reject or clamp policy for out-of-range values
 * Shared, lock-protected store with change notification

 ## Example

 ```rust
 use ledpref::*;

 fn main() -> Result<()> {
     let mut store = PreferenceStore::new();
     assert_eq!(store.get().brightness, 130);

     store.set_group_color(2, Rgb::new(255, 0, 0))?;
     assert_eq!(store.group_color(2)?, RED);

     Ok(())
 }
 ```
*/

use thiserror::Error;

/// Custom error types for the LED preference library
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A field or the preset count violates its declared range or size
    #[error("Invalid preference: {0}")]
    InvalidPreference(#[from] PreferenceError),

    /// Group index outside 0..GROUP_COUNT
    #[error("Group index {0} out of range (0..{count})", count = GROUP_COUNT)]
    IndexOutOfRange(i64),

    /// Color text could not be parsed
    #[error("Invalid color '{0}', expected R,G,B or #rrggbb")]
    InvalidColor(String),
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

pub mod color;
pub mod preference;
pub mod shared;
pub mod store;

// Re-export key types
pub use color::{Rgb, BLACK, BLUE, GREEN, RED, WHITE};
pub use preference::{
    PreferenceDraft, PreferenceError, RangePolicy, UserPreference, DEFAULT_BRIGHTNESS,
    DEFAULT_COLOR_MODE, DEFAULT_HUE, DEFAULT_RAINBOW_TIME, DEFAULT_SATURATION, DEFAULT_SAVED,
    GROUP_COUNT,
};
pub use shared::{Revision, SharedPreferences};
pub use store::PreferenceStore;
