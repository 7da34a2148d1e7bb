//! Models of the browser-side behaviour shipped in `js/devlog.js`

pub mod headings;
pub mod theme;

pub use headings::{HeadingTracker, Intersection, TrackerState, ViewportBand};
pub use theme::{MemoryStore, PreferenceStore, Theme, ThemeContext, ThemeDefault, STORAGE_KEY};
