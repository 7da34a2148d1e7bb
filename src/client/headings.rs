//! Table-of-contents heading tracker
//!
//! Mirrors what `js/devlog.js` does in the browser: watch the level-2 and
//! level-3 headings of an article and remember which one was last seen
//! entering the observation band near the top of the viewport.

use serde::Serialize;

use crate::config::TocConfig;
use crate::content::TocItem;

/// The part of the viewport in which a heading counts as "current"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewportBand {
    /// Pixels cut from the top of the viewport
    pub top_margin_px: u32,
    /// Percentage cut from the bottom of the viewport
    pub bottom_percent: u8,
}

impl Default for ViewportBand {
    fn default() -> Self {
        Self {
            top_margin_px: 100,
            bottom_percent: 80,
        }
    }
}

impl From<&TocConfig> for ViewportBand {
    fn from(config: &TocConfig) -> Self {
        Self {
            top_margin_px: config.top_margin,
            bottom_percent: config.bottom_percent.min(100),
        }
    }
}

impl ViewportBand {
    /// IntersectionObserver `rootMargin` for this band
    pub fn root_margin(&self) -> String {
        format!(
            "-{}px 0px -{}% 0px",
            self.top_margin_px, self.bottom_percent
        )
    }

    /// Whether an element whose top edge sits at `element_top` (relative to
    /// the viewport) lies inside the band
    pub fn contains(&self, element_top: f64, viewport_height: f64) -> bool {
        let top = self.top_margin_px as f64;
        let bottom = viewport_height * (1.0 - self.bottom_percent as f64 / 100.0);
        element_top >= top && element_top < bottom
    }
}

/// One visibility notification for one heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intersection {
    pub id: String,
    pub is_intersecting: bool,
}

impl Intersection {
    pub fn entering(id: &str) -> Self {
        Self {
            id: id.to_string(),
            is_intersecting: true,
        }
    }

    pub fn leaving(id: &str) -> Self {
        Self {
            id: id.to_string(),
            is_intersecting: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrackerState {
    /// No headings observed
    #[default]
    Idle,
    Tracking {
        headings: Vec<TocItem>,
        active: Option<String>,
    },
}

/// State machine behind the "On This Page" highlight
#[derive(Debug, Clone, Default)]
pub struct HeadingTracker {
    band: ViewportBand,
    state: TrackerState,
}

impl HeadingTracker {
    pub fn new(band: ViewportBand) -> Self {
        Self {
            band,
            state: TrackerState::Idle,
        }
    }

    pub fn band(&self) -> &ViewportBand {
        &self.band
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, TrackerState::Tracking { .. })
    }

    /// Headings currently observed, in document order
    pub fn headings(&self) -> &[TocItem] {
        match &self.state {
            TrackerState::Idle => &[],
            TrackerState::Tracking { headings, .. } => headings,
        }
    }

    /// Id of the active heading
    pub fn active(&self) -> Option<&str> {
        match &self.state {
            TrackerState::Idle => None,
            TrackerState::Tracking { active, .. } => active.as_deref(),
        }
    }

    /// Start observing the headings of a freshly shown article.
    ///
    /// Only level-2 and level-3 headings are kept. With none left the tracker
    /// stays idle.
    pub fn discover<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = TocItem>,
    {
        let headings: Vec<TocItem> = items
            .into_iter()
            .filter(|item| matches!(item.level, 2 | 3))
            .collect();

        self.state = if headings.is_empty() {
            TrackerState::Idle
        } else {
            TrackerState::Tracking {
                headings,
                active: None,
            }
        };
    }

    /// Apply one batch of notifications; the last intersecting heading wins.
    /// Returns the active heading afterwards.
    pub fn observe(&mut self, batch: &[Intersection]) -> Option<&str> {
        if let TrackerState::Tracking { headings, active } = &mut self.state {
            for record in batch.iter().filter(|r| r.is_intersecting) {
                if headings.iter().any(|h| h.id == record.id) {
                    *active = Some(record.id.clone());
                }
            }
        }
        self.active()
    }

    /// Feed heading positions measured against a viewport of `viewport_height`
    pub fn observe_positions(
        &mut self,
        positions: &[(String, f64)],
        viewport_height: f64,
    ) -> Option<&str> {
        let band = self.band;
        let batch: Vec<Intersection> = positions
            .iter()
            .map(|(id, top)| Intersection {
                id: id.clone(),
                is_intersecting: band.contains(*top, viewport_height),
            })
            .collect();
        self.observe(&batch)
    }

    /// Release every observed heading (navigation or teardown)
    pub fn reset(&mut self) {
        self.state = TrackerState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, level: u8) -> TocItem {
        TocItem {
            id: id.to_string(),
            text: id.to_string(),
            level,
        }
    }

    fn tracker_with(ids: &[&str]) -> HeadingTracker {
        let mut tracker = HeadingTracker::default();
        tracker.discover(ids.iter().map(|id| item(id, 2)));
        tracker
    }

    #[test]
    fn test_root_margin() {
        assert_eq!(ViewportBand::default().root_margin(), "-100px 0px -80% 0px");
        let band = ViewportBand::from(&TocConfig {
            top_margin: 80,
            bottom_percent: 150,
        });
        assert_eq!(band.root_margin(), "-80px 0px -100% 0px");
    }

    #[test]
    fn test_band_contains() {
        let band = ViewportBand::default();
        // 1000px viewport: band is [100, 200)
        assert!(!band.contains(50.0, 1000.0));
        assert!(band.contains(100.0, 1000.0));
        assert!(band.contains(199.0, 1000.0));
        assert!(!band.contains(200.0, 1000.0));
    }

    #[test]
    fn test_starts_idle() {
        let tracker = HeadingTracker::default();
        assert_eq!(tracker.state(), &TrackerState::Idle);
        assert!(tracker.headings().is_empty());
        assert_eq!(tracker.active(), None);
    }

    #[test]
    fn test_discover_keeps_h2_h3_in_order() {
        let mut tracker = HeadingTracker::default();
        tracker.discover(vec![item("a", 2), item("b", 4), item("c", 3), item("d", 1)]);
        assert!(tracker.is_tracking());
        let ids: Vec<_> = tracker.headings().iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(tracker.active(), None);
    }

    #[test]
    fn test_discover_nothing_stays_idle() {
        let mut tracker = HeadingTracker::default();
        tracker.discover(vec![item("deep", 4)]);
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn test_last_observed_wins() {
        let mut tracker = tracker_with(&["intro", "setup", "usage"]);
        let active = tracker.observe(&[
            Intersection::entering("setup"),
            Intersection::entering("intro"),
            Intersection::leaving("usage"),
        ]);
        assert_eq!(active, Some("intro"));

        // Leaving notifications never clear the active heading
        tracker.observe(&[Intersection::leaving("intro")]);
        assert_eq!(tracker.active(), Some("intro"));

        tracker.observe(&[Intersection::entering("usage")]);
        assert_eq!(tracker.active(), Some("usage"));
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut tracker = tracker_with(&["intro"]);
        tracker.observe(&[Intersection::entering("intro"), Intersection::entering("footer")]);
        assert_eq!(tracker.active(), Some("intro"));
    }

    #[test]
    fn test_idle_ignores_notifications() {
        let mut tracker = HeadingTracker::default();
        assert_eq!(tracker.observe(&[Intersection::entering("intro")]), None);
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn test_observe_positions() {
        let mut tracker = tracker_with(&["one", "two", "three"]);
        let positions = vec![
            ("one".to_string(), -400.0),
            ("two".to_string(), 150.0),
            ("three".to_string(), 700.0),
        ];
        assert_eq!(tracker.observe_positions(&positions, 1000.0), Some("two"));
    }

    #[test]
    fn test_reset_on_navigation() {
        let mut tracker = tracker_with(&["intro"]);
        tracker.observe(&[Intersection::entering("intro")]);
        tracker.reset();
        assert_eq!(tracker.state(), &TrackerState::Idle);
        assert_eq!(tracker.active(), None);

        tracker.discover(vec![item("next-post", 2)]);
        assert_eq!(tracker.active(), None);
        assert_eq!(tracker.headings().len(), 1);
    }
}
