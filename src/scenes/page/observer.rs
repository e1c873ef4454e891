//! Viewport intersection tracking for page elements.
//!
//! An observer reports an element once when it is first seen and afterwards
//! only when its intersecting state flips.
use std::{collections::HashMap, hash::Hash};

use super::sections::PageSpan;

/// Signed root margin. Negative values shrink the observed viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Margin {
    Px(f32),
    Percent(f32),
}

impl Margin {
    fn resolve(self, viewport_height: f32) -> f32 {
        match self {
            Self::Px(px) => px,
            Self::Percent(percent) => viewport_height * percent / 100.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f32,
    pub margin_top: Margin,
    pub margin_bottom: Margin,
}

impl ObserverOptions {
    pub const fn threshold(threshold: f32) -> Self {
        Self {
            threshold,
            margin_top: Margin::Px(0.0),
            margin_bottom: Margin::Px(0.0),
        }
    }

    pub const fn with_margins(mut self, top: Margin, bottom: Margin) -> Self {
        self.margin_top = top;
        self.margin_bottom = bottom;
        self
    }

    pub fn root(&self, viewport: Viewport) -> (f32, f32) {
        let top = viewport.top - self.margin_top.resolve(viewport.height);
        let bottom =
            viewport.top + viewport.height + self.margin_bottom.resolve(viewport.height);
        (top, bottom)
    }

    pub fn is_intersecting(&self, overlap: f32, ratio: f32) -> bool {
        if self.threshold <= 0.0 {
            overlap > 0.0
        } else {
            ratio >= self.threshold
        }
    }
}

/// Visible page window in page coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub top: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub intersecting: bool,
    pub ratio: f32,
}

fn overlap(span: PageSpan, root: (f32, f32)) -> f32 {
    (span.bottom().min(root.1) - span.top.max(root.0)).max(0.0)
}

pub fn intersection_ratio(span: PageSpan, viewport: Viewport, options: &ObserverOptions) -> f32 {
    if span.height <= 0.0 {
        return 0.0;
    }
    overlap(span, options.root(viewport)) / span.height
}

#[derive(Clone, Debug)]
pub struct IntersectionObserver<K> {
    options: ObserverOptions,
    states: HashMap<K, bool>,
}

impl<K: Eq + Hash + Copy> IntersectionObserver<K> {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            states: HashMap::new(),
        }
    }

    /// Measures `key` against the viewport. Returns an entry on first
    /// observation and whenever the intersecting state changes.
    pub fn observe(
        &mut self,
        key: K,
        span: PageSpan,
        viewport: Viewport,
    ) -> Option<IntersectionEntry> {
        let overlap = overlap(span, self.options.root(viewport));
        let ratio = if span.height > 0.0 {
            overlap / span.height
        } else {
            0.0
        };
        let intersecting = self.options.is_intersecting(overlap, ratio);
        match self.states.insert(key, intersecting) {
            Some(previous) if previous == intersecting => None,
            _ => Some(IntersectionEntry {
                intersecting,
                ratio,
            }),
        }
    }

    pub fn unobserve(&mut self, key: K) {
        self.states.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT_HEIGHT: f32 = 1000.0;

    fn at(top: f32) -> Viewport {
        Viewport {
            top,
            height: VIEWPORT_HEIGHT,
        }
    }

    #[test]
    fn chapter_margins_shrink_the_root_to_a_band_near_the_top() {
        let options = ObserverOptions::threshold(0.0)
            .with_margins(Margin::Percent(-20.0), Margin::Percent(-60.0));
        assert_eq!(options.root(at(0.0)), (200.0, 400.0));

        let below_band = PageSpan::new(450.0, 300.0);
        assert_eq!(intersection_ratio(below_band, at(0.0), &options), 0.0);
        assert!(intersection_ratio(below_band, at(100.0), &options) > 0.0);
    }

    #[test]
    fn threshold_ratio_is_inclusive() {
        let options = ObserverOptions::threshold(0.3);
        let span = PageSpan::new(700.0, 1000.0);
        let ratio = intersection_ratio(span, at(0.0), &options);
        assert_eq!(ratio, 0.3);
        assert!(options.is_intersecting(300.0, ratio));
    }

    #[test]
    fn observer_reports_first_sight_and_flips_only() {
        let mut observer = IntersectionObserver::new(ObserverOptions::threshold(0.1));
        let span = PageSpan::new(1500.0, 500.0);

        assert_eq!(
            observer.observe("item", span, at(0.0)),
            Some(IntersectionEntry {
                intersecting: false,
                ratio: 0.0
            })
        );
        assert_eq!(observer.observe("item", span, at(100.0)), None);

        let entry = observer.observe("item", span, at(1000.0)).expect("flip");
        assert!(entry.intersecting);
        assert_eq!(observer.observe("item", span, at(1100.0)), None);

        let entry = observer.observe("item", span, at(0.0)).expect("flip back");
        assert!(!entry.intersecting);
    }

    #[test]
    fn negative_bottom_margin_delays_entry() {
        let options = ObserverOptions::threshold(0.1).with_margins(Margin::Px(0.0), Margin::Px(-50.0));
        let span = PageSpan::new(1000.0, 100.0);
        assert_eq!(intersection_ratio(span, at(50.0), &options), 0.0);
        assert!(intersection_ratio(span, at(70.0), &options) >= 0.1);
    }
}
