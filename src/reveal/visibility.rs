/// An axis aligned rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// The overlapping region between two rectangles, if they touch at all.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);
        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }

    /// The fraction of this rectangle's area that lies within `viewport`.
    ///
    /// An empty rectangle counts as fully visible as long as it touches the viewport.
    pub fn intersection_ratio(&self, viewport: &Rect) -> f64 {
        let Some(intersection) = self.intersection(viewport) else {
            return 0.0;
        };
        let area = self.area();
        if area == 0.0 {
            return 1.0;
        }
        (intersection.area() / area).clamp(0.0, 1.0)
    }
}

/// A crossing of the visibility threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum VisibilityChange {
    Entered,
    Left,
}

/// Watches an element's intersection with the viewport and reports threshold crossings.
///
/// Like an intersection observer, the first observation always reports the current state.
#[derive(Clone, Debug)]
pub struct VisibilityWatcher {
    threshold: f64,
    in_view: Option<bool>,
    connected: bool,
}

impl VisibilityWatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold, in_view: None, connected: true }
    }

    /// Feed the element's current intersection ratio, returning a change if the threshold was
    /// crossed.
    pub fn observe(&mut self, ratio: f64) -> Option<VisibilityChange> {
        if !self.connected {
            return None;
        }
        let in_view = self.is_in_view(ratio);
        if self.in_view == Some(in_view) {
            return None;
        }
        self.in_view = Some(in_view);
        Some(if in_view { VisibilityChange::Entered } else { VisibilityChange::Left })
    }

    /// Stop reporting changes for good.
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    fn is_in_view(&self, ratio: f64) -> bool {
        if self.threshold <= 0.0 {
            ratio > 0.0
        } else {
            ratio >= self.threshold
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::inside(Rect::new(0.0, 10.0, 10.0, 10.0), 1.0)]
    #[case::half(Rect::new(0.0, 95.0, 10.0, 10.0), 0.5)]
    #[case::outside(Rect::new(0.0, 200.0, 10.0, 10.0), 0.0)]
    #[case::above(Rect::new(0.0, -30.0, 10.0, 10.0), 0.0)]
    #[case::quarter(Rect::new(-5.0, -5.0, 10.0, 10.0), 0.25)]
    #[case::empty_inside(Rect::new(5.0, 5.0, 0.0, 0.0), 1.0)]
    fn ratio(#[case] element: Rect, #[case] expected: f64) {
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(element.intersection_ratio(&viewport), expected);
    }

    #[test]
    fn first_observation_reports_state() {
        let mut watcher = VisibilityWatcher::new(0.4);
        assert_eq!(watcher.observe(0.0), Some(VisibilityChange::Left));

        let mut watcher = VisibilityWatcher::new(0.4);
        assert_eq!(watcher.observe(0.9), Some(VisibilityChange::Entered));
    }

    #[test]
    fn only_crossings_are_reported() {
        let mut watcher = VisibilityWatcher::new(0.4);
        let changes: Vec<_> = [0.0, 0.2, 0.4, 0.8, 1.0, 0.5, 0.39, 0.0, 0.41]
            .into_iter()
            .filter_map(|ratio| watcher.observe(ratio))
            .collect();
        use VisibilityChange::*;
        assert_eq!(changes, vec![Left, Entered, Left, Entered]);
    }

    #[test]
    fn zero_threshold_needs_any_overlap() {
        let mut watcher = VisibilityWatcher::new(0.0);
        assert_eq!(watcher.observe(0.0), Some(VisibilityChange::Left));
        assert_eq!(watcher.observe(0.01), Some(VisibilityChange::Entered));
    }

    #[test]
    fn disconnected_watcher_is_silent() {
        let mut watcher = VisibilityWatcher::new(0.5);
        watcher.observe(1.0);
        watcher.disconnect();
        assert!(!watcher.is_connected());
        assert_eq!(watcher.observe(0.0), None);
    }
}
