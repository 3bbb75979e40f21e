//! Edge swipe detection over raw touch events.
//!
//! A [`TouchSurface`] fans touch start/end events out to registered
//! listeners. [`EdgeSwipeDetector::attach`] registers one start/end pair on a
//! surface and hands back a [`SwipeRegistration`] that removes them again on
//! [`SwipeRegistration::detach`] or drop.
//!
//! Classification runs on touch end:
//!
//! - gestures more vertical than horizontal are dropped
//! - gestures slower than [`MAX_SWIPE_DURATION_MS`] or shorter than the
//!   threshold are dropped
//! - rightward swipes only count when they start near the left edge
//! - leftward swipes count from anywhere

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Default minimum horizontal travel for a swipe.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;

/// Default maximum start x for a rightward swipe to count as an edge swipe.
pub const DEFAULT_EDGE_THRESHOLD: f32 = 30.0;

/// Swipes that take this long or longer are ignored.
pub const MAX_SWIPE_DURATION_MS: u64 = 300;

// ============================================================================
// Touch Surface
// ============================================================================

/// A single touch point, in logical pixels, with its timestamp in ms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
    pub time_ms: u64,
}

impl TouchPoint {
    pub fn new(x: f32, y: f32, time_ms: u64) -> Self {
        Self { x, y, time_ms }
    }
}

/// Raw touch events delivered to a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    Start(TouchPoint),
    End(TouchPoint),
}

/// Which half of a gesture a listener wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhaseKind {
    Start,
    End,
}

/// Handle returned by [`TouchSurface::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

type Listener = Rc<RefCell<dyn FnMut(&TouchPoint)>>;

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    entries: Vec<(ListenerId, TouchPhaseKind, Listener)>,
}

/// Source of touch events shared by everything mounted in a window.
///
/// Cloning yields another handle to the same listener table.
#[derive(Clone, Default)]
pub struct TouchSurface {
    table: Rc<RefCell<ListenerTable>>,
}

impl TouchSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one phase.
    pub fn add_listener(
        &self,
        phase: TouchPhaseKind,
        listener: impl FnMut(&TouchPoint) + 'static,
    ) -> ListenerId {
        let listener: Listener = Rc::new(RefCell::new(listener));
        let mut table = self.table.borrow_mut();
        let id = ListenerId(table.next_id);
        table.next_id += 1;
        table.entries.push((id, phase, listener));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut table = self.table.borrow_mut();
        let before = table.entries.len();
        table.entries.retain(|(entry_id, _, _)| *entry_id != id);
        table.entries.len() != before
    }

    #[cfg(test)]
    fn listener_count(&self) -> usize {
        self.table.borrow().entries.len()
    }

    /// Deliver an event to every listener of the matching phase.
    ///
    /// Listeners may add or remove registrations while being called.
    pub fn dispatch(&self, event: &TouchEvent) {
        let (phase, point) = match event {
            TouchEvent::Start(p) => (TouchPhaseKind::Start, p),
            TouchEvent::End(p) => (TouchPhaseKind::End, p),
        };

        let listeners: Vec<Listener> = self
            .table
            .borrow()
            .entries
            .iter()
            .filter(|(_, kind, _)| *kind == phase)
            .map(|(_, _, listener)| Rc::clone(listener))
            .collect();

        // A listener that dispatches again is skipped by the nested dispatch.
        for listener in listeners {
            if let Ok(mut listener) = listener.try_borrow_mut() {
                (&mut *listener)(point);
            }
        }
    }

    fn downgrade(&self) -> Weak<RefCell<ListenerTable>> {
        Rc::downgrade(&self.table)
    }
}

// ============================================================================
// Swipe Classification
// ============================================================================

/// Direction of a recognized swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Tunables for swipe recognition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeConfig {
    /// Minimum horizontal travel; travel must exceed it.
    pub threshold: f32,
    /// Rightward swipes must start left of this x coordinate.
    pub edge_threshold: f32,
    /// When false every touch is ignored.
    pub enabled: bool,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SWIPE_THRESHOLD,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TouchState {
    start_x: f32,
    start_y: f32,
    start_time: u64,
}

/// Pure swipe recognizer. Holds at most one gesture at a time.
#[derive(Debug, Clone, Default)]
pub struct SwipeRecognizer {
    config: SwipeConfig,
    touch: Option<TouchState>,
}

impl SwipeRecognizer {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            touch: None,
        }
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    #[cfg(test)]
    fn is_tracking(&self) -> bool {
        self.touch.is_some()
    }

    /// Enable or disable recognition. Disabling drops any half-seen gesture.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
        if !enabled {
            self.touch = None;
        }
    }

    /// Record the start of a gesture, replacing any stale one.
    pub fn touch_start(&mut self, point: &TouchPoint) {
        if !self.config.enabled {
            return;
        }
        self.touch = Some(TouchState {
            start_x: point.x,
            start_y: point.y,
            start_time: point.time_ms,
        });
    }

    /// Finish the current gesture and classify it.
    pub fn touch_end(&mut self, point: &TouchPoint) -> Option<SwipeDirection> {
        if !self.config.enabled {
            return None;
        }
        let start = self.touch.take()?;

        let delta_x = point.x - start.start_x;
        let delta_y = point.y - start.start_y;
        let delta_time = point.time_ms.saturating_sub(start.start_time);

        if delta_x.abs() < delta_y.abs() {
            return None;
        }
        if delta_time >= MAX_SWIPE_DURATION_MS || delta_x.abs() <= self.config.threshold {
            return None;
        }

        if delta_x > 0.0 && start.start_x < self.config.edge_threshold {
            Some(SwipeDirection::Right)
        } else if delta_x < 0.0 {
            Some(SwipeDirection::Left)
        } else {
            None
        }
    }
}

// ============================================================================
// Edge Swipe Detector
// ============================================================================

/// Callback invoked for a recognized swipe.
pub type SwipeCallback = Box<dyn FnMut()>;

/// Swipe recognizer plus the callbacks it drives.
pub struct EdgeSwipeDetector {
    recognizer: SwipeRecognizer,
    on_swipe_left: Option<SwipeCallback>,
    on_swipe_right: Option<SwipeCallback>,
}

impl Default for EdgeSwipeDetector {
    fn default() -> Self {
        Self::new(SwipeConfig::default())
    }
}

impl EdgeSwipeDetector {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            recognizer: SwipeRecognizer::new(config),
            on_swipe_left: None,
            on_swipe_right: None,
        }
    }

    pub fn on_swipe_left(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_swipe_left = Some(Box::new(callback));
        self
    }

    pub fn on_swipe_right(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_swipe_right = Some(Box::new(callback));
        self
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.recognizer.set_enabled(enabled);
    }

    pub fn is_enabled(&self) -> bool {
        self.recognizer.config().enabled
    }

    pub fn touch_start(&mut self, point: &TouchPoint) {
        self.recognizer.touch_start(point);
    }

    /// Classify the finished gesture and fire at most one callback.
    pub fn touch_end(&mut self, point: &TouchPoint) -> Option<SwipeDirection> {
        let direction = self.recognizer.touch_end(point)?;
        if let Some(callback) = self.callback_slot(direction) {
            callback();
        }
        Some(direction)
    }

    fn callback_slot(&mut self, direction: SwipeDirection) -> &mut Option<SwipeCallback> {
        match direction {
            SwipeDirection::Left => &mut self.on_swipe_left,
            SwipeDirection::Right => &mut self.on_swipe_right,
        }
    }

    /// Touch-end handler for an attached detector.
    ///
    /// The callback runs with the detector released, so it may call back
    /// into the registration (for example to disable it).
    fn shared_touch_end(detector: &RefCell<Self>, point: &TouchPoint) {
        let (direction, callback) = {
            let mut detector = detector.borrow_mut();
            let Some(direction) = detector.recognizer.touch_end(point) else {
                return;
            };
            (direction, detector.callback_slot(direction).take())
        };

        if let Some(mut callback) = callback {
            callback();
            let mut detector = detector.borrow_mut();
            let slot = detector.callback_slot(direction);
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }

    /// Register this detector on `surface` for the lifetime of the returned guard.
    pub fn attach(self, surface: &TouchSurface) -> SwipeRegistration {
        let detector = Rc::new(RefCell::new(self));

        let on_start = Rc::clone(&detector);
        let start_id = surface.add_listener(TouchPhaseKind::Start, move |point| {
            on_start.borrow_mut().touch_start(point);
        });

        let on_end = Rc::clone(&detector);
        let end_id = surface.add_listener(TouchPhaseKind::End, move |point| {
            EdgeSwipeDetector::shared_touch_end(&on_end, point);
        });

        SwipeRegistration {
            surface: surface.downgrade(),
            listeners: Some((start_id, end_id)),
            detector,
        }
    }
}

/// Scoped registration of an [`EdgeSwipeDetector`] on a [`TouchSurface`].
pub struct SwipeRegistration {
    surface: Weak<RefCell<ListenerTable>>,
    listeners: Option<(ListenerId, ListenerId)>,
    detector: Rc<RefCell<EdgeSwipeDetector>>,
}

impl SwipeRegistration {
    pub fn is_attached(&self) -> bool {
        self.listeners.is_some()
    }

    pub fn set_enabled(&self, enabled: bool) {
        let mut detector = self.detector.borrow_mut();
        if detector.is_enabled() != enabled {
            tracing::trace!(enabled, "edge swipe toggled");
            detector.set_enabled(enabled);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.detector.borrow().is_enabled()
    }

    /// Remove both listeners. Safe to call repeatedly.
    pub fn detach(&mut self) {
        let Some((start_id, end_id)) = self.listeners.take() else {
            return;
        };
        if let Some(table) = self.surface.upgrade() {
            let surface = TouchSurface { table };
            surface.remove_listener(start_id);
            surface.remove_listener(end_id);
        }
    }
}

impl Drop for SwipeRegistration {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting_detector(
        config: SwipeConfig,
    ) -> (EdgeSwipeDetector, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let left = Rc::new(Cell::new(0));
        let right = Rc::new(Cell::new(0));
        let l = Rc::clone(&left);
        let r = Rc::clone(&right);
        let detector = EdgeSwipeDetector::new(config)
            .on_swipe_left(move || l.set(l.get() + 1))
            .on_swipe_right(move || r.set(r.get() + 1));
        (detector, left, right)
    }

    fn swipe(
        detector: &mut EdgeSwipeDetector,
        start: (f32, f32, u64),
        end: (f32, f32, u64),
    ) -> Option<SwipeDirection> {
        detector.touch_start(&TouchPoint::new(start.0, start.1, start.2));
        detector.touch_end(&TouchPoint::new(end.0, end.1, end.2))
    }

    #[test]
    fn test_edge_swipe_right_fires_right() {
        let (mut detector, left, right) = counting_detector(SwipeConfig::default());
        let result = swipe(&mut detector, (10.0, 100.0, 0), (80.0, 105.0, 150));
        assert_eq!(result, Some(SwipeDirection::Right));
        assert_eq!(right.get(), 1);
        assert_eq!(left.get(), 0);
    }

    #[test]
    fn test_swipe_left_from_anywhere() {
        let (mut detector, left, right) = counting_detector(SwipeConfig::default());
        let result = swipe(&mut detector, (400.0, 100.0, 0), (330.0, 100.0, 100));
        assert_eq!(result, Some(SwipeDirection::Left));
        assert_eq!(left.get(), 1);
        assert_eq!(right.get(), 0);
    }

    #[test]
    fn test_swipe_right_mid_screen_ignored() {
        let (mut detector, left, right) = counting_detector(SwipeConfig::default());
        let result = swipe(&mut detector, (400.0, 100.0, 0), (470.0, 105.0, 150));
        assert_eq!(result, None);
        assert_eq!(left.get() + right.get(), 0);
    }

    #[test]
    fn test_slow_swipe_ignored() {
        let (mut detector, left, right) = counting_detector(SwipeConfig::default());
        let result = swipe(&mut detector, (10.0, 100.0, 0), (80.0, 100.0, 400));
        assert_eq!(result, None);
        assert_eq!(left.get() + right.get(), 0);
    }

    #[test]
    fn test_duration_limit_is_exclusive() {
        let (mut detector, _, right) = counting_detector(SwipeConfig::default());
        assert_eq!(
            swipe(&mut detector, (10.0, 100.0, 0), (80.0, 100.0, 300)),
            None
        );
        assert_eq!(
            swipe(&mut detector, (10.0, 100.0, 0), (80.0, 100.0, 299)),
            Some(SwipeDirection::Right)
        );
        assert_eq!(right.get(), 1);
    }

    #[test]
    fn test_distance_threshold_is_exclusive() {
        let (mut detector, left, _) = counting_detector(SwipeConfig::default());
        assert_eq!(
            swipe(&mut detector, (300.0, 100.0, 0), (250.0, 100.0, 100)),
            None
        );
        assert_eq!(
            swipe(&mut detector, (300.0, 100.0, 0), (249.0, 100.0, 100)),
            Some(SwipeDirection::Left)
        );
        assert_eq!(left.get(), 1);
    }

    #[test]
    fn test_vertical_gesture_ignored() {
        let (mut detector, left, right) = counting_detector(SwipeConfig::default());
        let result = swipe(&mut detector, (10.0, 100.0, 0), (80.0, 200.0, 100));
        assert_eq!(result, None);
        assert_eq!(left.get() + right.get(), 0);
    }

    #[test]
    fn test_end_without_start_ignored() {
        let (mut detector, left, right) = counting_detector(SwipeConfig::default());
        assert_eq!(detector.touch_end(&TouchPoint::new(80.0, 100.0, 100)), None);
        assert_eq!(left.get() + right.get(), 0);
    }

    #[test]
    fn test_second_end_is_discarded() {
        let (mut detector, _, right) = counting_detector(SwipeConfig::default());
        swipe(&mut detector, (10.0, 100.0, 0), (80.0, 100.0, 100));
        assert_eq!(detector.touch_end(&TouchPoint::new(90.0, 100.0, 120)), None);
        assert_eq!(right.get(), 1);
    }

    #[test]
    fn test_state_cleared_after_rejected_gesture() {
        let mut recognizer = SwipeRecognizer::default();
        recognizer.touch_start(&TouchPoint::new(10.0, 100.0, 0));
        assert!(recognizer.is_tracking());
        recognizer.touch_end(&TouchPoint::new(12.0, 300.0, 50));
        assert!(!recognizer.is_tracking());
    }

    #[test]
    fn test_new_start_overwrites_stale_start() {
        let (mut detector, left, right) = counting_detector(SwipeConfig::default());
        detector.touch_start(&TouchPoint::new(400.0, 100.0, 0));
        detector.touch_start(&TouchPoint::new(5.0, 100.0, 1000));
        let result = detector.touch_end(&TouchPoint::new(90.0, 100.0, 1100));
        assert_eq!(result, Some(SwipeDirection::Right));
        assert_eq!(right.get(), 1);
        assert_eq!(left.get(), 0);
    }

    #[test]
    fn test_disabled_detector_ignores_gestures() {
        let config = SwipeConfig {
            enabled: false,
            ..Default::default()
        };
        let (mut detector, left, right) = counting_detector(config);
        assert_eq!(
            swipe(&mut detector, (10.0, 100.0, 0), (80.0, 100.0, 100)),
            None
        );
        assert_eq!(left.get() + right.get(), 0);
    }

    #[test]
    fn test_disabling_mid_gesture_drops_start() {
        let (mut detector, _, right) = counting_detector(SwipeConfig::default());
        detector.touch_start(&TouchPoint::new(10.0, 100.0, 0));
        detector.set_enabled(false);
        detector.set_enabled(true);
        assert_eq!(detector.touch_end(&TouchPoint::new(80.0, 100.0, 100)), None);
        assert_eq!(right.get(), 0);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = SwipeConfig {
            threshold: 20.0,
            edge_threshold: 100.0,
            enabled: true,
        };
        let (mut detector, _, right) = counting_detector(config);
        assert_eq!(
            swipe(&mut detector, (60.0, 100.0, 0), (90.0, 100.0, 100)),
            Some(SwipeDirection::Right)
        );
        assert_eq!(right.get(), 1);
    }

    #[test]
    fn test_missing_callback_still_classifies() {
        let mut detector = EdgeSwipeDetector::default();
        let result = swipe(&mut detector, (400.0, 100.0, 0), (300.0, 100.0, 100));
        assert_eq!(result, Some(SwipeDirection::Left));
    }

    #[test]
    fn test_attach_registers_one_pair() {
        let surface = TouchSurface::new();
        let registration = EdgeSwipeDetector::default().attach(&surface);
        assert_eq!(surface.listener_count(), 2);
        assert!(registration.is_attached());
    }

    #[test]
    fn test_dispatch_reaches_detector() {
        let surface = TouchSurface::new();
        let (detector, _, right) = counting_detector(SwipeConfig::default());
        let _registration = detector.attach(&surface);

        surface.dispatch(&TouchEvent::Start(TouchPoint::new(10.0, 100.0, 0)));
        surface.dispatch(&TouchEvent::End(TouchPoint::new(80.0, 105.0, 150)));

        assert_eq!(right.get(), 1);
    }

    #[test]
    fn test_detach_twice_is_idempotent() {
        let surface = TouchSurface::new();
        let mut registration = EdgeSwipeDetector::default().attach(&surface);

        registration.detach();
        registration.detach();

        assert_eq!(surface.listener_count(), 0);
        assert!(!registration.is_attached());
    }

    #[test]
    fn test_drop_releases_listeners() {
        let surface = TouchSurface::new();
        {
            let _registration = EdgeSwipeDetector::default().attach(&surface);
            assert_eq!(surface.listener_count(), 2);
        }
        assert_eq!(surface.listener_count(), 0);
    }

    #[test]
    fn test_detach_after_surface_dropped() {
        let surface = TouchSurface::new();
        let mut registration = EdgeSwipeDetector::default().attach(&surface);
        drop(surface);
        registration.detach();
        assert!(!registration.is_attached());
    }

    #[test]
    fn test_detached_detector_receives_nothing() {
        let surface = TouchSurface::new();
        let (detector, _, right) = counting_detector(SwipeConfig::default());
        let mut registration = detector.attach(&surface);
        registration.detach();

        surface.dispatch(&TouchEvent::Start(TouchPoint::new(10.0, 100.0, 0)));
        surface.dispatch(&TouchEvent::End(TouchPoint::new(80.0, 105.0, 150)));

        assert_eq!(right.get(), 0);
    }

    #[test]
    fn test_registration_toggles_enabled() {
        let surface = TouchSurface::new();
        let (detector, _, right) = counting_detector(SwipeConfig::default());
        let registration = detector.attach(&surface);

        registration.set_enabled(false);
        assert!(!registration.is_enabled());
        assert_eq!(surface.listener_count(), 2);
        surface.dispatch(&TouchEvent::Start(TouchPoint::new(10.0, 100.0, 0)));
        surface.dispatch(&TouchEvent::End(TouchPoint::new(80.0, 105.0, 150)));
        assert_eq!(right.get(), 0);

        registration.set_enabled(true);
        surface.dispatch(&TouchEvent::Start(TouchPoint::new(10.0, 100.0, 200)));
        surface.dispatch(&TouchEvent::End(TouchPoint::new(80.0, 105.0, 300)));
        assert_eq!(right.get(), 1);
    }

    #[test]
    fn test_independent_detectors_keep_own_state() {
        let surface = TouchSurface::new();
        let (a, _, right_a) = counting_detector(SwipeConfig::default());
        let (b, _, right_b) = counting_detector(SwipeConfig::default());
        let _ra = a.attach(&surface);
        let rb = b.attach(&surface);
        rb.set_enabled(false);

        surface.dispatch(&TouchEvent::Start(TouchPoint::new(10.0, 100.0, 0)));
        surface.dispatch(&TouchEvent::End(TouchPoint::new(80.0, 105.0, 150)));

        assert_eq!(right_a.get(), 1);
        assert_eq!(right_b.get(), 0);
        assert_eq!(surface.listener_count(), 4);
    }

    #[test]
    fn test_remove_unknown_listener() {
        let surface = TouchSurface::new();
        let id = surface.add_listener(TouchPhaseKind::Start, |_| {});
        assert!(surface.remove_listener(id));
        assert!(!surface.remove_listener(id));
    }

    #[test]
    fn test_callback_may_disable_its_registration() {
        let surface = TouchSurface::new();
        let handle: Rc<RefCell<Option<SwipeRegistration>>> = Rc::new(RefCell::new(None));
        let fired = Rc::new(Cell::new(0));

        let (h, f) = (Rc::clone(&handle), Rc::clone(&fired));
        let registration = EdgeSwipeDetector::default()
            .on_swipe_right(move || {
                f.set(f.get() + 1);
                if let Some(registration) = h.borrow().as_ref() {
                    registration.set_enabled(false);
                }
            })
            .attach(&surface);
        *handle.borrow_mut() = Some(registration);

        surface.dispatch(&TouchEvent::Start(TouchPoint::new(10.0, 100.0, 0)));
        surface.dispatch(&TouchEvent::End(TouchPoint::new(80.0, 105.0, 150)));
        assert_eq!(fired.get(), 1);
        assert!(!handle.borrow().as_ref().unwrap().is_enabled());

        surface.dispatch(&TouchEvent::Start(TouchPoint::new(10.0, 100.0, 200)));
        surface.dispatch(&TouchEvent::End(TouchPoint::new(80.0, 105.0, 300)));
        assert_eq!(fired.get(), 1);

        handle.borrow_mut().take();
        assert_eq!(surface.listener_count(), 0);
    }

    #[test]
    fn test_nested_dispatch_skips_running_listener() {
        let surface = TouchSurface::new();
        let inner = surface.clone();
        let fired = Rc::new(Cell::new(0));
        let f = Rc::clone(&fired);

        let _registration = EdgeSwipeDetector::default()
            .on_swipe_right(move || {
                f.set(f.get() + 1);
                inner.dispatch(&TouchEvent::Start(TouchPoint::new(10.0, 100.0, 160)));
                inner.dispatch(&TouchEvent::End(TouchPoint::new(80.0, 105.0, 200)));
            })
            .attach(&surface);

        surface.dispatch(&TouchEvent::Start(TouchPoint::new(10.0, 100.0, 0)));
        surface.dispatch(&TouchEvent::End(TouchPoint::new(80.0, 105.0, 150)));

        assert_eq!(fired.get(), 1);
    }
}
