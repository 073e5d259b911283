/// Liveness monitoring for a long-lived page context
///
/// Single-page-app hosts rebuild their sidebar asynchronously and navigate
/// without full page loads, so the blocking evaluation has to be re-run on
/// the right signals: host readiness, structural sidebar mutations, and URL
/// changes. This module is the decision layer for those signals; the JS
/// side feeds it raw observations (mutation summaries, timer ticks, history
/// events) and runs the re-evaluation when told to.
///
/// One `LivenessMonitor` instance per page context owns all of the state
/// that used to live in module-level globals, including the re-entrancy
/// guard for the in-flight block check.
use log::{debug, warn};

/// Host readiness poll cadence
pub const HOST_POLL_INTERVAL_MS: f64 = 1000.0;
/// Settle delay between a navigation signal and the URL comparison
pub const EVENT_DELAY_MS: f64 = 100.0;
/// Block page re-check cadence
pub const BLOCK_PAGE_POLL_MS: f64 = 5000.0;
/// After this long an in-flight check is presumed lost and its guard slot
/// is reclaimed, so a hung message round-trip cannot wedge future checks
pub const CHECK_TIMEOUT_MS: f64 = 10_000.0;

/// Lifecycle of a monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorState {
    #[default]
    Unstarted,
    WaitingForHost,
    Active,
    TornDown,
}

/// Shape classification of a DOM node, as reported by the JS observer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    ChannelItem,
    SectionHeading,
    Other,
}

/// A node plus the shapes found among its descendants
#[derive(Debug, Clone)]
pub struct NodeSummary {
    pub shape: NodeShape,
    pub descendant_shapes: Vec<NodeShape>,
}

impl NodeSummary {
    pub fn of(shape: NodeShape) -> NodeSummary {
        NodeSummary {
            shape,
            descendant_shapes: Vec::new(),
        }
    }

    pub fn containing(shape: NodeShape, descendants: &[NodeShape]) -> NodeSummary {
        NodeSummary {
            shape,
            descendant_shapes: descendants.to_vec(),
        }
    }

    fn is_relevant(&self) -> bool {
        let interesting =
            |s: &NodeShape| matches!(s, NodeShape::ChannelItem | NodeShape::SectionHeading);
        interesting(&self.shape) || self.descendant_shapes.iter().any(|s| interesting(s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    ChildList,
    CharacterData,
    Attributes,
}

/// One observed mutation batch entry
#[derive(Debug, Clone)]
pub struct StructuralMutation {
    pub kind: MutationKind,
    pub added: Vec<NodeSummary>,
    pub removed: Vec<NodeSummary>,
}

/// Which navigation signal fired; all three funnel into the same debounced
/// URL comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationSignal {
    History,
    HashChange,
    Poll,
}

/// Debounced URL-change detection. Signals schedule a comparison
/// `EVENT_DELAY_MS` later; the comparison fires the change at most once per
/// actual URL difference, however many raw signals arrived.
#[derive(Debug, Default)]
struct NavigationTracker {
    last_url: Option<String>,
    compare_at: Option<f64>,
}

impl NavigationTracker {
    fn note_signal(&mut self, signal: NavigationSignal, now_ms: f64) {
        debug!("navigation signal: {:?}", signal);
        // A fresh signal pushes the settle deadline out
        self.compare_at = Some(now_ms + EVENT_DELAY_MS);
    }

    fn compare_due(&self, now_ms: f64) -> bool {
        self.compare_at.is_some_and(|at| now_ms >= at)
    }

    fn observe_url(&mut self, current_url: &str) -> Option<String> {
        self.compare_at = None;
        match self.last_url.as_deref() {
            // Page load establishes the baseline, it is not a change
            None => {
                self.last_url = Some(current_url.to_string());
                None
            }
            Some(last) if last == current_url => None,
            Some(_) => {
                self.last_url = Some(current_url.to_string());
                Some(current_url.to_string())
            }
        }
    }
}

/// Re-entrancy guard for the URL-change block check. A second check is
/// refused while one is in flight, but a slot older than
/// `CHECK_TIMEOUT_MS` is reclaimed instead of blocking forever.
#[derive(Debug, Default)]
pub struct CheckGuard {
    in_flight_since: Option<f64>,
}

impl CheckGuard {
    pub fn new() -> CheckGuard {
        CheckGuard::default()
    }

    pub fn try_begin(&mut self, now_ms: f64) -> bool {
        if let Some(since) = self.in_flight_since {
            if now_ms - since < CHECK_TIMEOUT_MS {
                return false;
            }
            warn!("block check still pending after {}ms, reclaiming", CHECK_TIMEOUT_MS);
        }
        self.in_flight_since = Some(now_ms);
        true
    }

    pub fn finish(&mut self) {
        self.in_flight_since = None;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight_since.is_some()
    }
}

type ChangeCallback = Box<dyn FnMut()>;
type UrlCallback = Box<dyn FnMut(&str)>;

/// Per-page monitor driving re-evaluation of the blocking state
#[derive(Default)]
pub struct LivenessMonitor {
    state: MonitorState,
    nav: NavigationTracker,
    guard: CheckGuard,
    on_structural_change: Option<ChangeCallback>,
    on_navigation_change: Option<UrlCallback>,
}

impl LivenessMonitor {
    pub fn new() -> LivenessMonitor {
        LivenessMonitor::default()
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Begin waiting for the host structure to appear
    pub fn start(&mut self) {
        if self.state == MonitorState::Unstarted {
            self.state = MonitorState::WaitingForHost;
        }
    }

    /// Feed one readiness poll. `sidebar_child_count` is None while the
    /// container selector misses (not ready, not an error). Returns true
    /// exactly once, on the WaitingForHost -> Active transition.
    pub fn poll_host(&mut self, sidebar_child_count: Option<usize>) -> bool {
        if self.state != MonitorState::WaitingForHost {
            return false;
        }
        match sidebar_child_count {
            Some(children) if children > 0 => {
                debug!("host sidebar ready with {} children", children);
                self.state = MonitorState::Active;
                true
            }
            _ => false,
        }
    }

    /// Subscribe to relevant structural mutations
    pub fn on_structural_change(&mut self, callback: impl FnMut() + 'static) {
        self.on_structural_change = Some(Box::new(callback));
    }

    /// Subscribe to deduplicated URL changes
    pub fn on_navigation_change(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_navigation_change = Some(Box::new(callback));
    }

    /// Feed one mutation batch entry. Returns true (and invokes the
    /// structural-change callback) only for childList mutations that add or
    /// remove a channel item or section heading, directly or as a
    /// descendant. Text and attribute churn never fires.
    pub fn observe_mutation(&mut self, mutation: &StructuralMutation) -> bool {
        if self.state != MonitorState::Active {
            return false;
        }
        if mutation.kind != MutationKind::ChildList {
            return false;
        }

        let relevant = mutation
            .added
            .iter()
            .chain(mutation.removed.iter())
            .any(NodeSummary::is_relevant);
        if !relevant {
            return false;
        }

        if let Some(callback) = self.on_structural_change.as_mut() {
            callback();
        }
        true
    }

    /// Feed one raw navigation signal (history pop, hash change, poll tick)
    pub fn note_navigation_signal(&mut self, signal: NavigationSignal, now_ms: f64) {
        if self.state == MonitorState::Active {
            self.nav.note_signal(signal, now_ms);
        }
    }

    /// Has the settle delay elapsed since the last signal?
    pub fn navigation_compare_due(&self, now_ms: f64) -> bool {
        self.state == MonitorState::Active && self.nav.compare_due(now_ms)
    }

    /// Compare the page's current URL against the last observed one.
    /// Returns the new URL (and invokes the navigation callback) at most
    /// once per actual change. The first observation after activation
    /// seeds the baseline without firing.
    pub fn observe_url(&mut self, current_url: &str) -> Option<String> {
        if self.state != MonitorState::Active {
            return None;
        }
        let changed = self.nav.observe_url(current_url)?;
        if let Some(callback) = self.on_navigation_change.as_mut() {
            callback(&changed);
        }
        Some(changed)
    }

    /// Claim the in-flight slot for a block check round-trip
    pub fn try_begin_check(&mut self, now_ms: f64) -> bool {
        self.state == MonitorState::Active && self.guard.try_begin(now_ms)
    }

    pub fn finish_check(&mut self) {
        self.guard.finish();
    }

    /// Detach callbacks and stop reacting to signals. Idempotent.
    pub fn teardown(&mut self) {
        self.state = MonitorState::TornDown;
        self.on_structural_change = None;
        self.on_navigation_change = None;
        self.nav = NavigationTracker::default();
        self.guard.finish();
    }

    /// Back to a fresh, unstarted monitor
    pub fn reset(&mut self) {
        self.teardown();
        self.state = MonitorState::Unstarted;
    }
}
