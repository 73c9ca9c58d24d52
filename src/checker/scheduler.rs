//! Decides when a buffer gets checked, and how much of it.
//!
//! A check is skipped outright when the backend is unreachable, the buffer is
//! hidden, the last check was too recent, a buffer filter vetoes it, or the
//! target is larger than the cap for the current [`ScanMode`]. Otherwise the
//! target range is re-classified, handed to the region check and the findings
//! recorded on the buffer.

use super::region::RegionCheck;
use crate::backend::Backend;
use crate::host::{Buffer, BufferId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Whole document.
    #[default]
    Normal,
    /// Visible window only.
    Fast,
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanMode::Normal => write!(f, "normal"),
            ScanMode::Fast => write!(f, "fast"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanState {
    pub last_check: Option<Instant>,
    pub mode: ScanMode,
}

impl ScanState {
    fn new(mode: ScanMode) -> Self {
        Self {
            last_check: None,
            mode,
        }
    }
}

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    pub min_interval: Duration,
    /// Byte cap for Normal mode.
    pub max_document_size: usize,
    /// Byte cap for Fast mode.
    pub max_viewport_size: usize,
    pub default_mode: ScanMode,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(2000),
            max_document_size: 4 * 1024 * 1024,
            max_viewport_size: 80_000,
            default_mode: ScanMode::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BackendUnavailable,
    Invisible,
    Debounced,
    Vetoed,
    Oversized,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::BackendUnavailable => "backend unavailable",
            SkipReason::Invisible => "buffer not visible",
            SkipReason::Debounced => "checked too recently",
            SkipReason::Vetoed => "vetoed by buffer filter",
            SkipReason::Oversized => "too large",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Checked {
        mode: ScanMode,
        range: Range<usize>,
        findings: usize,
    },
    Skipped(SkipReason),
}

impl CheckOutcome {
    pub fn is_checked(&self) -> bool {
        matches!(self, CheckOutcome::Checked { .. })
    }
}

type BufferFilter = dyn Fn(&dyn Buffer) -> bool;

pub struct Scheduler<C: Clock = SystemClock> {
    settings: SchedulerSettings,
    backend: Rc<dyn Backend>,
    states: HashMap<BufferId, ScanState>,
    buffer_filter: Option<Box<BufferFilter>>,
    clock: C,
}

impl Scheduler<SystemClock> {
    pub fn new(settings: SchedulerSettings, backend: Rc<dyn Backend>) -> Self {
        Self::with_clock(settings, backend, SystemClock)
    }
}

impl<C: Clock> Scheduler<C> {
    pub fn with_clock(settings: SchedulerSettings, backend: Rc<dyn Backend>, clock: C) -> Self {
        Self {
            settings,
            backend,
            states: HashMap::new(),
            buffer_filter: None,
            clock,
        }
    }

    /// Only buffers the filter accepts are checked.
    pub fn with_buffer_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&dyn Buffer) -> bool + 'static,
    {
        self.buffer_filter = Some(Box::new(filter));
        self
    }

    pub fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    pub fn set_mode(&mut self, id: BufferId, mode: ScanMode) {
        self.states
            .entry(id)
            .or_insert_with(|| ScanState::new(mode))
            .mode = mode;
    }

    pub fn mode(&self, id: BufferId) -> ScanMode {
        self.states
            .get(&id)
            .map_or(self.settings.default_mode, |state| state.mode)
    }

    pub fn state(&self, id: BufferId) -> Option<&ScanState> {
        self.states.get(&id)
    }

    /// Drop the state of a closed buffer.
    pub fn forget(&mut self, id: BufferId) {
        self.states.remove(&id);
    }

    /// Check `buffer` if nothing stands in the way.
    pub fn maybe_check<B, R>(&mut self, buffer: &mut B, region: &mut R) -> CheckOutcome
    where
        B: Buffer,
        R: RegionCheck<B>,
    {
        if !self.backend.is_available() {
            return self.skip(buffer.id(), SkipReason::BackendUnavailable);
        }
        if !buffer.is_visible() {
            return self.skip(buffer.id(), SkipReason::Invisible);
        }

        let now = self.clock.now();
        let default_mode = self.settings.default_mode;
        let state = *self
            .states
            .entry(buffer.id())
            .or_insert_with(|| ScanState::new(default_mode));

        if let Some(last) = state.last_check {
            if now.saturating_duration_since(last) < self.settings.min_interval {
                return self.skip(buffer.id(), SkipReason::Debounced);
            }
        }

        if let Some(filter) = &self.buffer_filter {
            if !filter(&*buffer) {
                return self.skip(buffer.id(), SkipReason::Vetoed);
            }
        }

        let range = match state.mode {
            ScanMode::Normal => {
                if buffer.len() > self.settings.max_document_size {
                    return self.skip(buffer.id(), SkipReason::Oversized);
                }
                0..buffer.len()
            }
            ScanMode::Fast => {
                let len = buffer.len();
                let view = buffer.viewport().unwrap_or(0..len);
                let view = view.start.min(len)..view.end.min(len);
                if view.len() > self.settings.max_viewport_size {
                    return self.skip(buffer.id(), SkipReason::Oversized);
                }
                view
            }
        };

        buffer.refontify(range.clone());
        let findings = region.check_region(buffer, range.clone());
        let count = findings.len();
        buffer.record_findings(range.clone(), findings);

        if let Some(state) = self.states.get_mut(&buffer.id()) {
            let checked_at = self.clock.now();
            state.last_check = Some(state.last_check.map_or(checked_at, |old| old.max(checked_at)));
        }

        log::debug!(
            "checked {:?} in {} mode, {} findings",
            range,
            state.mode,
            count
        );
        CheckOutcome::Checked {
            mode: state.mode,
            range,
            findings: count,
        }
    }

    fn skip(&self, id: BufferId, reason: SkipReason) -> CheckOutcome {
        log::debug!("skipping buffer {:?}: {}", id, reason);
        CheckOutcome::Skipped(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendKind, Verdict};
    use crate::error::BackendResult;
    use crate::host::{Document, Mode};
    use crate::Finding;
    use std::cell::Cell;

    struct FixedBackend {
        available: bool,
    }

    impl Backend for FixedBackend {
        fn kind(&self) -> BackendKind {
            BackendKind::WordList
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn check(&self, text: &str) -> BackendResult<Vec<Verdict>> {
            Ok(text.split_whitespace().map(Verdict::correct).collect())
        }
    }

    #[derive(Default)]
    struct CountingCheck {
        calls: usize,
        ranges: Vec<Range<usize>>,
    }

    impl<B: Buffer + ?Sized> RegionCheck<B> for CountingCheck {
        fn check_region(&mut self, _buffer: &B, range: Range<usize>) -> Vec<Finding> {
            self.calls += 1;
            self.ranges.push(range);
            Vec::new()
        }
    }

    struct ManualClock(Cell<Instant>);

    impl ManualClock {
        fn advance(&self, by: Duration) {
            self.0.set(self.0.get() + by);
        }
    }

    impl Clock for &ManualClock {
        fn now(&self) -> Instant {
            self.0.get()
        }
    }

    fn backend(available: bool) -> Rc<dyn Backend> {
        Rc::new(FixedBackend { available })
    }

    fn scheduler(clock: &ManualClock, settings: SchedulerSettings) -> Scheduler<&ManualClock> {
        Scheduler::with_clock(settings, backend(true), clock)
    }

    #[test]
    fn test_debounce() {
        let clock = ManualClock(Cell::new(Instant::now()));
        let mut scheduler = scheduler(&clock, SchedulerSettings::default());
        let mut doc = Document::new("some text", Mode::PlainText);
        let mut check = CountingCheck::default();

        assert!(scheduler.maybe_check(&mut doc, &mut check).is_checked());
        clock.advance(Duration::from_millis(500));
        assert_eq!(
            scheduler.maybe_check(&mut doc, &mut check),
            CheckOutcome::Skipped(SkipReason::Debounced)
        );
        assert_eq!(check.calls, 1);

        clock.advance(Duration::from_millis(1600));
        assert!(scheduler.maybe_check(&mut doc, &mut check).is_checked());
        assert_eq!(check.calls, 2);
    }

    #[test]
    fn test_oversized_document_is_not_attempted() {
        let clock = ManualClock(Cell::new(Instant::now()));
        let settings = SchedulerSettings {
            max_document_size: 10,
            ..Default::default()
        };
        let mut scheduler = scheduler(&clock, settings);
        let mut check = CountingCheck::default();

        let mut doc = Document::new("a".repeat(11), Mode::PlainText);
        assert_eq!(
            scheduler.maybe_check(&mut doc, &mut check),
            CheckOutcome::Skipped(SkipReason::Oversized)
        );
        assert_eq!(check.calls, 0);
        assert_eq!(scheduler.state(doc.id()).and_then(|s| s.last_check), None);

        let mut doc = Document::new("a".repeat(10), Mode::PlainText);
        assert!(scheduler.maybe_check(&mut doc, &mut check).is_checked());
        assert_eq!(
            scheduler.state(doc.id()).and_then(|s| s.last_check),
            Some(clock.0.get())
        );
    }

    #[test]
    fn test_fast_mode_checks_viewport() {
        let clock = ManualClock(Cell::new(Instant::now()));
        let settings = SchedulerSettings {
            max_viewport_size: 8,
            ..Default::default()
        };
        let mut scheduler = scheduler(&clock, settings);
        let mut check = CountingCheck::default();

        let mut doc = Document::new("0123456789abcdef", Mode::PlainText).with_viewport(4..10);
        scheduler.set_mode(doc.id(), ScanMode::Fast);
        assert_eq!(
            scheduler.maybe_check(&mut doc, &mut check),
            CheckOutcome::Checked {
                mode: ScanMode::Fast,
                range: 4..10,
                findings: 0
            }
        );

        let mut wide = Document::new("0123456789abcdef", Mode::PlainText).with_viewport(0..16);
        scheduler.set_mode(wide.id(), ScanMode::Fast);
        assert_eq!(
            scheduler.maybe_check(&mut wide, &mut check),
            CheckOutcome::Skipped(SkipReason::Oversized)
        );
        assert_eq!(check.ranges, vec![4..10]);
    }

    #[test]
    fn test_skips_before_scanning() {
        let clock = ManualClock(Cell::new(Instant::now()));
        let mut check = CountingCheck::default();

        let mut unavailable =
            Scheduler::with_clock(SchedulerSettings::default(), backend(false), &clock);
        let mut doc = Document::new("text", Mode::PlainText);
        assert_eq!(
            unavailable.maybe_check(&mut doc, &mut check),
            CheckOutcome::Skipped(SkipReason::BackendUnavailable)
        );

        let mut scheduler = scheduler(&clock, SchedulerSettings::default());
        doc.set_visible(false);
        assert_eq!(
            scheduler.maybe_check(&mut doc, &mut check),
            CheckOutcome::Skipped(SkipReason::Invisible)
        );

        let mut vetoing = scheduler.with_buffer_filter(|buffer| buffer.mode() != Mode::PlainText);
        doc.set_visible(true);
        assert_eq!(
            vetoing.maybe_check(&mut doc, &mut check),
            CheckOutcome::Skipped(SkipReason::Vetoed)
        );
        assert_eq!(check.calls, 0);
    }

    #[test]
    fn test_forget_resets_state() {
        let clock = ManualClock(Cell::new(Instant::now()));
        let mut scheduler = scheduler(&clock, SchedulerSettings::default());
        let mut doc = Document::new("text", Mode::PlainText);
        let mut check = CountingCheck::default();

        scheduler.set_mode(doc.id(), ScanMode::Fast);
        assert_eq!(scheduler.mode(doc.id()), ScanMode::Fast);
        assert!(scheduler.maybe_check(&mut doc, &mut check).is_checked());

        scheduler.forget(doc.id());
        assert!(scheduler.state(doc.id()).is_none());
        assert_eq!(scheduler.mode(doc.id()), ScanMode::Normal);
        assert!(scheduler.maybe_check(&mut doc, &mut check).is_checked());
        assert_eq!(check.calls, 2);
    }
}
