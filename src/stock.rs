//! `target = current * (1 + percent / 100)`, driven from whichever of percent
//! or target the user edited last.

use std::cell::{Cell, RefCell};

use crate::error::{CalcError, Result};
use crate::format::{
    format_fixed, format_money, format_signed_percent, is_blank, parse_field, round2,
    SignCategory,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockField {
    CurrentPrice,
    PercentChange,
    TargetPrice,
}

// Both the driving mode and the write in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Idle,
    DrivingByPercent,
    DrivingByTarget,
}

fn check_current(current: f64) -> Result<f64> {
    if current.is_finite() && current > 0.0 {
        Ok(current)
    } else {
        Err(CalcError::InvalidInput)
    }
}

pub fn target_from_percent(current: f64, percent: f64) -> Result<f64> {
    let current = check_current(current)?;
    if !percent.is_finite() {
        return Err(CalcError::InvalidInput);
    }
    let target = current * (1.0 + percent / 100.0);
    if !target.is_finite() || target < 0.0 {
        return Err(CalcError::InvalidInput);
    }
    Ok(target)
}

pub fn percent_from_target(current: f64, target: f64) -> Result<f64> {
    let current = check_current(current)?;
    if !target.is_finite() || target < 0.0 {
        return Err(CalcError::InvalidInput);
    }
    let percent = ((target - current) / current) * 100.0;
    if !percent.is_finite() {
        return Err(CalcError::InvalidInput);
    }
    Ok(percent)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StockView {
    pub visible: bool,
    pub target_text: String,
    pub percent_text: String,
    pub category: Option<SignCategory>,
}

impl StockView {
    fn shown(target: f64, percent: f64) -> Self {
        Self {
            visible: true,
            target_text: format_money(target),
            percent_text: format_signed_percent(percent),
            category: Some(SignCategory::of(round2(percent))),
        }
    }

    pub fn css_class(&self) -> String {
        let mut class = String::from("result");
        if !self.visible {
            class.push_str(" hidden");
        }
        match self.category.map(SignCategory::css_class) {
            Some(c) if !c.is_empty() => {
                class.push(' ');
                class.push_str(c);
            }
            _ => {}
        }
        class
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockUpdate {
    pub phase: SyncPhase,
    pub writes: Vec<(StockField, String)>,
    pub view: StockView,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockSync {
    current: String,
    percent: String,
    target: String,
    mode: SyncPhase,
}

impl StockSync {
    pub fn value(&self, field: StockField) -> &str {
        match field {
            StockField::CurrentPrice => &self.current,
            StockField::PercentChange => &self.percent,
            StockField::TargetPrice => &self.target,
        }
    }

    fn slot(&mut self, field: StockField) -> &mut String {
        match field {
            StockField::CurrentPrice => &mut self.current,
            StockField::PercentChange => &mut self.percent,
            StockField::TargetPrice => &mut self.target,
        }
    }

    pub fn mode(&self) -> SyncPhase {
        self.mode
    }

    /// Records a user edit. Editing percent or target makes it authoritative
    /// and clears the other before recomputing; editing the current price
    /// keeps the mode.
    pub fn edit(&mut self, field: StockField, raw: &str) -> StockUpdate {
        *self.slot(field) = raw.to_string();

        let mut writes = Vec::new();
        let cleared = match field {
            StockField::PercentChange => {
                self.mode = SyncPhase::DrivingByPercent;
                Some(StockField::TargetPrice)
            }
            StockField::TargetPrice => {
                self.mode = SyncPhase::DrivingByTarget;
                Some(StockField::PercentChange)
            }
            StockField::CurrentPrice => None,
        };
        if let Some(other) = cleared {
            if !self.value(other).is_empty() {
                self.slot(other).clear();
                writes.push((other, String::new()));
            }
        }

        let mut update = self.recalculate();
        writes.append(&mut update.writes);
        update.writes = writes;
        update
    }

    /// While still `Idle`, the mode follows whichever field holds a value,
    /// percent first.
    pub fn recalculate(&mut self) -> StockUpdate {
        if self.mode == SyncPhase::Idle {
            if !is_blank(&self.percent) {
                self.mode = SyncPhase::DrivingByPercent;
            } else if !is_blank(&self.target) {
                self.mode = SyncPhase::DrivingByTarget;
            }
        }

        let (derived, computed) = match self.mode {
            SyncPhase::Idle => {
                return StockUpdate { phase: SyncPhase::Idle, writes: Vec::new(), view: StockView::default() }
            }
            SyncPhase::DrivingByPercent => (StockField::TargetPrice, self.by_percent()),
            SyncPhase::DrivingByTarget => (StockField::PercentChange, self.by_target()),
        };

        let (text, view) = match computed {
            Ok((target, percent)) => {
                let text = match self.mode {
                    SyncPhase::DrivingByTarget => format_fixed(percent),
                    _ => format_fixed(target),
                };
                (text, StockView::shown(target, percent))
            }
            Err(_) => (String::new(), StockView::default()),
        };

        let mut writes = Vec::new();
        if self.value(derived) != text {
            *self.slot(derived) = text.clone();
            writes.push((derived, text));
        }
        StockUpdate { phase: self.mode, writes, view }
    }

    fn by_percent(&self) -> Result<(f64, f64)> {
        let current = parse_field(&self.current)?;
        let percent = parse_field(&self.percent)?;
        target_from_percent(current, percent).map(|target| (target, percent))
    }

    fn by_target(&self) -> Result<(f64, f64)> {
        let current = parse_field(&self.current)?;
        let target = parse_field(&self.target)?;
        percent_from_target(current, target).map(|percent| (target, percent))
    }
}

#[derive(Debug, Default)]
pub struct UpdateContext {
    phase: Cell<SyncPhase>,
}

impl UpdateContext {
    pub fn phase(&self) -> SyncPhase {
        self.phase.get()
    }

    pub fn is_writing(&self) -> bool {
        self.phase.get() != SyncPhase::Idle
    }

    /// Runs `f` with the phase set; the previous phase is restored on exit,
    /// unwinding included.
    pub fn write_with<R>(&self, phase: SyncPhase, f: impl FnOnce() -> R) -> R {
        let _restore = PhaseRestore { ctx: self, prev: self.phase.replace(phase) };
        f()
    }
}

struct PhaseRestore<'a> {
    ctx: &'a UpdateContext,
    prev: SyncPhase,
}

impl Drop for PhaseRestore<'_> {
    fn drop(&mut self) {
        self.ctx.phase.set(self.prev);
    }
}

/// A DOM-backed sink may report the write straight back as an input event.
pub trait FieldSink {
    fn write(&self, field: StockField, text: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Applied(StockView),
    Suppressed, // echo of our own write
}

#[derive(Debug, Default)]
pub struct StockSession {
    sync: RefCell<StockSync>,
    ctx: UpdateContext,
}

impl StockSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: StockField) -> String {
        self.sync.borrow().value(field).to_string()
    }

    pub fn mode(&self) -> SyncPhase {
        self.sync.borrow().mode()
    }

    pub fn phase(&self) -> SyncPhase {
        self.ctx.phase()
    }

    pub fn on_input(&self, field: StockField, raw: &str, sink: &dyn FieldSink) -> Dispatch {
        if self.ctx.is_writing() {
            return Dispatch::Suppressed;
        }
        let update = self.sync.borrow_mut().edit(field, raw);
        self.apply(update, sink)
    }

    pub fn on_submit(&self, sink: &dyn FieldSink) -> Dispatch {
        if self.ctx.is_writing() {
            return Dispatch::Suppressed;
        }
        let update = self.sync.borrow_mut().recalculate();
        self.apply(update, sink)
    }

    fn apply(&self, update: StockUpdate, sink: &dyn FieldSink) -> Dispatch {
        let StockUpdate { phase, writes, view } = update;
        self.ctx.write_with(phase, || {
            for (field, text) in &writes {
                sink.write(*field, text);
            }
        });
        Dispatch::Applied(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::rc::Rc;

    struct NullSink;

    impl FieldSink for NullSink {
        fn write(&self, _field: StockField, _text: &str) {}
    }

    /// Feeds every write straight back into the session as a DOM would.
    struct EchoSink {
        session: Rc<StockSession>,
        echoes: RefCell<Vec<(StockField, String, SyncPhase, Dispatch)>>,
    }

    impl FieldSink for EchoSink {
        fn write(&self, field: StockField, text: &str) {
            let phase = self.session.phase();
            let outcome = self.session.on_input(field, text, self);
            self.echoes.borrow_mut().push((field, text.to_string(), phase, outcome));
        }
    }

    fn applied(d: Dispatch) -> StockView {
        match d {
            Dispatch::Applied(view) => view,
            Dispatch::Suppressed => panic!("unexpected suppression"),
        }
    }

    #[test]
    fn percent_drives_target() {
        let s = StockSession::new();
        s.on_input(StockField::CurrentPrice, "100", &NullSink);
        let view = applied(s.on_input(StockField::PercentChange, "20", &NullSink));
        assert_eq!(s.value(StockField::TargetPrice), "120.00");
        assert_eq!(view.target_text, "$120.00");
        assert_eq!(view.percent_text, "+20.00%");
        assert_eq!(view.category, Some(SignCategory::Positive));
        assert_eq!(view.css_class(), "result positive");
    }

    #[test]
    fn target_drives_percent() {
        let s = StockSession::new();
        s.on_input(StockField::CurrentPrice, "100", &NullSink);
        let view = applied(s.on_input(StockField::TargetPrice, "90", &NullSink));
        assert_eq!(s.value(StockField::PercentChange), "-10.00");
        assert_eq!(view.percent_text, "-10.00%");
        assert_eq!(view.category, Some(SignCategory::Negative));
    }

    #[test]
    fn editing_one_derived_field_clears_the_other_first() {
        let mut sync = StockSync::default();
        sync.edit(StockField::CurrentPrice, "100");
        sync.edit(StockField::PercentChange, "20");
        let update = sync.edit(StockField::TargetPrice, "150");
        assert_eq!(update.phase, SyncPhase::DrivingByTarget);
        assert_eq!(
            update.writes,
            vec![
                (StockField::PercentChange, String::new()),
                (StockField::PercentChange, "50.00".to_string()),
            ]
        );
    }

    #[test]
    fn current_price_edit_keeps_mode() {
        let s = StockSession::new();
        s.on_input(StockField::CurrentPrice, "100", &NullSink);
        s.on_input(StockField::TargetPrice, "150", &NullSink);
        s.on_input(StockField::CurrentPrice, "120", &NullSink);
        assert_eq!(s.mode(), SyncPhase::DrivingByTarget);
        assert_eq!(s.value(StockField::TargetPrice), "150");
        assert_eq!(s.value(StockField::PercentChange), "25.00");
    }

    #[test]
    fn idle_mode_prefers_percent_when_current_arrives_last() {
        let mut sync = StockSync {
            current: String::new(),
            percent: "10".into(),
            target: "500".into(),
            mode: SyncPhase::Idle,
        };
        let update = sync.edit(StockField::CurrentPrice, "200");
        assert_eq!(update.phase, SyncPhase::DrivingByPercent);
        assert_eq!(sync.value(StockField::TargetPrice), "220.00");
    }

    #[test]
    fn incomplete_or_invalid_input_hides_result() {
        let s = StockSession::new();
        assert_eq!(s.on_input(StockField::PercentChange, "20", &NullSink), Dispatch::Applied(StockView::default()));

        for current in ["0", "-5", "abc"] {
            let view = applied(s.on_input(StockField::CurrentPrice, current, &NullSink));
            assert!(!view.visible, "current = {current}");
            assert_eq!(view.css_class(), "result hidden");
        }

        s.on_input(StockField::CurrentPrice, "100", &NullSink);
        let view = applied(s.on_input(StockField::TargetPrice, "-1", &NullSink));
        assert!(!view.visible);
        assert_eq!(s.value(StockField::PercentChange), "");
    }

    #[test]
    fn percent_below_minus_hundred_is_rejected() {
        assert_eq!(target_from_percent(100.0, -150.0), Err(CalcError::InvalidInput));
        assert_eq!(target_from_percent(100.0, -100.0), Ok(0.0));
    }

    #[test]
    fn derived_writes_do_not_reenter() {
        let session = Rc::new(StockSession::new());
        let sink = EchoSink { session: Rc::clone(&session), echoes: RefCell::new(Vec::new()) };

        session.on_input(StockField::CurrentPrice, "100", &sink);
        session.on_input(StockField::TargetPrice, "90", &sink);
        let view = applied(session.on_input(StockField::PercentChange, "20", &sink));

        let echoes = sink.echoes.borrow();
        assert!(!echoes.is_empty());
        for (_, _, phase, outcome) in echoes.iter() {
            assert_ne!(*phase, SyncPhase::Idle);
            assert_eq!(*outcome, Dispatch::Suppressed);
        }
        assert_eq!(session.phase(), SyncPhase::Idle);
        assert_eq!(session.mode(), SyncPhase::DrivingByPercent);
        assert_eq!(session.value(StockField::PercentChange), "20");
        assert_eq!(session.value(StockField::TargetPrice), "120.00");
        assert_eq!(view.target_text, "$120.00");
    }

    #[test]
    fn guard_resets_after_panicking_sink() {
        struct Boom;
        impl FieldSink for Boom {
            fn write(&self, _field: StockField, _text: &str) {
                panic!("sink failed");
            }
        }

        let s = StockSession::new();
        s.on_input(StockField::CurrentPrice, "100", &NullSink);
        let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            s.on_input(StockField::PercentChange, "5", &Boom);
        }));
        assert!(caught.is_err());
        assert_eq!(s.phase(), SyncPhase::Idle);
        assert!(matches!(s.on_input(StockField::PercentChange, "6", &NullSink), Dispatch::Applied(_)));
    }

    #[test]
    fn submit_recomputes_current_mode() {
        let s = StockSession::new();
        s.on_input(StockField::CurrentPrice, "50", &NullSink);
        s.on_input(StockField::PercentChange, "10", &NullSink);
        let view = applied(s.on_submit(&NullSink));
        assert_eq!(view.target_text, "$55.00");
    }

    #[test]
    fn overflowing_derivation_hides_result() {
        assert_eq!(target_from_percent(1e308, 100.0), Err(CalcError::InvalidInput));
        assert_eq!(percent_from_target(f64::MIN_POSITIVE / 4.0, 1e300), Err(CalcError::InvalidInput));

        let mut sync = StockSync::default();
        sync.edit(StockField::CurrentPrice, "1e308");
        let update = sync.edit(StockField::PercentChange, "100");
        assert!(!update.view.visible);
        assert!(update.writes.is_empty());
        assert_eq!(sync.value(StockField::TargetPrice), "");
    }

    #[test]
    fn tiny_change_is_styled_as_shown() {
        let mut sync = StockSync::default();
        sync.edit(StockField::CurrentPrice, "100");
        let update = sync.edit(StockField::PercentChange, "0.001");
        assert_eq!(update.view.percent_text, "0.00%");
        assert_eq!(update.view.category, Some(SignCategory::Neutral));
        assert_eq!(update.view.css_class(), "result");
    }

    proptest! {
        #[test]
        fn percent_target_round_trip(current in 50.0..10_000.0_f64, percent in -99.0..500.0_f64) {
            let mut sync = StockSync::default();
            sync.edit(StockField::CurrentPrice, &format!("{current}"));
            sync.edit(StockField::PercentChange, &format!("{percent}"));
            let target_text = sync.value(StockField::TargetPrice).to_string();

            sync.edit(StockField::TargetPrice, &target_text);
            let back = parse_field(sync.value(StockField::PercentChange)).unwrap();
            prop_assert!((back - percent).abs() <= 0.01 + 0.005 + 1e-9, "{} vs {}", back, percent);

            let target = parse_field(&target_text).unwrap();
            let exact = percent_from_target(current, target).unwrap();
            prop_assert!((exact - percent).abs() <= 0.01 + 1e-9);
        }
    }
}
