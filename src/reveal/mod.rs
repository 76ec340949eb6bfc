//! The flashy reveal effect.
//!
//! [text_flashy_reveal] splits an element's text into per character units and returns a
//! [RevealEffect] that animates them whenever the element scrolls into view. The effect is
//! driven entirely by its caller: feed it visibility updates through
//! [RevealEffect::observe_intersection] and let time pass through [RevealEffect::poll].

pub mod config;
pub mod segment;
pub mod sequencer;
pub mod timer;
pub mod unit;
pub mod visibility;

use self::{
    config::{RevealConfig, RevealOptions},
    segment::split_text,
    sequencer::{ResetMode, SequenceMode, Stage, StageAction},
    timer::TimerQueue,
    visibility::{Rect, VisibilityChange, VisibilityWatcher},
};
use crate::markup::HostElement;
use std::time::Duration;

/// Start a reveal effect on an element.
///
/// The element's content is replaced right away by hidden character units. Fails without
/// touching anything if no element is given.
pub fn text_flashy_reveal(element: Option<HostElement>, options: RevealOptions) -> Result<RevealEffect, RevealError> {
    let element = element.ok_or(RevealError::MissingElement)?;
    Ok(RevealEffect::new(element, options.resolve(), fastrand::Rng::new()))
}

/// Where the effect is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum RevealPhase {
    /// The element hasn't been in view yet.
    NeverAnimated,

    /// The element is in view and has been animated at least once.
    Visible,

    /// The element left the view and its characters were hidden again.
    HiddenAfterAnimation,
}

/// The result of polling an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollableState {
    /// Some character changed.
    Modified,

    /// Nothing changed, but there's more to come.
    Unmodified,

    /// Nothing changed and nothing is pending.
    Done,
}

/// A running reveal effect on an element.
#[derive(Debug)]
pub struct RevealEffect {
    element: HostElement,
    config: RevealConfig,
    characters: Vec<usize>,
    phase: RevealPhase,
    has_animated: bool,
    watcher: VisibilityWatcher,
    timers: TimerQueue<StageAction>,
    generation: u64,
    reveal_generation: u64,
    rng: fastrand::Rng,
    now: Duration,
}

impl RevealEffect {
    /// Split the element's text, hide every character and start watching for visibility.
    pub fn new(mut element: HostElement, config: RevealConfig, rng: fastrand::Rng) -> Self {
        let characters = split_text(&mut element, &config);
        log::debug!("split element into {} animatable characters", characters.len());

        let watcher = VisibilityWatcher::new(config.threshold);
        let mut effect = Self {
            element,
            config,
            characters,
            phase: RevealPhase::NeverAnimated,
            has_animated: false,
            watcher,
            timers: TimerQueue::new(),
            generation: 0,
            reveal_generation: 0,
            rng,
            now: Duration::ZERO,
        };
        effect.reset(ResetMode::Immediate);
        effect
    }

    pub fn element(&self) -> &HostElement {
        &self.element
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Whether the first reveal already happened.
    pub fn has_animated(&self) -> bool {
        self.has_animated
    }

    /// The number of stages waiting to fire.
    pub fn pending_stages(&self) -> usize {
        self.timers.len()
    }

    /// When the next pending stage fires, if any.
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    /// Whether this effect still reacts to visibility changes.
    pub fn is_active(&self) -> bool {
        self.watcher.is_connected()
    }

    /// Report the element's and the viewport's current geometry.
    pub fn observe_viewport(&mut self, element: &Rect, viewport: &Rect, now: Duration) {
        self.observe_intersection(element.intersection_ratio(viewport), now);
    }

    /// Report the fraction of the element currently in view.
    pub fn observe_intersection(&mut self, ratio: f64, now: Duration) {
        self.advance_clock(now);
        let Some(change) = self.watcher.observe(ratio) else {
            return;
        };
        log::debug!("element {change} view at ratio {ratio:.2} while {}", self.phase);
        match change {
            VisibilityChange::Entered => self.on_enter(),
            VisibilityChange::Left => self.on_leave(),
        }
    }

    /// Fire every stage that's due by `now`.
    pub fn poll(&mut self, now: Duration) -> PollableState {
        self.advance_clock(now);
        let mut modified = false;
        for (due, action) in self.timers.drain_due(self.now) {
            if !self.is_current(&action) {
                log::trace!("dropping stale {:?} from generation {}", action.stage, action.generation);
                continue;
            }
            let Some(unit) = self.characters.get(action.unit).and_then(|index| self.element.character_unit_mut(*index))
            else {
                continue;
            };
            action.stage.apply(unit, due);
            modified = true;
        }
        match (modified, self.timers.is_empty()) {
            (true, _) => PollableState::Modified,
            (false, false) => PollableState::Unmodified,
            (false, true) => PollableState::Done,
        }
    }

    /// Put every character back in its hidden state.
    ///
    /// Any stage scheduled before this call is discarded.
    pub fn reset(&mut self, mode: ResetMode) {
        self.generation += 1;
        self.reveal_generation = self.generation;
        log::debug!("{mode} reset, generation {}", self.generation);
        sequencer::reset(self.element.character_units_mut(), mode, &self.config, self.now);
    }

    /// Stop reacting to visibility changes.
    ///
    /// Stages that were already scheduled still fire when polled.
    pub fn dispose(&mut self) {
        log::debug!("disposing reveal effect");
        self.watcher.disconnect();
    }

    fn on_enter(&mut self) {
        if !self.has_animated {
            self.play(SequenceMode::Full);
            self.has_animated = true;
        } else if self.config.replay {
            let mode = if self.config.reveal_on_replay { SequenceMode::Full } else { SequenceMode::HighlightOnly };
            self.play(mode);
        } else {
            return;
        }
        self.phase = RevealPhase::Visible;
    }

    fn on_leave(&mut self) {
        if self.config.replay && self.has_animated && self.config.reveal_on_replay {
            self.reset(ResetMode::Immediate);
            self.phase = RevealPhase::HiddenAfterAnimation;
        }
    }

    fn play(&mut self, mode: SequenceMode) {
        self.generation += 1;
        if mode == SequenceMode::Full {
            self.reveal_generation = self.generation;
        }
        let order = sequencer::shuffled_order(self.characters.len(), &mut self.rng);
        log::debug!("playing {mode} sequence over {} characters, generation {}", order.len(), self.generation);
        sequencer::schedule(&mut self.timers, &order, mode, &self.config, self.now, self.generation);
    }

    // Highlight only replays never touch opacity, so characters still waiting to appear keep
    // their pending appearance.
    fn is_current(&self, action: &StageAction) -> bool {
        match action.stage {
            Stage::Appear => action.generation >= self.reveal_generation,
            _ => action.generation == self.generation,
        }
    }

    fn advance_clock(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

/// An error starting a reveal effect.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RevealError {
    #[error("an element is required for the reveal effect")]
    MissingElement,
}
