use super::{
    config::RevealConfig,
    timer::TimerQueue,
    unit::{ColorStage, TextUnit, Transition},
};
use std::time::Duration;

/// How a sequence treats characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SequenceMode {
    /// Fade characters in and cycle their colors.
    Full,

    /// Only cycle colors, characters are expected to already be visible.
    HighlightOnly,
}

/// A single step in a character's sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Make the character visible.
    Appear,

    /// Paint the character with the accent color again.
    Highlight,

    /// Paint the character with the transition color.
    Flash,

    /// Paint the character with its final color.
    Settle,
}

impl Stage {
    /// Apply this stage to a unit.
    pub fn apply<U: TextUnit>(self, unit: &mut U, now: Duration) {
        match self {
            Self::Appear => unit.set_opacity(1.0, now),
            Self::Highlight => unit.set_color(ColorStage::Accent, now),
            Self::Flash => unit.set_color(ColorStage::Transition, now),
            Self::Settle => unit.set_color(ColorStage::Final, now),
        }
    }
}

/// A stage scheduled for a specific character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageAction {
    /// The character's position among the effect's character units.
    pub unit: usize,
    pub stage: Stage,
    /// The generation of the sequence that scheduled this action.
    pub generation: u64,
}

/// A uniformly random ordering of `len` character positions.
pub fn shuffled_order(len: usize, rng: &mut fastrand::Rng) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    rng.shuffle(&mut order);
    order
}

/// Schedule a sequence for every character in `order`.
///
/// The character at position `i` in `order` starts at `start + i * reveal_delay`, flashes
/// `flash_delay` later and settles `color_delay` after that. Every stage is scheduled on its
/// own so no character's sequence ever waits on another one.
pub fn schedule(
    queue: &mut TimerQueue<StageAction>,
    order: &[usize],
    mode: SequenceMode,
    config: &RevealConfig,
    start: Duration,
    generation: u64,
) {
    let first_stage = match mode {
        SequenceMode::Full => Stage::Appear,
        SequenceMode::HighlightOnly => Stage::Highlight,
    };
    for (slot, unit) in order.iter().copied().enumerate() {
        let slot = u32::try_from(slot).unwrap_or(u32::MAX);
        let begin = start.saturating_add(config.reveal_delay.saturating_mul(slot));
        let flash = begin.saturating_add(config.flash_delay);
        let settle = flash.saturating_add(config.color_delay);
        for (due, stage) in [(begin, first_stage), (flash, Stage::Flash), (settle, Stage::Settle)] {
            queue.schedule(due, StageAction { unit, stage, generation });
        }
    }
}

/// How a reset is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ResetMode {
    /// Snap back to the hidden state without animating.
    Immediate,

    /// Fade back to the hidden state.
    Animated,
}

/// Restore units to their pre reveal state: invisible and accent colored.
pub fn reset<'a, U, I>(units: I, mode: ResetMode, config: &RevealConfig, now: Duration)
where
    U: TextUnit + 'a,
    I: IntoIterator<Item = &'a mut U>,
{
    let faded = Transition::Timed { opacity: config.fade_duration, color: config.fade_duration };
    for unit in units {
        match mode {
            ResetMode::Immediate => unit.set_transition(Transition::None),
            ResetMode::Animated => unit.set_transition(faded),
        };
        unit.set_opacity(0.0, now);
        unit.set_color(ColorStage::Accent, now);
        if mode == ResetMode::Immediate {
            unit.flush();
            unit.set_transition(faded);
        }
    }
}
