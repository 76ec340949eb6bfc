use std::time::Duration;

/// The inline width of a spacer, in `em` units.
pub const SPACER_WIDTH_EM: f32 = 0.35;

/// The color a character unit is currently painted with.
///
/// Units only ever cycle through these three, the actual colors are looked up in the effect's
/// configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ColorStage {
    Accent,
    Transition,
    Final,
}

/// How property changes on a unit are animated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Changes apply instantly.
    None,

    /// Changes are eased over the given durations.
    Timed { opacity: Duration, color: Duration },
}

impl Transition {
    fn opacity_duration(&self) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Timed { opacity, .. } => *opacity,
        }
    }

    fn color_duration(&self) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Timed { color, .. } => *color,
        }
    }
}

/// The operations sequencing and reset need from a renderable text unit.
pub trait TextUnit {
    /// Set the unit's opacity at the given point in time.
    fn set_opacity(&mut self, opacity: f32, now: Duration);

    /// Paint the unit with the given color at the given point in time.
    fn set_color(&mut self, stage: ColorStage, now: Duration);

    /// Set how future changes are animated.
    fn set_transition(&mut self, transition: Transition);

    /// Hide or expose this unit to assistive technology.
    fn set_assistive_hidden(&mut self, hidden: bool);

    /// Commit any pending style changes so a later transition change doesn't apply to them.
    fn flush(&mut self) {}
}

/// A change of a property from one value to another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Change<T> {
    pub from: T,
    pub to: T,
    pub at: Duration,
    pub duration: Duration,
}

impl<T: Copy> Change<T> {
    fn settled(value: T) -> Self {
        Self { from: value, to: value, at: Duration::ZERO, duration: Duration::ZERO }
    }

    /// How far along this change is at `now`, in `[0, 1]`.
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() || now >= self.at.saturating_add(self.duration) {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.at);
        (elapsed.as_nanos() as f64 / self.duration.as_nanos() as f64) as f32
    }
}

/// A single animatable character.
#[derive(Clone, Debug, PartialEq)]
pub struct CharacterUnit {
    ch: char,
    opacity: Change<f32>,
    color: Change<ColorStage>,
    transition: Transition,
    assistive_hidden: bool,
    animatable: bool,
}

impl CharacterUnit {
    /// Construct a hidden, accent colored unit for a character.
    pub fn new(ch: char, transition: Transition) -> Self {
        Self {
            ch,
            opacity: Change::settled(0.0),
            color: Change::settled(ColorStage::Accent),
            transition,
            assistive_hidden: true,
            animatable: true,
        }
    }

    /// The character this unit displays.
    pub fn ch(&self) -> char {
        self.ch
    }

    /// The opacity this unit has, or is transitioning to.
    pub fn opacity(&self) -> f32 {
        self.opacity.to
    }

    /// The color this unit has, or is transitioning to.
    pub fn color(&self) -> ColorStage {
        self.color.to
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }

    pub fn is_assistive_hidden(&self) -> bool {
        self.assistive_hidden
    }

    pub fn is_animatable(&self) -> bool {
        self.animatable
    }

    /// The eased opacity at `now`.
    pub fn opacity_at(&self, now: Duration) -> f32 {
        let progress = self.opacity.progress(now);
        self.opacity.from + (self.opacity.to - self.opacity.from) * progress
    }

    /// The last color change this unit went through.
    pub fn color_change(&self) -> &Change<ColorStage> {
        &self.color
    }
}

impl TextUnit for CharacterUnit {
    fn set_opacity(&mut self, opacity: f32, now: Duration) {
        let from = self.opacity_at(now);
        self.opacity = Change { from, to: opacity, at: now, duration: self.transition.opacity_duration() };
    }

    fn set_color(&mut self, stage: ColorStage, now: Duration) {
        self.color = Change { from: self.color.to, to: stage, at: now, duration: self.transition.color_duration() };
    }

    fn set_transition(&mut self, transition: Transition) {
        self.transition = transition;
    }

    fn set_assistive_hidden(&mut self, hidden: bool) {
        self.assistive_hidden = hidden;
    }
}

/// A fixed width, never animated placeholder for a space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpacerUnit {
    pub width_em: f32,
}

impl Default for SpacerUnit {
    fn default() -> Self {
        Self { width_em: SPACER_WIDTH_EM }
    }
}

/// A unit produced by splitting text.
#[derive(Clone, Debug, PartialEq)]
pub enum Unit {
    Char(CharacterUnit),
    Spacer(SpacerUnit),
}
