//! Turns an element into a grid of colored cells for a point in time.

pub mod terminal;

use crate::{
    color::Color,
    markup::{HostElement, Node},
    reveal::{
        config::RevealConfig,
        unit::{CharacterUnit, ColorStage, Unit},
    },
};
use std::time::Duration;

/// The concrete colors an effect paints with.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Palette {
    accent: Option<Color>,
    transition: Option<Color>,
    final_color: Option<Color>,
    background: Option<Color>,
}

impl Palette {
    /// Build a palette out of an effect's configuration.
    ///
    /// Colors that can't be parsed are left unset and rendered with the terminal's default.
    pub fn new(config: &RevealConfig, background: Option<Color>) -> Self {
        Self {
            accent: parse_color(&config.accent_color),
            transition: parse_color(&config.transition_color),
            final_color: parse_color(&config.final_color),
            background,
        }
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    fn stage(&self, stage: ColorStage) -> Option<Color> {
        match stage {
            ColorStage::Accent => self.accent,
            ColorStage::Transition => self.transition,
            ColorStage::Final => self.final_color,
        }
    }
}

fn parse_color(input: &str) -> Option<Color> {
    match Color::from_hex(input) {
        Ok(color) => Some(color),
        Err(e) => {
            log::warn!("{e}; using default terminal color");
            None
        }
    }
}

/// A single rendered character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub foreground: Option<Color>,
}

impl Cell {
    fn blank() -> Self {
        Self { ch: ' ', foreground: None }
    }

    fn plain(ch: char) -> Self {
        Self { ch, foreground: None }
    }
}

/// Render an element as it looks at `now`, one row of cells per line.
pub fn frame(element: &HostElement, palette: &Palette, now: Duration) -> Vec<Vec<Cell>> {
    let mut lines = vec![Vec::new()];
    for node in element.children() {
        render_node(node, palette, now, &mut lines);
    }
    lines
}

/// The size of the widest line and the number of lines in a frame.
pub fn frame_size(frame: &[Vec<Cell>]) -> (usize, usize) {
    let width = frame.iter().map(Vec::len).max().unwrap_or(0);
    (width, frame.len())
}

fn render_node(node: &Node, palette: &Palette, now: Duration, lines: &mut Vec<Vec<Cell>>) {
    match node {
        Node::Element(element) if element.is_line_break() => lines.push(Vec::new()),
        Node::Element(element) => {
            for child in &element.children {
                render_node(child, palette, now, lines);
            }
        }
        Node::Text(text) => {
            for c in text.chars() {
                match c {
                    '\n' => lines.push(Vec::new()),
                    c => push_cell(lines, Cell::plain(c)),
                }
            }
        }
        Node::Comment(_) => (),
        Node::Unit(Unit::Spacer(_)) => push_cell(lines, Cell::blank()),
        Node::Unit(Unit::Char(unit)) => push_cell(lines, render_character(unit, palette, now)),
    }
}

fn push_cell(lines: &mut [Vec<Cell>], cell: Cell) {
    if let Some(line) = lines.last_mut() {
        line.push(cell);
    }
}

fn render_character(unit: &CharacterUnit, palette: &Palette, now: Duration) -> Cell {
    let opacity = unit.opacity_at(now);
    if opacity <= 0.0 {
        return Cell::blank();
    }

    let change = unit.color_change();
    let color = match (palette.stage(change.from), palette.stage(change.to)) {
        (Some(from), Some(to)) => Some(from.blend(to, change.progress(now))),
        (_, to) => to,
    };
    match (color, palette.background) {
        // Fade in by blending from the background.
        (Some(color), Some(background)) => Cell { ch: unit.ch(), foreground: Some(background.blend(color, opacity)) },
        // Without a background there's nothing to blend with, so characters pop in halfway.
        _ if opacity < 0.5 => Cell::blank(),
        (color, _) => Cell { ch: unit.ch(), foreground: color },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reveal::{config::RevealOptions, RevealEffect};

    fn millis(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn text(frame: &[Vec<Cell>]) -> Vec<String> {
        frame.iter().map(|line| line.iter().map(|cell| cell.ch).collect()).collect()
    }

    fn effect(markup: &str) -> RevealEffect {
        let element = HostElement::from_markup(markup).expect("parse failed");
        RevealEffect::new(element, RevealOptions::default().resolve(), fastrand::Rng::with_seed(9))
    }

    #[test]
    fn unsplit_element() {
        let element = HostElement::from_markup("one<br/>two <b>three</b>").expect("parse failed");
        let frame = frame(&element, &Palette::default(), Duration::ZERO);
        assert_eq!(text(&frame), ["one", "two three"]);
        assert_eq!(frame_size(&frame), (9, 2));
    }

    #[test]
    fn hidden_characters_are_blank() {
        let effect = effect("ab cd");
        let palette = Palette::new(effect.config(), Some(Color::WHITE));
        let frame = frame(effect.element(), &palette, Duration::ZERO);
        assert_eq!(text(&frame), ["     "]);
    }

    #[test]
    fn revealed_characters_use_final_color() {
        let mut effect = effect("ab<br/>cd");
        effect.observe_intersection(1.0, Duration::ZERO);
        effect.poll(millis(10_000));

        let palette = Palette::new(effect.config(), Some(Color::WHITE));
        let frame = frame(effect.element(), &palette, millis(10_000));
        assert_eq!(text(&frame), ["ab", "cd"]);
        for cell in frame.iter().flatten() {
            assert_eq!(cell.foreground, Some(Color::BLACK));
        }
    }

    #[test]
    fn fading_blends_with_background() {
        let mut effect = effect("a");
        effect.observe_intersection(1.0, Duration::ZERO);
        effect.poll(Duration::ZERO);

        let palette = Palette::new(effect.config(), Some(Color::WHITE));
        // halfway through the fade, still in accent color
        let frame = frame(effect.element(), &palette, millis(175));
        let expected = Color::WHITE.blend(Color::new(255, 122, 0), 0.5);
        assert_eq!(frame[0][0].foreground, Some(expected));
    }

    #[test]
    fn no_background_pops_in() {
        let mut effect = effect("a");
        effect.observe_intersection(1.0, Duration::ZERO);
        effect.poll(Duration::ZERO);

        let palette = Palette::new(effect.config(), None);
        assert_eq!(frame(effect.element(), &palette, millis(100))[0][0].ch, ' ');
        assert_eq!(frame(effect.element(), &palette, millis(200))[0][0].ch, 'a');
    }

    #[test]
    fn unparseable_colors_fall_back() {
        let options = RevealOptions { accent_color: Some("orange".into()), ..Default::default() };
        let palette = Palette::new(&options.resolve(), None);
        assert_eq!(palette.stage(ColorStage::Accent), None);
        assert_eq!(palette.stage(ColorStage::Final), Some(Color::BLACK));
    }
}
