use super::{
    config::RevealConfig,
    unit::{CharacterUnit, SpacerUnit, Transition, Unit},
};
use crate::markup::{Element, HostElement, Node, WhiteSpace};

/// Replace an element's contents with one unit per character.
///
/// Top level text nodes are trimmed and dropped if nothing is left, nested elements are
/// flattened into their characters and line breaks are kept as they are.
///
/// Returns the child positions of every character unit, in reading order.
pub(crate) fn split_text(element: &mut HostElement, config: &RevealConfig) -> Vec<usize> {
    element.set_white_space(WhiteSpace::Pre);

    let content = element.take_children();
    let mut splitter = Splitter { element, transition: initial_transition(config), characters: Vec::new() };
    for node in content {
        match node {
            Node::Element(child) if child.is_line_break() => splitter.push(Node::Element(child)),
            Node::Element(child) => splitter.split_element(&child),
            Node::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    splitter.split_str(text);
                }
            }
            Node::Comment(_) => (),
            Node::Unit(unit) => splitter.split_unit(&unit),
        }
    }
    splitter.characters
}

fn initial_transition(config: &RevealConfig) -> Transition {
    Transition::Timed { opacity: config.fade_duration, color: config.color_delay }
}

struct Splitter<'a> {
    element: &'a mut HostElement,
    transition: Transition,
    characters: Vec<usize>,
}

impl Splitter<'_> {
    fn split_element(&mut self, element: &Element) {
        for child in &element.children {
            match child {
                Node::Element(child) if child.is_line_break() => self.push(Node::Element(child.clone())),
                Node::Element(child) => self.split_element(child),
                Node::Text(text) => self.split_str(text),
                Node::Comment(_) => (),
                Node::Unit(unit) => self.split_unit(unit),
            }
        }
    }

    fn split_str(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '\n' => self.push(Node::Element(Element::line_break())),
                c if c.is_whitespace() => self.push(Node::Unit(Unit::Spacer(SpacerUnit::default()))),
                c => self.push_character(c),
            }
        }
    }

    // Splitting an already split element starts every character over.
    fn split_unit(&mut self, unit: &Unit) {
        match unit {
            Unit::Char(unit) => self.push_character(unit.ch()),
            Unit::Spacer(spacer) => self.push(Node::Unit(Unit::Spacer(*spacer))),
        }
    }

    fn push_character(&mut self, c: char) {
        self.characters.push(self.element.children().len());
        self.push(Node::Unit(Unit::Char(CharacterUnit::new(c, self.transition))));
    }

    fn push(&mut self, node: Node) {
        self.element.append(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn split(mut element: HostElement) -> (HostElement, Vec<usize>) {
        let characters = split_text(&mut element, &RevealConfig::default());
        (element, characters)
    }

    fn shape(element: &HostElement) -> String {
        element
            .children()
            .iter()
            .map(|node| match node {
                Node::Unit(Unit::Char(unit)) => unit.ch(),
                Node::Unit(Unit::Spacer(_)) => '_',
                Node::Element(element) if element.is_line_break() => '|',
                _ => '?',
            })
            .collect()
    }

    #[test]
    fn simple_text() {
        let (element, characters) = split(HostElement::from_text("a b"));
        assert_eq!(shape(&element), "a_b");
        assert_eq!(characters, vec![0, 2]);
        assert_eq!(element.white_space(), WhiteSpace::Pre);
    }

    #[rstest]
    #[case::trimmed("  hi  ", "hi")]
    #[case::interior_spaces("a  b", "a__b")]
    #[case::newline("a\nb", "a|b")]
    #[case::tab("a\tb", "a_b")]
    #[case::only_whitespace("   \n  ", "")]
    #[case::empty("", "")]
    fn text_nodes(#[case] input: &str, #[case] expected: &str) {
        let (element, _) = split(HostElement::from_text(input));
        assert_eq!(shape(&element), expected);
    }

    #[test]
    fn nested_elements_are_flattened() {
        let element = HostElement::new(vec![
            Node::from("Hi"),
            Node::from("   "),
            Element::new("b", vec![Node::from(" big "), Element::new("i", vec![Node::from("x")]).into()]).into(),
            Element::line_break().into(),
            Node::Comment("nope".into()),
            Node::from(" end "),
        ]);
        let (element, characters) = split(element);
        // whitespace only text between elements vanishes but element text is kept verbatim
        assert_eq!(shape(&element), "Hi_big_x|end");
        assert_eq!(characters.len(), 9);
    }

    #[test]
    fn line_break_inside_element_is_kept() {
        let element = HostElement::new(vec![Element::new(
            "span",
            vec![Node::from("a"), Element::new("BR", vec![]).into(), Node::from("b")],
        )
        .into()]);
        let (element, _) = split(element);
        assert_eq!(shape(&element), "a|b");
        assert!(matches!(&element.children()[1], Node::Element(e) if e.tag == "BR"));
    }

    #[test]
    fn characters_in_reading_order() {
        let (element, _) = split(HostElement::from_markup("The <em>quick</em> fox").expect("parse failed"));
        let text: String = element.character_units().map(CharacterUnit::ch).collect();
        assert_eq!(text, "Thequickfox");
    }

    #[test]
    fn character_units_start_hidden() {
        let config = RevealConfig::default();
        let mut element = HostElement::from_text("ab");
        let characters = split_text(&mut element, &config);
        for index in characters {
            let unit = element.character_unit_mut(index).expect("not a character");
            assert_eq!(unit.opacity(), 0.0);
            assert!(unit.is_assistive_hidden());
            assert!(unit.is_animatable());
            assert_eq!(
                unit.transition(),
                Transition::Timed { opacity: config.fade_duration, color: config.color_delay }
            );
        }
    }

    #[test]
    fn splitting_twice_keeps_characters() {
        let (mut element, _) = split(HostElement::from_text("a b"));
        let characters = split_text(&mut element, &RevealConfig::default());
        assert_eq!(shape(&element), "a_b");
        assert_eq!(characters, vec![0, 2]);
    }

    #[test]
    fn spacers_have_fixed_width() {
        let (element, _) = split(HostElement::from_text("a b"));
        let Node::Unit(Unit::Spacer(spacer)) = &element.children()[1] else {
            panic!("not a spacer");
        };
        assert_eq!(spacer.width_em, 0.35);
    }
}
