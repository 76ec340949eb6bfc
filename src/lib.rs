//! Scroll triggered text reveal effect.
//!
//! Text is split into one unit per character, and whenever the element holding it comes into
//! view its characters fade in in random order while flashing from an accent color towards
//! their final one.
//!
//! ```
//! use flashy_reveal::{text_flashy_reveal, HostElement, RevealOptions};
//! use std::time::Duration;
//!
//! let element = HostElement::from_markup("Hello <b>there</b>").unwrap();
//! let mut effect = text_flashy_reveal(Some(element), RevealOptions::default()).unwrap();
//! effect.observe_intersection(1.0, Duration::ZERO);
//! effect.poll(Duration::from_secs(5));
//! assert!(effect.element().character_units().all(|unit| unit.opacity() == 1.0));
//! ```

pub mod color;
pub mod markup;
pub mod render;
pub mod reveal;

pub use crate::{
    color::{lighten_color, Color},
    markup::{HostElement, MarkupError},
    reveal::{
        config::{ConfigError, RevealConfig, RevealOptions},
        text_flashy_reveal, PollableState, RevealEffect, RevealError, RevealPhase,
    },
};
