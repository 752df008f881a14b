//! Presentation layer
//!
//! Localization and view rendering on top of the engine.

pub mod i18n;
pub mod view;

pub use i18n::{Language, Strings};
pub use view::{dose_hint, render, CalculatorView};
