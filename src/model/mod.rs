//! Deck model.
//!
//! `SlideSpec`/`DeckSpec` describe what to build; `DeckOutline` describes
//! what a written package actually contains.

mod deck;
mod outline;
mod slide;

pub use deck::*;
pub use outline::*;
pub use slide::*;
