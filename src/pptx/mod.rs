//! PowerPoint (.pptx) packages.
//!
//! [`Presentation`] writes a deck; [`DeckReader`] reads one back into a
//! [`DeckOutline`](crate::model::DeckOutline).

mod parts;
mod reader;
mod template;
mod writer;

pub use reader::DeckReader;
pub use writer::{Presentation, SlideHandle};
