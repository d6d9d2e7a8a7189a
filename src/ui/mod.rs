/// Display layer: plain-text rendering of already-shaped derived views.
pub mod render;
