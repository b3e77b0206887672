//! Tremolo library - audio-reactive point rendition of a painting

pub mod assets;
pub mod audio;
pub mod classify;
pub mod cli;
pub mod error;
pub mod field;
pub mod motion;
pub mod params;
pub mod rendering;
pub mod session;
