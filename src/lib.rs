//! Sonaplex library - Audio-reactive particle constellation

pub mod audio;
pub mod cli;
pub mod cloud;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod settings;
pub mod spectrum;
