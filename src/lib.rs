//! Cybweb library - wave-driven web mesh and its renderer

pub mod camera;
pub mod cli;
pub mod error;
pub mod params;
pub mod rendering;
pub mod shutdown;
pub mod timing;
pub mod web;
