//! HTTP request handlers
//!
//! This module organizes all API handlers into logical groups:
//! - `api` - Health check and landing page
//! - `generate` - Emotion-aware speech generation
//! - `emotions` - Emotion labels and their voice profiles
//! - `audio` - Generated audio download

pub mod api;
pub mod audio;
pub mod emotions;
pub mod generate;

pub use generate::generate_handler;
