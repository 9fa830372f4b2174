//! Threadsmith - Gemini-powered Threads post generator
//!
//! Threadsmith turns a mood, a scene and a handful of keywords into a batch
//! of Threads-style zh-TW posts via the Gemini API, renders them as terminal
//! cards, and supports local editing, filtering, scheduling, publishing and
//! per-post visual generation from an interactive session.
//!
//! # Architecture
//!
//! - **commands**: CLI command implementations (generate, session, styles, init)
//! - **core**: Core functionality (prompt builder, gemini client, post store, card state, style tables)
//! - **models**: Data structures (config, post, selection)
//! - **error**: Error types

pub mod commands;
pub mod core;
pub mod error;
pub mod models;

pub use error::{GeminiError, Result, ThreadsmithError};
