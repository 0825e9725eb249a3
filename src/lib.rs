//! BoWo - skateboarding trick progression backend
//!
//! Riders learn tricks by answering eight levelled questions per trick. Every
//! step feeds a reward engine: XP and levels, daily streaks, badges, skill
//! decks drawn on mastery, alive decks bought with XP tokens, avatars and
//! mini-games.
//!
//! ## Layers
//!
//! - `progression`: pure reward rules over a `UserProgress` document
//! - `content`: tricks, mastery questions and unlock quizzes
//! - `store`: SQLite persistence behind the `ProgressStore` trait
//! - `service`: the use cases (load, ensure fresh, mutate, save)
//! - `auth` and `http`: accounts and the JSON API for the mobile app

pub mod auth;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod progression;
pub mod service;
pub mod store;

pub use error::{BowoError, BowoResult};
