//! # Dmensions CLI
//!
//! Terminal front-end for the concept starfield: add concepts, search them
//! semantically, and draw their t-SNE layout as text.
//!
//! ```sh
//! dmensions add "red panda" walrus
//! dmensions search "big cat" --limit 5
//! dmensions sky --seed 42 --width 120
//! ```

pub mod commands;
pub mod config;
pub mod render;

pub use commands::{Cli, Commands};
pub use config::DmensionsConfig;
