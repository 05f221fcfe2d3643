//! Interactive shell for the Vibe Videos client.
//!
//! Presentation chrome over the core crates: renders the current surface
//! (auth stage or library), dispatches line commands, and hands playback
//! to an external player via stream URLs.

pub mod shell;

pub use shell::Shell;
