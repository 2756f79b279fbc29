//! Interactive railroad-diagram views for macro source blocks.
//!
//! Every block matching the configured selector (`pre.macro` by default) gets
//! an inline diagram, a full-screen modal and a panel of rendering options.
//! Diagrams come from an external [`render::DiagramRenderer`]; this crate only
//! owns the per-block state and the document subtree around it.

pub mod assets;
pub mod config;
pub mod discovery;
pub mod dom;
pub mod error;
pub mod instance;
pub mod modal;
pub mod options;
pub mod page;
pub mod panel;
pub mod ready;
pub mod render;
mod xml;

pub use config::Config;
pub use error::{Error, Result};
pub use instance::{Instance, Phase};
pub use options::{DiagramOptions, OptionKey};
pub use page::Page;
pub use render::{CommandRenderer, Diagram, DiagramRenderer, RenderFailure, RenderResult};
