//! Core forest parsing and 2-D tree layout library.
//!
//! Main components:
//! - [`forest`] — forest nodes and the node store.
//! - [`parse`] — loader for textual forest descriptions.
//! - [`layout`] — recursive node placement and re-centering.
//! - [`publish`] — layout-change observers, animation pacing, frame snapshots.
//! - [`config`] — geometry constants and pacing for the layout.
//! - [`types`] — shared type aliases and IDs.

pub mod config;
pub mod forest;
pub mod layout;
pub mod parse;
pub mod publish;
pub mod types;
