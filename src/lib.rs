//! Library crate for userlist-viewer.
//!
//! This crate exposes the building blocks of the TUI:
//! - Record model and field access (`model`)
//! - Filter, sort and pagination pipeline (`pipeline`)
//! - Search debouncing (`debounce`)
//! - Remote user directory client (`remote`)
//! - Column metadata (`columns`)
//! - Application state and update loop (`app`)
//! - Error and result types (`error`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `userlist-viewer` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod app;
pub mod columns;
pub mod debounce;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod remote;
pub mod ui;

/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
