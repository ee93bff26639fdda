//! File management module for Files Manager.
//!
//! This module provides:
//! - File and folder metadata with a one-level-checked hierarchy
//! - Owner/public visibility rules
//! - Content storage under opaque references

mod node;
mod registry;
mod storage;

pub use node::{FileNode, NodeType, ParentRef};
pub use registry::{FileRegistry, NodeDraft};
pub use storage::{derived_ref, ContentStore, FileContentStore};

/// Number of nodes per listing page.
pub const PAGE_SIZE: u64 = 20;

/// Rendition widths, in generation order.
pub const THUMBNAIL_WIDTHS: [u32; 3] = [500, 250, 100];
