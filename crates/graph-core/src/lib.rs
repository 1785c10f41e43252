//! Strategy-graph model and editor session for the bot builder.
//!
//! This crate owns the data side of the visual strategy builder:
//!
//! - **Catalog**: the closed set of node kinds with their typed,
//!   defaulted property schemas ([`NodeKind`], [`NodeDescriptor`])
//! - **Graph**: nodes and directed connections with unique increasing
//!   ids, idempotent edges, and cascade deletes ([`Graph`])
//! - **Editor**: selection, dragging, the two-click connection protocol,
//!   property coercion, and templates ([`Editor`])
//! - **View seam**: the rendering layer is external and receives updates
//!   through [`EditorView`]
//!
//! There is no execution engine behind the graph: a built strategy is a
//! picture, not a program.
//!
//! # Example
//!
//! ```rust
//! use graph_core::{Editor, PortRole};
//!
//! let mut editor = Editor::default();
//! let feed = editor.create_node("price-feed", 100.0, 100.0);
//! let rsi = editor.create_node("rsi", 300.0, 100.0);
//!
//! editor.handle_port_click(feed, PortRole::Output);
//! editor.handle_port_click(rsi, PortRole::Input);
//! assert_eq!(editor.graph().connection_count(), 1);
//! ```

mod catalog;
mod editor;
mod geometry;
mod graph;
mod node;
mod templates;
mod view;

pub use catalog::{
    ChoiceOption, NodeDescriptor, NodeKind, PropertyDef, PropertyKind, UnknownNodeKind,
};
pub use editor::{Editor, PortRole, PortSelection};
pub use geometry::{ConnectionPath, Point, NODE_HEIGHT, NODE_WIDTH};
pub use graph::{Connection, Graph};
pub use node::{Node, NodeId, PropertyValue};
pub use templates::{Template, TEMPLATES};
pub use view::{EditorView, NoticeLevel, NullView};
