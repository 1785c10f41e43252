//! The seam to the rendering layer.
//!
//! The editor owns graph state and interaction logic; everything visual is
//! pushed through [`EditorView`]. A real frontend implements it; tests use
//! a recording implementation; [`NullView`] drops everything.

use crate::editor::PortRole;
use crate::geometry::ConnectionPath;
use crate::node::{Node, NodeId};

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Receiver of visual updates from an [`crate::Editor`].
///
/// All methods default to no-ops so implementations only handle what they
/// render.
pub trait EditorView {
    /// A node was created and should appear at its position.
    fn node_mounted(&mut self, _node: &Node) {}

    /// A node was deleted and should disappear.
    fn node_unmounted(&mut self, _id: NodeId) {}

    /// A node moved during a drag.
    fn node_moved(&mut self, _id: NodeId, _x: f64, _y: f64) {}

    /// The full connection layer was recomputed.
    fn connections_redrawn(&mut self, _paths: &[ConnectionPath]) {}

    /// The selection changed (`None` = nothing selected).
    fn selection_changed(&mut self, _selected: Option<NodeId>) {}

    /// The property panel should show this node's properties.
    fn properties_shown(&mut self, _node: &Node) {}

    /// The property panel should reset to its placeholder.
    fn properties_cleared(&mut self) {}

    /// A port was armed as the pending end of a connection.
    fn port_armed(&mut self, _id: NodeId, _role: PortRole) {}

    /// The pending port selection was cleared.
    fn port_cleared(&mut self) {}

    /// Transient user notification (template loaded, test started, ...).
    fn notify(&mut self, _level: NoticeLevel, _message: &str) {}
}

/// A view that renders nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl EditorView for NullView {}
