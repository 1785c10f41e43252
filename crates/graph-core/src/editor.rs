//! The editor session: selection, dragging, the two-click connection
//! protocol, templates, and property edits.
//!
//! Every operation is best-effort: unknown ids and out-of-range indices
//! are silently ignored, matching how a canvas tolerates stale events.

use std::fmt;

use tracing::debug;

use crate::catalog::NodeKind;
use crate::geometry::Point;
use crate::graph::Graph;
use crate::node::{Node, NodeId};
use crate::templates::TEMPLATES;
use crate::view::{EditorView, NoticeLevel, NullView};

/// Connection role of a port on a node.
///
/// Each node exposes exactly one input and one output port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortRole {
    Input,
    Output,
}

impl fmt::Display for PortRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// State of the two-click connection protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSelection {
    /// No pending port.
    Idle,
    /// One port is armed; the next valid opposite-role click commits.
    Armed { node: NodeId, role: PortRole },
}

/// State of the node-drag interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Dragging {
        node: NodeId,
        /// Pointer position at drag start.
        start: Point,
        /// Node position at drag start.
        origin: Point,
    },
}

/// A strategy-builder editing session over one canvas.
pub struct Editor<V: EditorView = NullView> {
    graph: Graph,
    selected: Option<NodeId>,
    armed: PortSelection,
    drag: DragState,
    view: V,
}

impl Default for Editor<NullView> {
    fn default() -> Self {
        Self::new(NullView)
    }
}

impl<V: EditorView> Editor<V> {
    /// Create an empty session pushing visual updates into `view`.
    pub fn new(view: V) -> Self {
        Self {
            graph: Graph::new(),
            selected: None,
            armed: PortSelection::Idle,
            drag: DragState::Idle,
            view,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn selected_node(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn armed_port(&self) -> PortSelection {
        self.armed
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Create a node from a palette type tag at `(x, y)`.
    ///
    /// Unknown tags fall back to the price-feed node.
    pub fn create_node(&mut self, type_tag: &str, x: f64, y: f64) -> NodeId {
        self.create_node_of(NodeKind::parse_or_default(type_tag), x, y)
    }

    /// Create a node of a known kind at `(x, y)`.
    pub fn create_node_of(&mut self, kind: NodeKind, x: f64, y: f64) -> NodeId {
        let id = self.graph.add_node(kind, x, y);
        if let Some(node) = self.graph.node(id) {
            self.view.node_mounted(node);
        }
        self.redraw_connections();
        id
    }

    /// Select a node, replacing any previous selection and populating the
    /// property panel. Unknown ids are ignored.
    pub fn select_node(&mut self, id: NodeId) {
        if self.graph.node(id).is_none() {
            return;
        }

        self.deselect_all();
        self.selected = Some(id);
        self.view.selection_changed(Some(id));
        if let Some(node) = self.graph.node(id) {
            self.view.properties_shown(node);
        }
    }

    /// Clear the selection and reset the property panel. Idempotent.
    pub fn deselect_all(&mut self) {
        if self.selected.take().is_some() {
            self.view.selection_changed(None);
        }
        self.view.properties_cleared();
    }

    /// Store a raw property value on a node, coerced to the declared type.
    ///
    /// Unknown nodes, unknown property names, and out-of-schema choice
    /// values are silently ignored.
    pub fn update_node_property(&mut self, id: NodeId, name: &str, raw: &str) {
        let Some(node) = self.graph.node_mut(id) else {
            return;
        };
        if node.set_property(name, raw) {
            debug!(node = %id, property = name, value = raw, "property updated");
        }
    }

    /// Delete a node, cascade-delete its connections, and close the
    /// property panel if it was showing this node.
    pub fn delete_node(&mut self, id: NodeId) {
        if !self.graph.remove_node(id) {
            return;
        }

        self.view.node_unmounted(id);
        self.redraw_connections();

        if self.selected == Some(id) {
            self.selected = None;
            self.view.selection_changed(None);
            self.view.properties_cleared();
        }
        // A pending port on the deleted node can no longer commit
        if let PortSelection::Armed { node, .. } = self.armed {
            if node == id {
                self.clear_armed_port();
            }
        }
        if let DragState::Dragging { node, .. } = self.drag {
            if node == id {
                self.drag = DragState::Idle;
            }
        }
    }

    /// One click of the two-click connection protocol.
    ///
    /// The first click arms a port. A second click on the opposite role of
    /// a *different* node commits a connection (output side is always the
    /// source); any other second click clears the pending port without
    /// connecting.
    pub fn handle_port_click(&mut self, id: NodeId, role: PortRole) {
        if self.graph.node(id).is_none() {
            return;
        }

        match self.armed {
            PortSelection::Idle => {
                self.armed = PortSelection::Armed { node: id, role };
                self.view.port_armed(id, role);
            }
            PortSelection::Armed { node, role: armed_role } => {
                if node != id && armed_role != role {
                    let (from, to) = if armed_role == PortRole::Output {
                        (node, id)
                    } else {
                        (id, node)
                    };
                    self.create_connection(from, to);
                }
                self.clear_armed_port();
            }
        }
    }

    /// Add a connection directly (idempotent; both endpoints must exist).
    pub fn create_connection(&mut self, from: NodeId, to: NodeId) {
        if self.graph.connect(from, to) {
            self.redraw_connections();
        }
    }

    /// Create an independent copy of a node, offset down-right.
    pub fn duplicate_node(&mut self, id: NodeId) -> Option<NodeId> {
        let node = self.graph.node(id)?;
        let (kind, x, y) = (node.kind(), node.x, node.y);
        Some(self.create_node_of(kind, x + 50.0, y + 50.0))
    }

    /// Replace the canvas with a predefined template and auto-connect its
    /// nodes in sequence. Out-of-range indices are ignored.
    pub fn load_template(&mut self, index: usize) {
        let Some(template) = TEMPLATES.get(index) else {
            return;
        };

        self.clear_canvas();

        let ids: Vec<NodeId> = template
            .nodes
            .iter()
            .map(|&(kind, x, y)| self.create_node_of(kind, x, y))
            .collect();

        for pair in ids.windows(2) {
            self.create_connection(pair[0], pair[1]);
        }

        debug!(template = template.name, nodes = ids.len(), "template loaded");
        self.view.notify(
            NoticeLevel::Success,
            &format!("{} strategy template loaded!", template.name),
        );
    }

    /// Remove every node and connection and reset interaction state.
    pub fn clear_canvas(&mut self) {
        let ids: Vec<NodeId> = self.graph.nodes().map(Node::id).collect();
        for id in ids {
            self.view.node_unmounted(id);
        }

        self.graph.clear();
        self.selected = None;
        self.armed = PortSelection::Idle;
        self.drag = DragState::Idle;
        self.view.properties_cleared();
        self.redraw_connections();
    }

    /// Begin dragging a node from a pointer-down at `pointer`.
    ///
    /// Ignored while another drag is active or for unknown ids; port
    /// clicks must not reach this (they arm connections instead).
    pub fn begin_drag(&mut self, id: NodeId, pointer: Point) {
        if self.is_dragging() {
            return;
        }
        let Some(node) = self.graph.node(id) else {
            return;
        };

        self.drag = DragState::Dragging {
            node: id,
            start: pointer,
            origin: Point { x: node.x, y: node.y },
        };
    }

    /// Track pointer movement: reposition the dragged node by the pointer
    /// delta and redraw the connection layer.
    pub fn drag_to(&mut self, pointer: Point) {
        let DragState::Dragging { node, start, origin } = self.drag else {
            return;
        };

        let x = origin.x + (pointer.x - start.x);
        let y = origin.y + (pointer.y - start.y);
        if self.graph.move_node(node, x, y) {
            self.view.node_moved(node, x, y);
            self.redraw_connections();
        }
    }

    /// Finish the active drag (pointer-up anywhere).
    pub fn end_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    fn clear_armed_port(&mut self) {
        self.armed = PortSelection::Idle;
        self.view.port_cleared();
    }

    fn redraw_connections(&mut self) {
        let paths = self.graph.connection_paths();
        self.view.connections_redrawn(&paths);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ConnectionPath;
    use crate::node::PropertyValue;

    /// Records every view callback for assertions.
    #[derive(Debug, Default)]
    struct RecordingView {
        mounted: Vec<NodeId>,
        unmounted: Vec<NodeId>,
        redraws: Vec<usize>,
        properties_shown: Vec<NodeId>,
        properties_cleared: u32,
        notices: Vec<String>,
        armed: Vec<(NodeId, PortRole)>,
        cleared_ports: u32,
    }

    impl EditorView for RecordingView {
        fn node_mounted(&mut self, node: &Node) {
            self.mounted.push(node.id());
        }

        fn node_unmounted(&mut self, id: NodeId) {
            self.unmounted.push(id);
        }

        fn connections_redrawn(&mut self, paths: &[ConnectionPath]) {
            self.redraws.push(paths.len());
        }

        fn properties_shown(&mut self, node: &Node) {
            self.properties_shown.push(node.id());
        }

        fn properties_cleared(&mut self) {
            self.properties_cleared += 1;
        }

        fn port_armed(&mut self, id: NodeId, role: PortRole) {
            self.armed.push((id, role));
        }

        fn port_cleared(&mut self) {
            self.cleared_ports += 1;
        }

        fn notify(&mut self, _level: NoticeLevel, message: &str) {
            self.notices.push(message.to_string());
        }
    }

    fn editor() -> Editor<RecordingView> {
        Editor::new(RecordingView::default())
    }

    #[test]
    fn test_create_node_with_unknown_tag_falls_back() {
        let mut editor = editor();
        let id = editor.create_node("definitely-not-a-node", 10.0, 20.0);

        let node = editor.graph().node(id).unwrap();
        assert_eq!(node.kind(), NodeKind::PriceFeed);
        assert_eq!(editor.view().mounted, vec![id]);
    }

    #[test]
    fn test_selection_is_exclusive() {
        let mut editor = editor();
        let a = editor.create_node("rsi", 0.0, 0.0);
        let b = editor.create_node("macd", 0.0, 0.0);

        editor.select_node(a);
        assert_eq!(editor.selected_node(), Some(a));

        editor.select_node(b);
        assert_eq!(editor.selected_node(), Some(b));
        assert_eq!(editor.view().properties_shown, vec![a, b]);

        editor.deselect_all();
        assert_eq!(editor.selected_node(), None);
    }

    #[test]
    fn test_two_click_connect_commits_output_to_input() {
        let mut editor = editor();
        let a = editor.create_node("price-feed", 0.0, 0.0);
        let b = editor.create_node("rsi", 200.0, 0.0);

        // Armed input first; output second -> connection runs output->input
        editor.handle_port_click(b, PortRole::Input);
        assert_eq!(
            editor.armed_port(),
            PortSelection::Armed { node: b, role: PortRole::Input }
        );

        editor.handle_port_click(a, PortRole::Output);
        assert_eq!(editor.armed_port(), PortSelection::Idle);
        assert_eq!(editor.graph().connections(), &[crate::Connection { from: a, to: b }]);
    }

    #[test]
    fn test_two_click_connect_rejects_same_node() {
        let mut editor = editor();
        let a = editor.create_node("price-feed", 0.0, 0.0);

        editor.handle_port_click(a, PortRole::Output);
        editor.handle_port_click(a, PortRole::Input);

        assert_eq!(editor.armed_port(), PortSelection::Idle);
        assert_eq!(editor.graph().connection_count(), 0);
        assert_eq!(editor.view().cleared_ports, 1);
    }

    #[test]
    fn test_two_click_connect_rejects_same_role() {
        let mut editor = editor();
        let a = editor.create_node("price-feed", 0.0, 0.0);
        let b = editor.create_node("rsi", 0.0, 0.0);

        editor.handle_port_click(a, PortRole::Output);
        editor.handle_port_click(b, PortRole::Output);

        assert_eq!(editor.armed_port(), PortSelection::Idle);
        assert_eq!(editor.graph().connection_count(), 0);
    }

    #[test]
    fn test_delete_node_closes_panel_and_cascades() {
        let mut editor = editor();
        let a = editor.create_node("price-feed", 0.0, 0.0);
        let b = editor.create_node("rsi", 0.0, 0.0);
        editor.create_connection(a, b);
        editor.select_node(b);

        editor.delete_node(b);

        assert_eq!(editor.graph().node_count(), 1);
        assert_eq!(editor.graph().connection_count(), 0);
        assert_eq!(editor.selected_node(), None);
        assert!(editor.view().properties_cleared >= 1);
        assert_eq!(editor.view().unmounted, vec![b]);
    }

    #[test]
    fn test_delete_node_clears_pending_port_on_it() {
        let mut editor = editor();
        let a = editor.create_node("price-feed", 0.0, 0.0);

        editor.handle_port_click(a, PortRole::Output);
        editor.delete_node(a);

        assert_eq!(editor.armed_port(), PortSelection::Idle);
    }

    #[test]
    fn test_update_property_coerces_number() {
        let mut editor = editor();
        let id = editor.create_node("rsi", 0.0, 0.0);

        editor.update_node_property(id, "period", "abc");
        let node = editor.graph().node(id).unwrap();
        assert_eq!(node.property("period"), Some(&PropertyValue::Number(0.0)));
    }

    #[test]
    fn test_duplicate_node_is_independent() {
        let mut editor = editor();
        let original = editor.create_node("rsi", 100.0, 100.0);
        editor.update_node_property(original, "period", "21");

        let copy = editor.duplicate_node(original).unwrap();

        let copy_node = editor.graph().node(copy).unwrap();
        assert_eq!(copy_node.kind(), NodeKind::Rsi);
        assert_eq!(copy_node.position(), (150.0, 150.0));
        // Fresh defaults, no shared property state
        assert_eq!(copy_node.property("period"), Some(&PropertyValue::Number(14.0)));

        editor.update_node_property(copy, "period", "7");
        assert_eq!(
            editor.graph().node(original).unwrap().property("period"),
            Some(&PropertyValue::Number(21.0))
        );
    }

    #[test]
    fn test_load_template_zero_builds_rsi_chain() {
        let mut editor = editor();
        editor.load_template(0);

        let graph = editor.graph();
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.connection_count(), 4);

        let kinds: Vec<NodeKind> = graph.nodes().map(Node::kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::PriceFeed,
                NodeKind::Rsi,
                NodeKind::IfCondition,
                NodeKind::BuyAction,
                NodeKind::SellAction,
            ]
        );

        // Wired in sequence
        let ids: Vec<NodeId> = graph.nodes().map(Node::id).collect();
        for (i, conn) in graph.connections().iter().enumerate() {
            assert_eq!(conn.from, ids[i]);
            assert_eq!(conn.to, ids[i + 1]);
        }

        assert_eq!(editor.view().notices, vec!["RSI strategy template loaded!"]);
    }

    #[test]
    fn test_load_template_replaces_existing_graph() {
        let mut editor = editor();
        editor.create_node("stochastic", 0.0, 0.0);
        editor.load_template(1);

        assert_eq!(editor.graph().node_count(), 5);
        assert!(editor
            .graph()
            .nodes()
            .any(|node| node.kind() == NodeKind::Macd));

        // Out-of-range index is a no-op
        editor.load_template(99);
        assert_eq!(editor.graph().node_count(), 5);
    }

    #[test]
    fn test_clear_canvas_resets_everything() {
        let mut editor = editor();
        let a = editor.create_node("price-feed", 0.0, 0.0);
        let b = editor.create_node("rsi", 0.0, 0.0);
        editor.create_connection(a, b);
        editor.select_node(a);
        editor.clear_canvas();

        assert!(editor.graph().is_empty());
        assert_eq!(editor.selected_node(), None);
        assert_eq!(editor.armed_port(), PortSelection::Idle);
        // Final redraw is of an empty layer
        assert_eq!(editor.view().redraws.last(), Some(&0));
    }

    #[test]
    fn test_drag_moves_node_and_redraws() {
        let mut editor = editor();
        let a = editor.create_node("price-feed", 100.0, 100.0);
        let b = editor.create_node("rsi", 400.0, 100.0);
        editor.create_connection(a, b);

        editor.begin_drag(a, Point { x: 110.0, y: 110.0 });
        assert!(editor.is_dragging());

        editor.drag_to(Point { x: 140.0, y: 90.0 });
        let node = editor.graph().node(a).unwrap();
        assert_eq!(node.position(), (130.0, 80.0));

        // Each movement redraws the connection layer
        let redraws_after_move = editor.view().redraws.len();
        editor.drag_to(Point { x: 150.0, y: 90.0 });
        assert_eq!(editor.view().redraws.len(), redraws_after_move + 1);

        editor.end_drag();
        assert!(!editor.is_dragging());

        // Movement after release is ignored
        editor.drag_to(Point { x: 500.0, y: 500.0 });
        assert_eq!(editor.graph().node(a).unwrap().position(), (140.0, 80.0));
    }

    #[test]
    fn test_only_one_drag_at_a_time() {
        let mut editor = editor();
        let a = editor.create_node("price-feed", 0.0, 0.0);
        let b = editor.create_node("rsi", 200.0, 200.0);

        editor.begin_drag(a, Point { x: 0.0, y: 0.0 });
        editor.begin_drag(b, Point { x: 200.0, y: 200.0 });

        editor.drag_to(Point { x: 10.0, y: 10.0 });
        assert_eq!(editor.graph().node(a).unwrap().position(), (10.0, 10.0));
        assert_eq!(editor.graph().node(b).unwrap().position(), (200.0, 200.0));
    }
}
