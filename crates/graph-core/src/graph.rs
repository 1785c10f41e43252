//! The strategy graph: node and connection collections.

use std::fmt;

use tracing::debug;

use crate::catalog::NodeKind;
use crate::geometry::ConnectionPath;
use crate::node::{Node, NodeId};

/// A directed edge from one node's output port to another node's input port.
///
/// Identity is the ordered `(from, to)` pair; the graph never holds two
/// connections with the same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub from: NodeId,
    pub to: NodeId,
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}-{}", self.from, self.to)
    }
}

/// The aggregate of all nodes and connections in one editor session.
///
/// Node ids are allocated strictly increasing and are not reused while the
/// canvas lives; `clear` starts a fresh canvas and resets the counter.
/// Connections are dangling-free: deleting a node removes every edge that
/// touches it.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    next_id: u64,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id and append a node of `kind` at `(x, y)`.
    pub fn add_node(&mut self, kind: NodeKind, x: f64, y: f64) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.push(Node::new(id, kind, x, y));
        debug!(node = %id, kind = %kind, x, y, "node added");
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id() == id)
    }

    /// Move a node to an absolute position. No-op for unknown ids.
    pub fn move_node(&mut self, id: NodeId, x: f64, y: f64) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.x = x;
                node.y = y;
                true
            }
            None => false,
        }
    }

    /// Remove a node and every connection touching it.
    ///
    /// Returns `false` (and changes nothing) for unknown ids.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(index) = self.nodes.iter().position(|node| node.id() == id) else {
            return false;
        };

        self.nodes.remove(index);
        self.connections
            .retain(|conn| conn.from != id && conn.to != id);
        debug!(node = %id, "node removed");
        true
    }

    /// Add a directed connection.
    ///
    /// Idempotent for an existing `(from, to)` pair; rejects self-loops and
    /// pairs with a missing endpoint. Returns whether an edge was added.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> bool {
        if from == to {
            return false;
        }
        if self.node(from).is_none() || self.node(to).is_none() {
            return false;
        }
        if self
            .connections
            .iter()
            .any(|conn| conn.from == from && conn.to == to)
        {
            return false;
        }

        let conn = Connection { from, to };
        debug!(connection = %conn, "connection added");
        self.connections.push(conn);
        true
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop everything and reset the id counter.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.connections.clear();
        self.next_id = 0;
    }

    /// Recompute the curve for every connection from current node positions.
    ///
    /// Edges whose endpoints vanished are skipped; `remove_node` keeps that
    /// from happening, so a skip here means an internal bug upstream.
    pub fn connection_paths(&self) -> Vec<ConnectionPath> {
        self.connections
            .iter()
            .filter_map(|conn| {
                let from = self.node(conn.from)?;
                let to = self.node(conn.to)?;
                Some(ConnectionPath::between(from, to))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_ids_unique_and_increasing() {
        let mut graph = Graph::new();

        let mut previous = 0;
        for kind in [NodeKind::PriceFeed, NodeKind::Rsi, NodeKind::Macd, NodeKind::BuyAction] {
            let id = graph.add_node(kind, 0.0, 0.0);
            assert!(id.value() > previous, "ids must strictly increase");
            previous = id.value();
        }

        // Deleting does not free ids for reuse
        let id = graph.add_node(NodeKind::SellAction, 0.0, 0.0);
        graph.remove_node(id);
        let next = graph.add_node(NodeKind::SellAction, 0.0, 0.0);
        assert!(next.value() > id.value());
    }

    #[test]
    fn test_connect_is_idempotent() {
        let mut graph = Graph::new();
        let a = graph.add_node(NodeKind::PriceFeed, 0.0, 0.0);
        let b = graph.add_node(NodeKind::Rsi, 200.0, 0.0);

        assert!(graph.connect(a, b));
        assert!(!graph.connect(a, b));
        assert_eq!(graph.connection_count(), 1);

        // The reverse direction is a distinct edge
        assert!(graph.connect(b, a));
        assert_eq!(graph.connection_count(), 2);
    }

    #[test]
    fn test_connect_rejects_self_loop_and_missing_endpoints() {
        let mut graph = Graph::new();
        let a = graph.add_node(NodeKind::PriceFeed, 0.0, 0.0);
        let b = graph.add_node(NodeKind::Rsi, 0.0, 0.0);
        graph.remove_node(b);

        assert!(!graph.connect(a, a));
        assert!(!graph.connect(a, b));
        assert!(!graph.connect(b, a));
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn test_remove_node_cascades_connections() {
        let mut graph = Graph::new();
        let a = graph.add_node(NodeKind::PriceFeed, 0.0, 0.0);
        let b = graph.add_node(NodeKind::Rsi, 0.0, 0.0);
        let c = graph.add_node(NodeKind::IfCondition, 0.0, 0.0);
        graph.connect(a, b);
        graph.connect(b, c);
        graph.connect(a, c);

        assert!(graph.remove_node(b));

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.connection_count(), 1);
        assert!(graph
            .connections()
            .iter()
            .all(|conn| conn.from != b && conn.to != b));
    }

    #[test]
    fn test_clear_resets_id_counter() {
        let mut graph = Graph::new();
        graph.add_node(NodeKind::PriceFeed, 0.0, 0.0);
        graph.add_node(NodeKind::Rsi, 0.0, 0.0);

        graph.clear();
        assert!(graph.is_empty());
        assert_eq!(graph.connection_count(), 0);

        let id = graph.add_node(NodeKind::PriceFeed, 0.0, 0.0);
        assert_eq!(id.value(), 1);
    }

    #[test]
    fn test_fan_out_and_fan_in_are_unbounded() {
        let mut graph = Graph::new();
        let source = graph.add_node(NodeKind::PriceFeed, 0.0, 0.0);
        let buy = graph.add_node(NodeKind::BuyAction, 0.0, 0.0);
        let sell = graph.add_node(NodeKind::SellAction, 0.0, 0.0);
        let gate = graph.add_node(NodeKind::LogicalAnd, 0.0, 0.0);

        assert!(graph.connect(source, buy));
        assert!(graph.connect(source, sell));
        assert!(graph.connect(buy, gate));
        assert!(graph.connect(sell, gate));
        assert_eq!(graph.connection_count(), 4);
    }

    #[test]
    fn test_connection_display() {
        let conn = Connection { from: NodeId(3), to: NodeId(5) };
        assert_eq!(conn.to_string(), "conn-node-3-node-5");
    }
}
