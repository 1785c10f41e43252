//! Nodes and their typed property storage.

use std::collections::HashMap;
use std::fmt;

use crate::catalog::{NodeKind, PropertyDef, PropertyKind};

/// Unique node identifier, allocated monotonically by the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    /// Raw counter value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// A stored property value, already coerced to its declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Number(f64),
    Flag(bool),
    Choice(String),
    Text(String),
}

impl PropertyValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Choice(s) | Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl PropertyDef {
    /// The default value declared for this property.
    pub fn default_value(&self) -> PropertyValue {
        match self.kind {
            PropertyKind::Number { default } => PropertyValue::Number(default),
            PropertyKind::Flag { default } => PropertyValue::Flag(default),
            PropertyKind::Choice { default, .. } => PropertyValue::Choice(default.to_string()),
            PropertyKind::Text { default } => PropertyValue::Text(default.to_string()),
        }
    }

    /// Coerce a raw input string to this property's declared type.
    ///
    /// Numbers parse with fallback to 0; flags accept the usual truthy
    /// spellings; choice values must be a listed option or the write is
    /// rejected (`None`); text passes through.
    pub fn coerce(&self, raw: &str) -> Option<PropertyValue> {
        match self.kind {
            PropertyKind::Number { .. } => {
                Some(PropertyValue::Number(raw.trim().parse().unwrap_or(0.0)))
            }
            PropertyKind::Flag { .. } => {
                let truthy = matches!(
                    raw.trim().to_ascii_lowercase().as_str(),
                    "true" | "1" | "on" | "checked"
                );
                Some(PropertyValue::Flag(truthy))
            }
            PropertyKind::Choice { options, .. } => options
                .iter()
                .any(|opt| opt.value == raw)
                .then(|| PropertyValue::Choice(raw.to_string())),
            PropertyKind::Text { .. } => Some(PropertyValue::Text(raw.to_string())),
        }
    }
}

/// A typed, positioned unit of the strategy graph.
///
/// The kind is fixed at creation; properties are seeded from the kind's
/// descriptor defaults and only ever hold values coerced to the declared
/// types.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    pub x: f64,
    pub y: f64,
    properties: HashMap<String, PropertyValue>,
}

impl Node {
    pub(crate) fn new(id: NodeId, kind: NodeKind, x: f64, y: f64) -> Self {
        let properties = kind
            .descriptor()
            .properties
            .iter()
            .map(|def| (def.name.to_string(), def.default_value()))
            .collect();

        Self { id, kind, x, y, properties }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Current value of a property, or `None` for names outside the schema.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Store a raw value into a property after coercing it to the declared
    /// type. Unknown property names and rejected coercions are ignored.
    pub(crate) fn set_property(&mut self, name: &str, raw: &str) -> bool {
        let Some(def) = self.kind.descriptor().property(name) else {
            return false;
        };
        let Some(value) = def.coerce(raw) else {
            return false;
        };
        self.properties.insert(name.to_string(), value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_seeds_schema_defaults() {
        let node = Node::new(NodeId(1), NodeKind::Rsi, 10.0, 20.0);

        assert_eq!(node.property("period"), Some(&PropertyValue::Number(14.0)));
        assert_eq!(
            node.property("overbought"),
            Some(&PropertyValue::Number(70.0))
        );
        assert_eq!(node.property("oversold"), Some(&PropertyValue::Number(30.0)));
        assert!(node.property("market").is_none());
    }

    #[test]
    fn test_numeric_coercion_falls_back_to_zero() {
        let mut node = Node::new(NodeId(1), NodeKind::Rsi, 0.0, 0.0);

        assert!(node.set_property("period", "abc"));
        assert_eq!(node.property("period"), Some(&PropertyValue::Number(0.0)));

        assert!(node.set_property("period", " 21 "));
        assert_eq!(node.property("period"), Some(&PropertyValue::Number(21.0)));
    }

    #[test]
    fn test_flag_coercion() {
        let mut node = Node::new(NodeId(1), NodeKind::StopLoss, 0.0, 0.0);

        node.set_property("trailing", "true");
        assert_eq!(node.property("trailing"), Some(&PropertyValue::Flag(true)));

        node.set_property("trailing", "anything-else");
        assert_eq!(node.property("trailing"), Some(&PropertyValue::Flag(false)));

        node.set_property("trailing", "ON");
        assert_eq!(node.property("trailing"), Some(&PropertyValue::Flag(true)));
    }

    #[test]
    fn test_choice_rejects_unlisted_value() {
        let mut node = Node::new(NodeId(1), NodeKind::BuyAction, 0.0, 0.0);

        assert!(node.set_property("duration", "15m"));
        assert_eq!(
            node.property("duration").and_then(PropertyValue::as_str),
            Some("15m")
        );

        // Unlisted value: write ignored, previous value kept
        assert!(!node.set_property("duration", "3d"));
        assert_eq!(
            node.property("duration").and_then(PropertyValue::as_str),
            Some("15m")
        );
    }

    #[test]
    fn test_unknown_property_name_ignored() {
        let mut node = Node::new(NodeId(1), NodeKind::Rsi, 0.0, 0.0);
        assert!(!node.set_property("bogus", "1"));
        assert!(node.property("bogus").is_none());
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(7).to_string(), "node-7");
    }
}
