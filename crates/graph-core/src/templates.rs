//! Predefined strategy templates.
//!
//! A template is a fixed node list at fixed positions; loading one clears
//! the canvas, instantiates the list and wires node i's output to node
//! i+1's input.

use crate::catalog::NodeKind;

/// A predefined strategy layout.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub name: &'static str,
    /// Nodes in creation (and auto-connect) order.
    pub nodes: &'static [(NodeKind, f64, f64)],
}

/// The built-in templates, in gallery order.
pub const TEMPLATES: &[Template] = &[
    Template {
        name: "RSI",
        nodes: &[
            (NodeKind::PriceFeed, 100.0, 100.0),
            (NodeKind::Rsi, 300.0, 100.0),
            (NodeKind::IfCondition, 500.0, 100.0),
            (NodeKind::BuyAction, 700.0, 50.0),
            (NodeKind::SellAction, 700.0, 150.0),
        ],
    },
    Template {
        name: "MACD",
        nodes: &[
            (NodeKind::PriceFeed, 100.0, 100.0),
            (NodeKind::Macd, 300.0, 100.0),
            (NodeKind::IfCondition, 500.0, 100.0),
            (NodeKind::BuyAction, 700.0, 50.0),
            (NodeKind::SellAction, 700.0, 150.0),
        ],
    },
    Template {
        name: "Bollinger Bands",
        nodes: &[
            (NodeKind::PriceFeed, 100.0, 100.0),
            (NodeKind::BollingerBands, 300.0, 100.0),
            (NodeKind::IfCondition, 500.0, 100.0),
            (NodeKind::BuyAction, 700.0, 50.0),
            (NodeKind::SellAction, 700.0, 150.0),
        ],
    },
];
