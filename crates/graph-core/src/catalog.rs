//! Static node-type catalog for the strategy builder.
//!
//! Every node kind maps to a fixed descriptor: display metadata for the
//! palette plus an ordered list of typed, defaulted properties. The
//! catalog is the single source of truth for what a node of a given kind
//! may store.

use std::fmt;
use std::str::FromStr;

/// Node type in the strategy graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    PriceFeed,
    VolumeIndicator,
    MarketTrend,
    Rsi,
    Macd,
    BollingerBands,
    Stochastic,
    IfCondition,
    Comparison,
    LogicalAnd,
    BuyAction,
    SellAction,
    StopLoss,
    TakeProfit,
}

impl NodeKind {
    /// Every kind, in palette order.
    pub const ALL: [NodeKind; 14] = [
        NodeKind::PriceFeed,
        NodeKind::VolumeIndicator,
        NodeKind::MarketTrend,
        NodeKind::Rsi,
        NodeKind::Macd,
        NodeKind::BollingerBands,
        NodeKind::Stochastic,
        NodeKind::IfCondition,
        NodeKind::Comparison,
        NodeKind::LogicalAnd,
        NodeKind::BuyAction,
        NodeKind::SellAction,
        NodeKind::StopLoss,
        NodeKind::TakeProfit,
    ];

    /// The palette type tag, e.g. `price-feed`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PriceFeed => "price-feed",
            Self::VolumeIndicator => "volume-indicator",
            Self::MarketTrend => "market-trend",
            Self::Rsi => "rsi",
            Self::Macd => "macd",
            Self::BollingerBands => "bollinger-bands",
            Self::Stochastic => "stochastic",
            Self::IfCondition => "if-condition",
            Self::Comparison => "comparison",
            Self::LogicalAnd => "logical-and",
            Self::BuyAction => "buy-action",
            Self::SellAction => "sell-action",
            Self::StopLoss => "stop-loss",
            Self::TakeProfit => "take-profit",
        }
    }

    /// Parse a palette tag, falling back to [`NodeKind::PriceFeed`] for
    /// anything unrecognized.
    pub fn parse_or_default(tag: &str) -> Self {
        tag.parse().unwrap_or(Self::PriceFeed)
    }

    /// The static descriptor for this kind.
    pub fn descriptor(&self) -> &'static NodeDescriptor {
        descriptor(*self)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = UnknownNodeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownNodeKind(s.to_string()))
    }
}

/// Error parsing a node type tag.
#[derive(Debug, Clone)]
pub struct UnknownNodeKind(pub String);

impl fmt::Display for UnknownNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown node kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownNodeKind {}

/// One option of a [`PropertyKind::Choice`] property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Declared type (and default) of a node property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyKind {
    Number { default: f64 },
    Flag { default: bool },
    Choice { options: &'static [ChoiceOption], default: &'static str },
    Text { default: &'static str },
}

/// A single typed property slot of a node kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyDef {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: PropertyKind,
}

/// Static configuration of a node kind: palette metadata and property schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeDescriptor {
    pub label: &'static str,
    pub description: &'static str,
    /// Palette icon token (display metadata, opaque to this crate).
    pub icon: &'static str,
    /// Palette accent-color token (display metadata, opaque to this crate).
    pub accent: &'static str,
    pub properties: &'static [PropertyDef],
}

impl NodeDescriptor {
    /// Look up a property definition by name.
    pub fn property(&self, name: &str) -> Option<&'static PropertyDef> {
        self.properties.iter().find(|def| def.name == name)
    }
}

const DURATION_OPTIONS: &[ChoiceOption] = &[
    ChoiceOption { value: "1m", label: "1 minute" },
    ChoiceOption { value: "5m", label: "5 minutes" },
    ChoiceOption { value: "15m", label: "15 minutes" },
    ChoiceOption { value: "1h", label: "1 hour" },
];

fn descriptor(kind: NodeKind) -> &'static NodeDescriptor {
    match kind {
        NodeKind::PriceFeed => &NodeDescriptor {
            label: "Price Feed",
            description: "Gets current market price",
            icon: "fas fa-chart-line",
            accent: "text-blue-600",
            properties: &[
                PropertyDef {
                    name: "market",
                    label: "Market",
                    kind: PropertyKind::Choice {
                        options: &[
                            ChoiceOption { value: "volatility-100", label: "Volatility 100" },
                            ChoiceOption { value: "crash-1000", label: "Crash 1000" },
                            ChoiceOption { value: "boom-1000", label: "Boom 1000" },
                            ChoiceOption { value: "eur-usd", label: "EUR/USD" },
                        ],
                        default: "volatility-100",
                    },
                },
                PropertyDef {
                    name: "interval",
                    label: "Update Interval (ms)",
                    kind: PropertyKind::Number { default: 1000.0 },
                },
            ],
        },
        NodeKind::VolumeIndicator => &NodeDescriptor {
            label: "Volume Indicator",
            description: "Analyzes trading volume",
            icon: "fas fa-chart-bar",
            accent: "text-green-600",
            properties: &[
                PropertyDef {
                    name: "period",
                    label: "Period",
                    kind: PropertyKind::Number { default: 14.0 },
                },
                PropertyDef {
                    name: "threshold",
                    label: "Volume Threshold",
                    kind: PropertyKind::Number { default: 1000.0 },
                },
            ],
        },
        NodeKind::MarketTrend => &NodeDescriptor {
            label: "Market Trend",
            description: "Detects market direction",
            icon: "fas fa-trending-up",
            accent: "text-purple-600",
            properties: &[
                PropertyDef {
                    name: "period",
                    label: "Period",
                    kind: PropertyKind::Number { default: 20.0 },
                },
                PropertyDef {
                    name: "method",
                    label: "Method",
                    kind: PropertyKind::Choice {
                        options: &[
                            ChoiceOption { value: "sma", label: "Simple Moving Average" },
                            ChoiceOption { value: "ema", label: "Exponential Moving Average" },
                        ],
                        default: "sma",
                    },
                },
            ],
        },
        NodeKind::Rsi => &NodeDescriptor {
            label: "RSI",
            description: "Relative Strength Index",
            icon: "fas fa-wave-square",
            accent: "text-yellow-600",
            properties: &[
                PropertyDef {
                    name: "period",
                    label: "Period",
                    kind: PropertyKind::Number { default: 14.0 },
                },
                PropertyDef {
                    name: "overbought",
                    label: "Overbought Level",
                    kind: PropertyKind::Number { default: 70.0 },
                },
                PropertyDef {
                    name: "oversold",
                    label: "Oversold Level",
                    kind: PropertyKind::Number { default: 30.0 },
                },
            ],
        },
        NodeKind::Macd => &NodeDescriptor {
            label: "MACD",
            description: "Moving Average Convergence Divergence",
            icon: "fas fa-wave-square",
            accent: "text-red-600",
            properties: &[
                PropertyDef {
                    name: "fast",
                    label: "Fast Period",
                    kind: PropertyKind::Number { default: 12.0 },
                },
                PropertyDef {
                    name: "slow",
                    label: "Slow Period",
                    kind: PropertyKind::Number { default: 26.0 },
                },
                PropertyDef {
                    name: "signal",
                    label: "Signal Period",
                    kind: PropertyKind::Number { default: 9.0 },
                },
            ],
        },
        NodeKind::BollingerBands => &NodeDescriptor {
            label: "Bollinger Bands",
            description: "Volatility-based indicator",
            icon: "fas fa-wave-square",
            accent: "text-indigo-600",
            properties: &[
                PropertyDef {
                    name: "period",
                    label: "Period",
                    kind: PropertyKind::Number { default: 20.0 },
                },
                PropertyDef {
                    name: "stddev",
                    label: "Standard Deviations",
                    kind: PropertyKind::Number { default: 2.0 },
                },
            ],
        },
        NodeKind::Stochastic => &NodeDescriptor {
            label: "Stochastic",
            description: "Stochastic oscillator",
            icon: "fas fa-wave-square",
            accent: "text-pink-600",
            properties: &[
                PropertyDef {
                    name: "k-period",
                    label: "K Period",
                    kind: PropertyKind::Number { default: 14.0 },
                },
                PropertyDef {
                    name: "d-period",
                    label: "D Period",
                    kind: PropertyKind::Number { default: 3.0 },
                },
                PropertyDef {
                    name: "smooth",
                    label: "Smooth",
                    kind: PropertyKind::Number { default: 3.0 },
                },
            ],
        },
        NodeKind::IfCondition => &NodeDescriptor {
            label: "If Condition",
            description: "Conditional logic gate",
            icon: "fas fa-code-branch",
            accent: "text-gray-600",
            properties: &[PropertyDef {
                name: "condition",
                label: "Condition",
                kind: PropertyKind::Choice {
                    options: &[
                        ChoiceOption { value: "greater-than", label: "Greater Than" },
                        ChoiceOption { value: "less-than", label: "Less Than" },
                        ChoiceOption { value: "equals", label: "Equals" },
                        ChoiceOption { value: "crosses-above", label: "Crosses Above" },
                        ChoiceOption { value: "crosses-below", label: "Crosses Below" },
                    ],
                    default: "greater-than",
                },
            }],
        },
        NodeKind::Comparison => &NodeDescriptor {
            label: "Comparison",
            description: "Compare two values",
            icon: "fas fa-equals",
            accent: "text-orange-600",
            properties: &[PropertyDef {
                name: "operator",
                label: "Operator",
                kind: PropertyKind::Choice {
                    options: &[
                        ChoiceOption { value: "greater-than", label: ">" },
                        ChoiceOption { value: "less-than", label: "<" },
                        ChoiceOption { value: "equals", label: "=" },
                        ChoiceOption { value: "not-equals", label: "!=" },
                    ],
                    default: "greater-than",
                },
            }],
        },
        NodeKind::LogicalAnd => &NodeDescriptor {
            label: "AND Gate",
            description: "Logical AND operation",
            icon: "fas fa-and",
            accent: "text-teal-600",
            properties: &[PropertyDef {
                name: "inputs",
                label: "Number of Inputs",
                kind: PropertyKind::Number { default: 2.0 },
            }],
        },
        NodeKind::BuyAction => &NodeDescriptor {
            label: "Buy Action",
            description: "Execute buy order",
            icon: "fas fa-arrow-up",
            accent: "text-green-600",
            properties: &[
                PropertyDef {
                    name: "amount",
                    label: "Amount ($)",
                    kind: PropertyKind::Number { default: 100.0 },
                },
                PropertyDef {
                    name: "duration",
                    label: "Duration",
                    kind: PropertyKind::Choice { options: DURATION_OPTIONS, default: "5m" },
                },
            ],
        },
        NodeKind::SellAction => &NodeDescriptor {
            label: "Sell Action",
            description: "Execute sell order",
            icon: "fas fa-arrow-down",
            accent: "text-red-600",
            properties: &[
                PropertyDef {
                    name: "amount",
                    label: "Amount ($)",
                    kind: PropertyKind::Number { default: 100.0 },
                },
                PropertyDef {
                    name: "duration",
                    label: "Duration",
                    kind: PropertyKind::Choice { options: DURATION_OPTIONS, default: "5m" },
                },
            ],
        },
        NodeKind::StopLoss => &NodeDescriptor {
            label: "Stop Loss",
            description: "Risk management order",
            icon: "fas fa-shield-alt",
            accent: "text-blue-600",
            properties: &[
                PropertyDef {
                    name: "percentage",
                    label: "Stop Loss %",
                    kind: PropertyKind::Number { default: 2.0 },
                },
                PropertyDef {
                    name: "trailing",
                    label: "Trailing Stop",
                    kind: PropertyKind::Flag { default: false },
                },
            ],
        },
        NodeKind::TakeProfit => &NodeDescriptor {
            label: "Take Profit",
            description: "Profit target order",
            icon: "fas fa-target",
            accent: "text-purple-600",
            properties: &[
                PropertyDef {
                    name: "percentage",
                    label: "Take Profit %",
                    kind: PropertyKind::Number { default: 5.0 },
                },
                PropertyDef {
                    name: "multiple-targets",
                    label: "Multiple Targets",
                    kind: PropertyKind::Flag { default: false },
                },
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(kind.as_str().parse::<NodeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_tag_falls_back_to_price_feed() {
        assert_eq!(NodeKind::parse_or_default("not-a-node"), NodeKind::PriceFeed);
        assert_eq!(NodeKind::parse_or_default("rsi"), NodeKind::Rsi);
    }

    #[test]
    fn test_every_kind_has_a_descriptor() {
        for kind in NodeKind::ALL {
            let descriptor = kind.descriptor();
            assert!(!descriptor.label.is_empty());
            assert!(!descriptor.description.is_empty());
        }
    }

    #[test]
    fn test_rsi_schema() {
        let descriptor = NodeKind::Rsi.descriptor();
        assert_eq!(descriptor.label, "RSI");
        assert_eq!(descriptor.properties.len(), 3);

        let overbought = descriptor.property("overbought").unwrap();
        assert_eq!(overbought.kind, PropertyKind::Number { default: 70.0 });
        assert!(descriptor.property("nonexistent").is_none());
    }

    #[test]
    fn test_choice_defaults_are_listed_options() {
        for kind in NodeKind::ALL {
            for def in kind.descriptor().properties {
                if let PropertyKind::Choice { options, default } = def.kind {
                    assert!(
                        options.iter().any(|opt| opt.value == default),
                        "{}.{} default '{}' not among options",
                        kind,
                        def.name,
                        default
                    );
                }
            }
        }
    }
}
