//! Structural selectors: tagged predicates evaluated against a node.
//!
//! Handlers register interest with a [`Selector`] instead of a query
//! string; matching needs only the node payload, never a host document
//! engine. `find_and_self` is the descendants-and-self variant used for
//! included/excluded-element dispatch, where one subtree insertion can
//! satisfy many nested selectors.

use crate::arena::{NodeId, Tree};
use crate::node::NodeData;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Selector {
    /// Any element node.
    AnyElement,

    /// Any text node.
    Text,

    /// Element with the given tag name.
    Tag(String),

    /// Element carrying the given marker.
    Marker(String),

    /// Element with the given attribute, optionally constrained to a value.
    Attr {
        name: String,
        value: Option<String>,
    },

    /// Every branch must match.
    All(Vec<Selector>),

    /// At least one branch must match.
    Any(Vec<Selector>),
}

impl Selector {
    pub fn tag(name: impl Into<String>) -> Self {
        Selector::Tag(name.into())
    }

    pub fn marker(name: impl Into<String>) -> Self {
        Selector::Marker(name.into())
    }

    pub fn attr(name: impl Into<String>) -> Self {
        Selector::Attr {
            name: name.into(),
            value: None,
        }
    }

    pub fn attr_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Selector::Attr {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Does `node` match this predicate?
    pub fn matches(&self, tree: &Tree, node: NodeId) -> bool {
        let Some(data) = tree.data(node) else {
            return false;
        };
        self.matches_data(data)
    }

    fn matches_data(&self, data: &NodeData) -> bool {
        match self {
            Selector::AnyElement => data.is_element(),
            Selector::Text => data.is_text(),
            Selector::Tag(name) => data.tag() == Some(name.as_str()),
            Selector::Marker(name) => match data {
                NodeData::Element { markers, .. } => markers.contains(name),
                NodeData::Text { .. } => false,
            },
            Selector::Attr { name, value } => match data {
                NodeData::Element { attributes, .. } => match attributes.get(name) {
                    Some(actual) => value.as_ref().map(|v| v == actual).unwrap_or(true),
                    None => false,
                },
                NodeData::Text { .. } => false,
            },
            Selector::All(branches) => branches.iter().all(|s| s.matches_data(data)),
            Selector::Any(branches) => branches.iter().any(|s| s.matches_data(data)),
        }
    }

    /// All nodes in `node`'s subtree (self included) matching this
    /// predicate, in document order.
    pub fn find_and_self(&self, tree: &Tree, node: NodeId) -> Vec<NodeId> {
        tree.descendants(node)
            .into_iter()
            .filter(|id| self.matches(tree, *id))
            .collect()
    }
}
