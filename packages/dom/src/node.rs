use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Payload of a tree node: an element or a text run.
///
/// Markers are class-like flags with no rendering semantics of their own;
/// selectors can match on them and decorators use them to tag the nodes
/// they manage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeData {
    Element {
        tag: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attributes: BTreeMap<String, String>,
        #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
        markers: BTreeSet<String>,
    },

    Text { value: String },
}

impl NodeData {
    pub fn element(tag: impl Into<String>) -> Self {
        NodeData::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            markers: BTreeSet::new(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        NodeData::Text {
            value: value.into(),
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, NodeData::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, NodeData::Text { .. })
    }

    /// Tag name, if this is an element.
    pub fn tag(&self) -> Option<&str> {
        match self {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text { .. } => None,
        }
    }

    /// Text content, if this is a text node.
    pub fn value(&self) -> Option<&str> {
        match self {
            NodeData::Text { value } => Some(value),
            NodeData::Element { .. } => None,
        }
    }
}

/// Owned description of a subtree, used as the payload of insert
/// operations. A whole subtree may arrive in one insertion, so templates
/// nest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeTemplate {
    Element {
        tag: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attributes: BTreeMap<String, String>,
        #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
        markers: BTreeSet<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<NodeTemplate>,
    },

    Text { value: String },
}

impl NodeTemplate {
    pub fn element(tag: impl Into<String>) -> Self {
        NodeTemplate::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            markers: BTreeSet::new(),
            children: Vec::new(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        NodeTemplate::Text {
            value: value.into(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let NodeTemplate::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(name.into(), value.into());
        }
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        if let NodeTemplate::Element {
            ref mut markers, ..
        } = self
        {
            markers.insert(marker.into());
        }
        self
    }

    pub fn with_child(mut self, child: NodeTemplate) -> Self {
        if let NodeTemplate::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    /// The node payload for the template root, without children.
    pub fn data(&self) -> NodeData {
        match self {
            NodeTemplate::Element {
                tag,
                attributes,
                markers,
                ..
            } => NodeData::Element {
                tag: tag.clone(),
                attributes: attributes.clone(),
                markers: markers.clone(),
            },
            NodeTemplate::Text { value } => NodeData::text(value.clone()),
        }
    }

    pub fn children(&self) -> &[NodeTemplate] {
        match self {
            NodeTemplate::Element { children, .. } => children,
            NodeTemplate::Text { .. } => &[],
        }
    }
}
