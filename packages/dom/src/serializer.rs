//! Debug serializer: renders a subtree as indented XML-ish text.
//!
//! Used by the demo binary and tests to eyeball tree shapes; not a
//! faithful document format.

use crate::arena::{NodeId, Tree};
use crate::node::NodeData;

pub fn serialize_subtree(tree: &Tree, node: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, node, 0, &mut out);
    out
}

fn write_node(tree: &Tree, node: NodeId, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match tree.data(node) {
        Some(NodeData::Element {
            tag,
            attributes,
            markers,
        }) => {
            out.push_str(&indent);
            out.push('<');
            out.push_str(tag);
            for (name, value) in attributes {
                out.push_str(&format!(" {}=\"{}\"", name, value));
            }
            if !markers.is_empty() {
                let joined: Vec<&str> = markers.iter().map(|m| m.as_str()).collect();
                out.push_str(&format!(" markers=\"{}\"", joined.join(" ")));
            }
            if tree.is_decoration(node) {
                out.push_str(" decoration");
            }
            let children = tree.children(node);
            if children.is_empty() {
                out.push_str("/>\n");
            } else {
                out.push_str(">\n");
                for child in children {
                    write_node(tree, *child, depth + 1, out);
                }
                out.push_str(&format!("{}</{}>\n", indent, tag));
            }
        }
        Some(NodeData::Text { value }) => {
            out.push_str(&format!("{}\"{}\"\n", indent, value));
        }
        None => {
            out.push_str(&format!("{}<!-- stale {} -->\n", indent, node));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeTemplate;

    #[test]
    fn test_serialize_nested() {
        let mut tree = Tree::with_root(NodeData::element("body"));
        let root = tree.root();
        let tpl = NodeTemplate::element("p")
            .with_attr("lang", "en")
            .with_child(NodeTemplate::text("hi"));
        let p = tree.build(&tpl);
        tree.attach(root, 0, p).unwrap();

        let text = serialize_subtree(&tree, root);
        assert_eq!(text, "<body>\n  <p lang=\"en\">\n    \"hi\"\n  </p>\n</body>\n");
    }
}
