//! Op-script driver: applies a JSON mutation script to a fresh session
//! and prints both trees, with a toy decorator labelling inserted
//! paragraphs.
//!
//! Usage: vellum-demo <script.json> [--root TAG]

use anyhow::{bail, Context};
use serde::Deserialize;
use std::cell::RefCell;
use std::rc::Rc;
use vellum_dom::{serialize_subtree, NodeData, NodeId, NodePath, NodeTemplate, Selector};
use vellum_listener::{EventArgs, EventCategory};
use vellum_workspace::EditorSession;

/// One entry of the script: ops name their targets by root-relative path
/// since arena ids are meaningless outside the process.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
enum ScriptOp {
    Insert {
        path: Vec<usize>,
        index: usize,
        node: NodeTemplate,
    },
    Delete {
        path: Vec<usize>,
    },
    SetText {
        path: Vec<usize>,
        value: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut script_path: Option<String> = None;
    let mut root_tag = "body".to_string();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--root" => {
                i += 1;
                root_tag = args
                    .get(i)
                    .context("--root requires a tag name")?
                    .clone();
            }
            arg if script_path.is_none() => script_path = Some(arg.to_string()),
            arg => bail!("unexpected argument: {arg}"),
        }
        i += 1;
    }
    let script_path = script_path.context("usage: vellum-demo <script.json> [--root TAG]")?;

    let source = std::fs::read_to_string(&script_path)
        .with_context(|| format!("reading {script_path}"))?;
    let ops: Vec<ScriptOp> = serde_json::from_str(&source).context("parsing script")?;

    let mut session = EditorSession::new(NodeData::element(root_tag));

    // Toy decorator: note every inserted paragraph, then attach a leading
    // label decoration to its mirror after dispatch.
    let pending: Rc<RefCell<Vec<NodeId>>> = Rc::new(RefCell::new(Vec::new()));
    let pending_in = pending.clone();
    session.listener_mut().add_handler(
        EventCategory::IncludedElement,
        Selector::tag("p"),
        move |_tree, ctx, args| {
            if let EventArgs::SubtreeElement { matched, .. } = args {
                pending_in.borrow_mut().push(*matched);
                ctx.trigger("decorated");
            }
            Ok(())
        },
    );
    session
        .listener_mut()
        .add_trigger_handler("decorated", |_tree, _ctx| {
            tracing::info!("decoration pass complete");
            Ok(())
        });
    session.listener_mut().start_listening();

    for op in &ops {
        match op {
            ScriptOp::Insert { path, index, node } => {
                let parent = session.node_at_path(&NodePath::new(path.clone()))?;
                session.insert_node_at(parent, *index, node)?;
            }
            ScriptOp::Delete { path } => {
                let node = session.node_at_path(&NodePath::new(path.clone()))?;
                session.delete_node(node)?;
            }
            ScriptOp::SetText { path, value } => {
                let node = session.node_at_path(&NodePath::new(path.clone()))?;
                session.set_text_node_value(node, value)?;
            }
        }
        for p in pending.borrow_mut().drain(..) {
            if let Some(vp) = session.mirror().view_of(p) {
                session.mirror_mut().insert_decoration(
                    vp,
                    0,
                    &NodeTemplate::element("label").with_attr("kind", "start"),
                )?;
            }
        }
    }
    session.run_deferred()?;

    println!("data tree:");
    print!("{}", serialize_subtree(session.data(), session.root()));
    println!();
    println!("view tree:");
    let view_root = session.view().root();
    print!("{}", serialize_subtree(session.view(), view_root));

    Ok(())
}
