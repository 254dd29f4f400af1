//! End-to-end tests driving the whole session: data tree, view mirror,
//! and dispatcher together.

use std::cell::RefCell;
use std::rc::Rc;
use vellum_dom::{NodeData, NodeTemplate, Selector};
use vellum_editor::TreeOp;
use vellum_listener::{EventArgs, EventCategory};
use vellum_mirror::ViewCaret;
use vellum_workspace::EditorSession;

fn session() -> EditorSession {
    EditorSession::new(NodeData::element("body"))
}

#[test]
fn test_insert_into_empty_linked_element() {
    let mut s = session();
    let root = s.root();
    let e = s.insert_node_at(root, 0, &NodeTemplate::element("e")).unwrap();
    let t = s.insert_node_at(e, 0, &NodeTemplate::text("x")).unwrap();

    let ve = s.mirror().view_of(e).unwrap();
    let vt = s.mirror().view_of(t).unwrap();
    assert_eq!(s.view().children(ve), &[vt]);
    assert_eq!(s.view().data(vt).unwrap().value(), Some("x"));
    assert_eq!(s.from_data_caret((e, 0)).unwrap(), ViewCaret::new(ve, 0));
}

#[test]
fn test_delete_sole_child_leaves_decorations() {
    let mut s = session();
    let root = s.root();
    let p = s.insert_node_at(root, 0, &NodeTemplate::element("p")).unwrap();
    let t = s.insert_node_at(p, 0, &NodeTemplate::text("x")).unwrap();

    let vp = s.mirror().view_of(p).unwrap();
    let lead = s
        .mirror_mut()
        .insert_decoration(vp, 0, &NodeTemplate::element("label"))
        .unwrap();
    let tail = s
        .mirror_mut()
        .insert_decoration(vp, 2, &NodeTemplate::element("end"))
        .unwrap();

    s.delete_node(t).unwrap();

    assert_eq!(s.data().child_count(p), 0);
    assert_eq!(s.view().children(vp), &[lead, tail]);
    assert_eq!(s.mirror().mirrored_child_count(vp), 0);
    assert_eq!(s.from_data_caret((p, 0)).unwrap(), ViewCaret::new(vp, 0));
}

#[test]
fn test_added_element_selector_fires_once_with_sibling_context() {
    let mut s = session();
    let root = s.root();
    let a = s.insert_node_at(root, 0, &NodeTemplate::element("a")).unwrap();
    let c = s.insert_node_at(root, 1, &NodeTemplate::element("c")).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_in = seen.clone();
    s.listener_mut().add_handler(
        EventCategory::AddedElement,
        Selector::tag("b"),
        move |_t, _c, args| {
            seen_in.borrow_mut().push(args.clone());
            Ok(())
        },
    );
    let never = Rc::new(RefCell::new(0));
    let never_in = never.clone();
    s.listener_mut().add_handler(
        EventCategory::AddedElement,
        Selector::tag("table"),
        move |_t, _c, _a| {
            *never_in.borrow_mut() += 1;
            Ok(())
        },
    );
    s.listener_mut().start_listening();

    let b = s.insert_node_at(root, 1, &NodeTemplate::element("b")).unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![EventArgs::Element {
            node: b,
            parent: root,
            prev: Some(a),
            next: Some(c),
        }]
    );
    assert_eq!(*never.borrow(), 0);
}

#[test]
fn test_two_insertions_one_coalesced_pass() {
    let mut s = session();
    let root = s.root();
    s.listener_mut().start_listening();

    s.apply_batch(&[
        TreeOp::InsertNodeAt {
            parent: root,
            index: 0,
            node: NodeTemplate::element("a"),
        },
        TreeOp::InsertNodeAt {
            parent: root,
            index: 1,
            node: NodeTemplate::element("b"),
        },
    ])
    .unwrap();

    assert!(s.listener().pass_pending());
    assert!(s.run_deferred().unwrap());
    assert_eq!(s.listener().passes_run(), 1);
    assert!(!s.run_deferred().unwrap(), "no second pass for the batch");
}

#[test]
fn test_set_text_mirrors_value_and_reports_old() {
    let mut s = session();
    let root = s.root();
    let p = s
        .insert_node_at(
            root,
            0,
            &NodeTemplate::element("p").with_child(NodeTemplate::text("old")),
        )
        .unwrap();
    let t = s.data().child_at(p, 0).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_in = seen.clone();
    s.listener_mut().add_handler(
        EventCategory::TextChanged,
        Selector::tag("p"),
        move |_tr, _c, args| {
            seen_in.borrow_mut().push(args.clone());
            Ok(())
        },
    );
    s.listener_mut().start_listening();

    s.set_text_node_value(t, "new").unwrap();

    let vt = s.mirror().view_of(t).unwrap();
    assert_eq!(s.view().data(vt).unwrap().value(), Some("new"));
    assert_eq!(
        *seen.borrow(),
        vec![EventArgs::TextChanged {
            node: t,
            old_value: "old".to_string(),
        }]
    );
}

#[test]
fn test_set_text_leaves_pass_pending() {
    let mut s = session();
    let root = s.root();
    let t = s.insert_node_at(root, 0, &NodeTemplate::text("old")).unwrap();
    s.listener_mut().start_listening();

    s.set_text_node_value(t, "new").unwrap();
    assert!(s.listener().pass_pending());
    assert!(s.run_deferred().unwrap());
    assert!(!s.listener().pass_pending());
}

#[test]
fn test_link_totality_after_mutation_sequence() {
    let mut s = session();
    let root = s.root();

    let tpl = NodeTemplate::element("ul")
        .with_child(NodeTemplate::element("li").with_child(NodeTemplate::text("a")))
        .with_child(NodeTemplate::element("li").with_child(NodeTemplate::text("b")));
    let ul = s.insert_node_at(root, 0, &tpl).unwrap();
    let li0 = s.data().child_at(ul, 0).unwrap();
    s.delete_node(li0).unwrap();
    s.insert_node_at(ul, 1, &NodeTemplate::element("li")).unwrap();

    // Every live data node has a live, payload-identical mirror.
    let data = s.data();
    for d in data.descendants(root) {
        let v = s.mirror().view_of(d).expect("linked");
        assert_eq!(s.mirror().data_of(v), Some(d));
        assert_eq!(data.data(d), s.view().data(v));
    }
}

#[test]
fn test_view_stays_superset_with_decorations() {
    let mut s = session();
    let root = s.root();
    let e = s.insert_node_at(root, 0, &NodeTemplate::element("e")).unwrap();

    let ve = s.mirror().view_of(e).unwrap();
    s.mirror_mut()
        .insert_decoration(ve, 0, &NodeTemplate::element("lead"))
        .unwrap();

    for i in 0..3 {
        s.insert_node_at(e, i, &NodeTemplate::element("c")).unwrap();
        assert!(s.view().child_count(ve) >= s.data().child_count(e));
        assert_eq!(s.mirror().mirrored_child_count(ve), s.data().child_count(e));
    }
    let c1 = s.data().child_at(e, 1).unwrap();
    s.delete_node(c1).unwrap();
    assert_eq!(s.mirror().mirrored_child_count(ve), 2);
    assert_eq!(s.view().child_count(ve), 3);
}

#[test]
fn test_events_dispatch_in_issue_order() {
    let mut s = session();
    let root = s.root();

    let order = Rc::new(RefCell::new(Vec::new()));
    let order_in = order.clone();
    s.listener_mut().add_handler(
        EventCategory::AddedElement,
        Selector::AnyElement,
        move |tree, _c, args| {
            if let EventArgs::Element { node, .. } = args {
                if let Some(tag) = tree.data(*node).and_then(|d| d.tag()) {
                    order_in.borrow_mut().push(tag.to_string());
                }
            }
            Ok(())
        },
    );
    s.listener_mut().start_listening();

    s.insert_node_at(root, 0, &NodeTemplate::element("a")).unwrap();
    s.insert_node_at(root, 1, &NodeTemplate::element("b")).unwrap();

    assert_eq!(*order.borrow(), vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_handler_enqueued_op_applies_within_turn() {
    // Placeholder pattern: inserting real content deletes the placeholder
    // sibling, from inside the handler, via an enqueued follow-up op.
    let mut s = session();
    let root = s.root();
    let p = s.insert_node_at(root, 0, &NodeTemplate::element("p")).unwrap();
    let placeholder = s
        .insert_node_at(p, 0, &NodeTemplate::element("placeholder"))
        .unwrap();

    s.listener_mut().add_handler(
        EventCategory::ChildrenChanged,
        Selector::tag("p"),
        move |tree, ctx, args| {
            if let EventArgs::ChildrenChanged { parent, added, .. } = args {
                if !added.is_empty() {
                    for child in tree.children(*parent) {
                        let is_placeholder = tree
                            .data(*child)
                            .and_then(|d| d.tag())
                            .map(|t| t == "placeholder")
                            .unwrap_or(false);
                        if is_placeholder {
                            ctx.enqueue(TreeOp::DeleteNode { node: *child });
                        }
                    }
                }
            }
            Ok(())
        },
    );
    s.listener_mut().start_listening();

    let t = s.insert_node_at(p, 1, &NodeTemplate::text("real")).unwrap();

    // Both trees settled before control returned.
    assert!(!s.data().contains(placeholder));
    assert_eq!(s.data().children(p), &[t]);
    let vp = s.mirror().view_of(p).unwrap();
    assert_eq!(s.view().children(vp), &[s.mirror().view_of(t).unwrap()]);
}

#[test]
fn test_trigger_ops_apply_on_deferred_pass() {
    let mut s = session();
    let root = s.root();

    s.listener_mut().add_handler(
        EventCategory::AddedElement,
        Selector::tag("p"),
        |_t, ctx, _a| {
            ctx.trigger("ensure-title");
            Ok(())
        },
    );
    s.listener_mut().add_trigger_handler("ensure-title", move |tree, ctx| {
        let root = tree.root();
        let has_title = tree.children(root).iter().any(|c| {
            tree.data(*c).and_then(|d| d.tag()) == Some("title")
        });
        if !has_title {
            ctx.enqueue(TreeOp::InsertNodeAt {
                parent: root,
                index: 0,
                node: NodeTemplate::element("title"),
            });
        }
        Ok(())
    });
    s.listener_mut().start_listening();

    s.insert_node_at(root, 0, &NodeTemplate::element("p")).unwrap();
    s.insert_node_at(root, 1, &NodeTemplate::element("p")).unwrap();
    assert_eq!(s.data().child_count(root), 2, "trigger work waits for idle");

    assert!(s.run_deferred().unwrap());
    assert_eq!(s.data().child_count(root), 3);
    assert_eq!(
        s.data()
            .data(s.data().child_at(root, 0).unwrap())
            .unwrap()
            .tag(),
        Some("title")
    );
    // The title insertion mirrored too.
    let vroot = s.mirror().view_of(root).unwrap();
    assert_eq!(s.mirror().mirrored_child_count(vroot), 3);
}

#[test]
fn test_stopped_listener_still_mirrors() {
    let mut s = session();
    let root = s.root();

    let count = Rc::new(RefCell::new(0));
    let count_in = count.clone();
    s.listener_mut().add_handler(
        EventCategory::AddedElement,
        Selector::AnyElement,
        move |_t, _c, _a| {
            *count_in.borrow_mut() += 1;
            Ok(())
        },
    );
    // Never started.
    let p = s.insert_node_at(root, 0, &NodeTemplate::element("p")).unwrap();

    assert_eq!(*count.borrow(), 0);
    assert!(s.mirror().view_of(p).is_some(), "mirroring is unconditional");
    assert!(!s.run_deferred().unwrap());
}

#[test]
fn test_process_immediately_flushes_pending_pass() {
    let mut s = session();
    let root = s.root();
    s.listener_mut().start_listening();

    s.insert_node_at(root, 0, &NodeTemplate::element("p")).unwrap();
    assert!(s.listener().pass_pending());
    s.process_immediately().unwrap();
    assert!(!s.listener().pass_pending());
    assert_eq!(s.listener().passes_run(), 1);
}

#[test]
fn test_json_script_drives_session() {
    let mut s = session();
    let root = s.root();
    // Scripts built against a live session address existing nodes by their
    // serialized ids.
    let root_json = serde_json::to_string(&root).unwrap();
    let json = format!(
        r#"[
            {{"InsertNodeAt": {{"parent": {root_json}, "index": 0,
              "node": {{"type": "Element", "tag": "p",
                        "children": [{{"type": "Text", "value": "hi"}}]}}}}}}
        ]"#
    );
    let ops: Vec<TreeOp> = serde_json::from_str(&json).unwrap();
    s.apply_batch(&ops).unwrap();

    let p = s.data().child_at(root, 0).unwrap();
    assert_eq!(s.data().data(p).unwrap().tag(), Some("p"));
    let vp = s.mirror().view_of(p).unwrap();
    assert_eq!(s.view().child_count(vp), 1);
}
