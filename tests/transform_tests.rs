//! Transform propagation tests
//!
//! Tests for:
//! - Relative queries on roots (identity composition)
//! - Absolute and relative mutations of position, rotation and scale
//! - Propagation through multi-level hierarchies
//! - Isolation of ancestors and siblings from descendant mutations
//! - World matrix construction
//! - Deep hierarchies (explicit-stack propagation)

use std::f32::consts::FRAC_PI_2;

use arbor::{Channel, NodeHandle, SceneGraph};
use glam::Vec3;

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

fn pos(graph: &SceneGraph, h: NodeHandle) -> Vec3 {
    graph.get_node(h).unwrap().position()
}

fn rot(graph: &SceneGraph, h: NodeHandle) -> Vec3 {
    graph.get_node(h).unwrap().rotation()
}

fn scl(graph: &SceneGraph, h: NodeHandle) -> Vec3 {
    graph.get_node(h).unwrap().scale()
}

/// A root with one child, the root registered in the root collection.
fn root_and_child() -> (SceneGraph, NodeHandle, NodeHandle) {
    let mut graph = SceneGraph::new();
    let root = graph.create_node();
    graph.game_objects().push(root);

    let child = graph.create_node();
    graph.add_child(root, child);
    (graph, root, child)
}

/// Checks `absolute == compose(relative, parent)` for every attached node.
fn assert_hierarchy_consistent(graph: &SceneGraph) {
    for (handle, node) in graph.iter_depth_first() {
        let parent = node.parent().and_then(|p| graph.get_node(p));
        let Some(parent) = parent else {
            assert_eq!(graph.position_rel(handle), Some(node.position()));
            continue;
        };
        let rel = graph.relative_transform(handle).unwrap();
        for channel in Channel::ALL {
            assert!(
                vec3_approx(
                    channel.compose(rel.get(channel), parent.transform().get(channel)),
                    node.transform().get(channel)
                ),
                "{channel:?} inconsistent on {}",
                node.name
            );
        }
    }
}

// ============================================================================
// Root Behaviour
// ============================================================================

#[test]
fn root_relative_equals_absolute() {
    let mut graph = SceneGraph::new();
    let root = graph.add_node();

    assert_eq!(graph.position_rel(root), Some(pos(&graph, root)));
    assert_eq!(graph.rotation_rel(root), Some(rot(&graph, root)));
    assert_eq!(graph.scale_rel(root), Some(scl(&graph, root)));

    graph.node(root).set_position(1.0, 2.0, 3.0).rotate(10.0, 0.0, 0.0).scale(2.0, 2.0, 2.0);

    assert_eq!(graph.position_rel(root), Some(Vec3::new(1.0, 2.0, 3.0)));
    assert_eq!(graph.rotation_rel(root), Some(Vec3::new(10.0, 0.0, 0.0)));
    assert_eq!(graph.scale_rel(root), Some(Vec3::splat(2.0)));
}

#[test]
fn root_translate() {
    let mut graph = SceneGraph::new();
    let root = graph.create_node();
    graph.game_objects().push(root);

    // both must be 0
    assert_eq!(graph.position_rel(root), Some(Vec3::ZERO));
    assert_eq!(pos(&graph, root), Vec3::ZERO);

    // relative set, then translate: relative and absolute agree
    graph.node(root).set_position_rel(10.0, 20.0, 30.0).translate(10.0, 10.0, 10.0);
    assert_eq!(pos(&graph, root), Vec3::new(20.0, 30.0, 40.0));
    assert_eq!(graph.position_rel(root), Some(pos(&graph, root)));

    // reset to 0
    graph.node(root).set_position(0.0, 0.0, 0.0);
    assert_eq!(graph.position_rel(root), Some(Vec3::ZERO));
}

#[test]
fn new_node_defaults() {
    let mut graph = SceneGraph::new();
    let h = graph.create_node();
    let node = graph.get_node(h).unwrap();
    assert_eq!(node.position(), Vec3::ZERO);
    assert_eq!(node.rotation(), Vec3::ZERO);
    assert_eq!(node.scale(), Vec3::ONE);
    assert_eq!(node.parent(), None);
    assert!(node.children().is_empty());
    assert_eq!(node.graph(), graph.id());
}

// ============================================================================
// Position
// ============================================================================

#[test]
fn parenting_translation() {
    let (mut graph, root, c0) = root_and_child();

    // translate parent, child must move too
    graph.node(root).set_position(10.0, 20.0, 30.0);
    assert_eq!(pos(&graph, c0), pos(&graph, root));

    // move child relative to parent
    graph.node(c0).translate(10.0, 10.0, 10.0).set_position_rel(5.0, 5.0, 5.0);
    assert_eq!(graph.position_rel(c0), Some(Vec3::splat(5.0)));
    assert_eq!(pos(&graph, c0), Vec3::new(15.0, 25.0, 35.0));

    // add child to child
    let c1 = graph.create_node();
    graph.add_child(c0, c1);
    graph.node(c1).set_position_rel(10.0, 10.0, 10.0);
    assert_eq!(pos(&graph, c1), Vec3::new(25.0, 35.0, 45.0));

    // move root, children must follow
    graph.node(root).set_position(0.0, 0.0, 0.0);
    assert_eq!(pos(&graph, c0), Vec3::splat(5.0));
    assert_eq!(pos(&graph, c1), Vec3::splat(15.0));
    assert_eq!(graph.position_rel(c0), Some(Vec3::splat(5.0)));
    assert_eq!(graph.position_rel(c1), Some(Vec3::splat(10.0)));

    // move inner c1, others stay untouched
    graph.node(c1).set_position_rel(-100.0, -100.0, -100.0);
    assert_eq!(pos(&graph, root), Vec3::ZERO);
    assert_eq!(pos(&graph, c0), Vec3::splat(5.0));
    assert_eq!(graph.position_rel(c0), Some(Vec3::splat(5.0)));
    assert_eq!(graph.position_rel(c1), Some(Vec3::splat(-100.0)));
    assert_eq!(pos(&graph, c1), Vec3::splat(-95.0));
}

#[test]
fn moving_parent_shifts_descendants_by_delta() {
    let mut graph = SceneGraph::new();
    let root = graph.build_node("root").with_position(1.0, 1.0, 1.0).build();
    let a = graph.build_node("a").with_position(2.0, 0.0, 0.0).with_parent(root).build();
    let b = graph.build_node("b").with_position(0.0, 3.0, 0.0).with_parent(root).build();
    let a1 = graph.build_node("a1").with_position(0.0, 0.0, 4.0).with_parent(a).build();

    let before: Vec<Vec3> = [a, b, a1].iter().map(|&h| pos(&graph, h)).collect();
    let rel_before: Vec<Vec3> = [a, b, a1].iter().map(|&h| graph.position_rel(h).unwrap()).collect();

    let delta = Vec3::new(-7.0, 12.0, 3.0);
    graph.translate(root, delta);

    for (i, &h) in [a, b, a1].iter().enumerate() {
        assert_eq!(pos(&graph, h), before[i] + delta);
        assert_eq!(graph.position_rel(h), Some(rel_before[i]));
    }
    assert_hierarchy_consistent(&graph);
}

#[test]
fn intermediate_move_changes_offset_to_grandparent_only() {
    let mut graph = SceneGraph::new();
    let root = graph.add_node();
    let mid = graph.add_to_parent(root);
    let leaf = graph.add_to_parent(mid);
    graph.set_position_rel(leaf, Vec3::new(1.0, 0.0, 0.0));

    graph.set_position_rel(mid, Vec3::new(0.0, 5.0, 0.0));

    // offset to immediate parent preserved
    assert_eq!(graph.position_rel(leaf), Some(Vec3::new(1.0, 0.0, 0.0)));
    // apparent offset to the root changed
    assert_eq!(pos(&graph, leaf) - pos(&graph, root), Vec3::new(1.0, 5.0, 0.0));
}

#[test]
fn sibling_mutation_is_isolated() {
    let mut graph = SceneGraph::new();
    let root = graph.add_node();
    let a = graph.add_to_parent(root);
    let b = graph.add_to_parent(root);
    let b1 = graph.add_to_parent(b);
    graph.node(root).set_position(1.0, 2.0, 3.0).rotate(5.0, 0.0, 0.0).scale(2.0, 2.0, 2.0);

    let snapshot: Vec<_> = [root, b, b1]
        .iter()
        .map(|&h| *graph.get_node(h).unwrap().transform())
        .collect();

    graph.node(a).set_position_rel(9.0, 9.0, 9.0).set_rotation_rel(1.0, 2.0, 3.0).set_scale_rel(3.0, 3.0, 3.0);

    for (i, &h) in [root, b, b1].iter().enumerate() {
        assert_eq!(*graph.get_node(h).unwrap().transform(), snapshot[i]);
    }
    assert_hierarchy_consistent(&graph);
}

// ============================================================================
// Scale
// ============================================================================

#[test]
fn scaling() {
    let (mut graph, root, child) = root_and_child();

    // initial relative & absolute scale
    assert_eq!(graph.scale_rel(child), Some(Vec3::ONE));
    assert_eq!(scl(&graph, child), Vec3::ONE);
    assert_eq!(graph.scale_rel(root), Some(Vec3::ONE));
    assert_eq!(scl(&graph, root), Vec3::ONE);

    // scale root
    graph.node(root).scale(2.0, 3.0, 4.0);
    assert_eq!(scl(&graph, root), Vec3::new(2.0, 3.0, 4.0));
    assert_eq!(graph.scale_rel(root), Some(Vec3::new(2.0, 3.0, 4.0)));
    assert_eq!(scl(&graph, child), Vec3::new(2.0, 3.0, 4.0));
    assert_eq!(graph.scale_rel(child), Some(Vec3::ONE));

    // scale child
    graph.node(child).scale(2.0, 2.0, 2.0);
    assert_eq!(scl(&graph, root), Vec3::new(2.0, 3.0, 4.0));
    assert_eq!(graph.scale_rel(root), Some(Vec3::new(2.0, 3.0, 4.0)));
    assert_eq!(scl(&graph, child), Vec3::new(4.0, 6.0, 8.0));
    assert_eq!(graph.scale_rel(child), Some(Vec3::splat(2.0)));

    // relative scale on root
    graph.node(root).set_scale_rel(4.0, 4.0, 4.0);
    assert_eq!(scl(&graph, root), Vec3::splat(4.0));
    assert_eq!(graph.scale_rel(root), Some(Vec3::splat(4.0)));
    assert_eq!(scl(&graph, child), Vec3::splat(8.0));
    assert_eq!(graph.scale_rel(child), Some(Vec3::splat(2.0)));
}

#[test]
fn scaling_parent_multiplies_descendants() {
    let mut graph = SceneGraph::new();
    let root = graph.add_node();
    let child = graph.add_to_parent(root);
    let grandchild = graph.add_to_parent(child);
    graph.set_scale_rel(child, Vec3::new(2.0, 1.0, 0.5));
    graph.set_scale_rel(grandchild, Vec3::new(4.0, 4.0, 4.0));

    let before = scl(&graph, grandchild);
    graph.scale(root, Vec3::new(2.0, 4.0, 8.0));

    assert_eq!(scl(&graph, grandchild), before * Vec3::new(2.0, 4.0, 8.0));
    assert_eq!(graph.scale_rel(child), Some(Vec3::new(2.0, 1.0, 0.5)));
    assert_eq!(graph.scale_rel(grandchild), Some(Vec3::splat(4.0)));
}

#[test]
fn scale_does_not_touch_position() {
    let (mut graph, root, child) = root_and_child();
    graph.set_position_rel(child, Vec3::new(1.0, 0.0, 0.0));
    graph.scale(root, Vec3::splat(10.0));

    // positions compose additively only; scale does not spread offsets
    assert_eq!(pos(&graph, child), Vec3::new(1.0, 0.0, 0.0));
}

// ============================================================================
// Rotation
// ============================================================================

#[test]
fn rotation() {
    let (mut graph, root, child) = root_and_child();

    // initial relative & absolute rotation
    assert_eq!(graph.rotation_rel(child), Some(Vec3::ZERO));
    assert_eq!(rot(&graph, child), Vec3::ZERO);
    assert_eq!(graph.rotation_rel(root), Some(Vec3::ZERO));
    assert_eq!(rot(&graph, root), Vec3::ZERO);

    // relative rotation on root
    graph.node(root).set_rotation_rel(5.0, 5.0, 5.0);
    assert_eq!(graph.rotation_rel(root), Some(Vec3::splat(5.0)));
    assert_eq!(rot(&graph, root), Vec3::splat(5.0));
    assert_eq!(rot(&graph, child), Vec3::splat(5.0));
    assert_eq!(graph.rotation_rel(child), Some(Vec3::ZERO));

    // rotate root
    graph.node(root).rotate(10.0, 20.0, 30.0);
    assert_eq!(graph.rotation_rel(root), Some(Vec3::new(15.0, 25.0, 35.0)));
    assert_eq!(rot(&graph, root), Vec3::new(15.0, 25.0, 35.0));
    assert_eq!(rot(&graph, child), Vec3::new(15.0, 25.0, 35.0));
    assert_eq!(graph.rotation_rel(child), Some(Vec3::ZERO));

    // relative rotation on child
    graph.node(child).set_rotation_rel(-10.0, -20.0, -30.0);
    assert_eq!(graph.rotation_rel(root), Some(Vec3::new(15.0, 25.0, 35.0)));
    assert_eq!(rot(&graph, root), Vec3::new(15.0, 25.0, 35.0));
    assert_eq!(rot(&graph, child), Vec3::splat(5.0));
    assert_eq!(graph.rotation_rel(child), Some(Vec3::new(-10.0, -20.0, -30.0)));
}

#[test]
fn rotation_has_no_wraparound() {
    let mut graph = SceneGraph::new();
    let root = graph.add_node();
    graph.node(root).rotate(300.0, 0.0, 0.0).rotate(300.0, 0.0, -400.0);
    assert_eq!(rot(&graph, root), Vec3::new(600.0, 0.0, -400.0));
}

#[test]
fn set_rotation_absolute_propagates() {
    let (mut graph, root, child) = root_and_child();
    graph.set_rotation_rel(child, Vec3::new(0.0, 45.0, 0.0));
    graph.set_rotation(root, Vec3::new(90.0, 0.0, 0.0));

    assert_eq!(rot(&graph, child), Vec3::new(90.0, 45.0, 0.0));
    assert_eq!(graph.rotation_rel(child), Some(Vec3::new(0.0, 45.0, 0.0)));
}

// ============================================================================
// Mixed sequences
// ============================================================================

#[test]
fn hierarchy_stays_consistent_across_operations() {
    let mut graph = SceneGraph::new();
    let root = graph.build_node("root").build();
    let a = graph.build_node("a").with_position(1.0, 0.0, 0.0).with_parent(root).build();
    let b = graph.build_node("b").with_scale(2.0, 2.0, 2.0).with_parent(a).build();
    let c = graph.build_node("c").with_rotation(0.0, 90.0, 0.0).with_parent(b).build();
    let d = graph.build_node("d").with_position(0.0, 0.0, 3.0).with_parent(root).build();

    graph.translate(root, Vec3::new(4.0, 0.0, 0.0));
    assert_hierarchy_consistent(&graph);
    graph.scale(a, Vec3::new(2.0, 2.0, 4.0));
    assert_hierarchy_consistent(&graph);
    graph.rotate(b, Vec3::new(0.0, 0.0, 45.0));
    assert_hierarchy_consistent(&graph);
    graph.set_position_rel(c, Vec3::new(8.0, 8.0, 8.0));
    assert_hierarchy_consistent(&graph);
    graph.set_scale(root, Vec3::splat(0.5));
    assert_hierarchy_consistent(&graph);
    graph.set_rotation_rel(d, Vec3::new(-90.0, 0.0, 0.0));
    assert_hierarchy_consistent(&graph);

    assert_eq!(scl(&graph, c), Vec3::new(2.0, 2.0, 4.0));
    assert_eq!(pos(&graph, c) - pos(&graph, b), Vec3::splat(8.0));
}

// ============================================================================
// World Matrix
// ============================================================================

#[test]
fn world_matrix_reflects_absolute_values() {
    let mut graph = SceneGraph::new();
    let h = graph.add_node();
    graph.node(h).set_position(5.0, 0.0, 0.0).set_rotation(0.0, 90.0, 0.0).set_scale(2.0, 2.0, 2.0);

    let m = graph.world_matrix(h).unwrap();
    let (scale, rotation, translation) = m.to_scale_rotation_translation();
    assert!(vec3_approx(translation, Vec3::new(5.0, 0.0, 0.0)));
    assert!(vec3_approx(scale, Vec3::splat(2.0)));
    assert!((rotation.angle_between(glam::Quat::from_rotation_y(FRAC_PI_2))).abs() < 1e-3);

    // +X maps to -Z after the Y rotation, scaled by 2, offset by 5
    let p = m.transform_point3(Vec3::X);
    assert!(vec3_approx(p, Vec3::new(5.0, 0.0, -2.0)), "got {p}");
}

// ============================================================================
// Edge Cases
// ============================================================================

#[test]
fn stale_handle_mutations_are_noops() {
    let mut graph = SceneGraph::new();
    let h = graph.add_node();
    graph.remove_node(h);

    graph.node(h).set_position(1.0, 1.0, 1.0).scale(2.0, 2.0, 2.0).set_rotation_rel(1.0, 0.0, 0.0);
    assert_eq!(graph.position_rel(h), None);
    assert_eq!(graph.world_matrix(h), None);
    assert!(graph.is_empty());
}

#[test]
fn deeply_nested_hierarchy_no_stack_overflow() {
    const DEPTH: usize = 5_000;

    let mut graph = SceneGraph::new();
    let root = graph.add_node();
    let mut leaf = root;
    for _ in 0..DEPTH {
        leaf = graph.add_to_parent(leaf);
        graph.set_position_rel(leaf, Vec3::X);
    }

    graph.set_position(root, Vec3::new(0.0, 7.0, 0.0));

    assert_eq!(pos(&graph, leaf), Vec3::new(DEPTH as f32, 7.0, 0.0));
    assert_eq!(graph.position_rel(leaf), Some(Vec3::X));
}
