//! Integration tests verifying that materialized constraints produce the
//! intended geometry once the reference host solves them, and that the
//! normalized forms match the worked examples.

use layout_reconcile::{
    declare, normalize, Attribute, AttributeRef, Edges, Equation, Expression, Frame, Priority,
    Reconciler, Relation, ViewId, ViewTree,
};
use pretty_assertions::assert_eq;

const TOLERANCE: f64 = 0.001;

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < TOLERANCE
}

fn root_frame() -> Frame {
    Frame::new(0.0, 0.0, 200.0, 100.0)
}

fn tree_with_child() -> (ViewTree, ViewId, ViewId) {
    let mut tree = ViewTree::new();
    let root = tree.insert("root");
    let child = tree.insert_child(root, "child");
    (tree, root, child)
}

#[test]
fn test_scaling_algebra_normal_form() {
    let (_, a, b) = tree_with_child();
    let constraints = normalize(&Equation::equal(
        Expression::width(a).scaled(4.0),
        Expression::width(b).offset(8.0),
    ))
    .unwrap();

    assert_eq!(constraints.len(), 1);
    let c = constraints[0];
    assert_eq!(c.subject, AttributeRef::new(a, Attribute::Width));
    assert_eq!(c.reference, Some(AttributeRef::new(b, Attribute::Width)));
    assert_eq!(c.multiplier, 0.25);
    assert_eq!(c.constant, 2.0);
}

#[test]
fn test_horizontal_inset_normal_form() {
    let (_, root, child) = tree_with_child();
    let constraints = normalize(&Equation::equal(
        Expression::bounds(child).edges(Edges::HORIZONTAL).inset_all(20.0),
        Expression::bounds(root),
    ))
    .unwrap();

    let summary: Vec<(Attribute, Relation, f64)> = constraints
        .iter()
        .map(|c| (c.subject.attribute, c.relation, c.constant))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Attribute::Leading, Relation::Equal, 20.0),
            (Attribute::Trailing, Relation::Equal, -20.0),
        ]
    );
}

#[test]
fn test_horizontal_inset_solves_inside_parent() {
    let (mut tree, root, child) = tree_with_child();
    declare(
        &mut tree,
        root,
        &[
            Equation::equal(
                Expression::bounds(child).edges(Edges::HORIZONTAL).inset_all(20.0),
                Expression::bounds(root),
            ),
            Equation::equal(Expression::top(child), Expression::top(root)),
            Equation::equal(Expression::height(child), 30.0),
        ],
    )
    .unwrap();

    let frames = tree.solve(root, root_frame()).unwrap();
    let frame = frames[&child];
    assert!(close(frame.x, 20.0), "x = {}", frame.x);
    assert!(close(frame.right(), 180.0), "right = {}", frame.right());
    assert!(close(frame.height, 30.0), "height = {}", frame.height);
}

#[test]
fn test_reconciled_constant_moves_view() {
    let (mut tree, root, child) = tree_with_child();
    let reconciler = Reconciler::default();
    let pass = |gap: f64| {
        vec![
            Equation::equal(Expression::top(child), Expression::top(root).offset(gap)),
            Equation::equal(Expression::leading(child), Expression::leading(root)),
            Equation::equal(Expression::width(child), Expression::width(root).scaled(0.5)),
            Equation::equal(Expression::height(child), 10.0),
        ]
    };

    reconciler.apply(&mut tree, root, &pass(5.0)).unwrap();
    let before = tree.solve(root, root_frame()).unwrap()[&child];
    assert!(close(before.y, 5.0));
    assert!(close(before.width, 100.0));

    reconciler.apply(&mut tree, root, &pass(40.0)).unwrap();
    let after = tree.solve(root, root_frame()).unwrap()[&child];
    assert!(close(after.y, 40.0));
    assert_eq!(tree.constraint_count(), 4);
}

#[test]
fn test_inequality_with_low_priority_preference() {
    let (mut tree, root, child) = tree_with_child();
    declare(
        &mut tree,
        root,
        &[
            // At least 10 inset on every edge
            Equation::greater_or_equal(
                Expression::bounds(child).inset_all(10.0),
                Expression::bounds(root),
            ),
            Equation::equal(Expression::width(child), 500.0).with_priority(Priority::DEFAULT_LOW),
            Equation::equal(Expression::leading(child), Expression::leading(root).offset(10.0)),
            Equation::equal(Expression::top(child), Expression::top(root).offset(10.0)),
        ],
    )
    .unwrap();

    let frame = tree.solve(root, root_frame()).unwrap()[&child];
    // The required trailing inset caps the preferred width
    assert!(close(frame.right(), 190.0), "right = {}", frame.right());
    assert!(frame.right() <= 190.0 + TOLERANCE);
}

#[test]
fn test_deactivated_constraint_no_longer_solves() {
    let (mut tree, root, child) = tree_with_child();
    let reconciler = Reconciler::default();
    let width = Equation::equal(Expression::width(child), 120.0);

    reconciler.apply(&mut tree, root, &[width]).unwrap();
    assert!(close(tree.solve(root, root_frame()).unwrap()[&child].width, 120.0));

    reconciler
        .apply(&mut tree, root, &[width.with_active(false)])
        .unwrap();
    assert!(close(tree.solve(root, root_frame()).unwrap()[&child].width, 0.0));
}
