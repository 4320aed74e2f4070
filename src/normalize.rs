//! Equation normalization
//!
//! Collapses a declared relationship into the canonical primitive form
//! `subject relation multiplier * reference + constant`:
//!
//! ```text
//! ls * L + lo  (rel)  rs * R + ro
//!   =>  L  (rel')  (rs / ls) * R + (ro - lo) / ls
//! ```
//!
//! where `rel'` is `rel` inverted when `ls` is negative. Bounds relationships
//! expand to one primitive per edge present on both sides.

use std::hash::Hash;

use log::trace;

use crate::equation::{AnchorKind, Edges, Equation, Expression, Operand};
use crate::error::ContractViolation;
use crate::primitive::{AttributeRef, PrimitiveConstraint};

/// Normalize one relationship into zero or more primitive constraints
pub fn normalize<I>(equation: &Equation<I>) -> Result<Vec<PrimitiveConstraint<I>>, ContractViolation>
where
    I: Copy + Eq + Hash,
{
    let left = equation.left;
    let subject = left
        .owner()
        .ok_or_else(|| ContractViolation::unowned_subject(left.kind().name()))?;

    let right = match equation.right {
        Operand::Expression(expr) => expr,
        Operand::Constant(value) => match left.kind() {
            AnchorKind::Dimension(dimension) => Expression::constant(value, dimension),
            other => {
                return Err(ContractViolation::ConstantReference {
                    anchor: other.name(),
                })
            }
        },
    };

    // An owner-less right side is a constant whatever kind it was built as
    if right.is_constant() && !matches!(left.kind(), AnchorKind::Dimension(_)) {
        return Err(ContractViolation::ConstantReference {
            anchor: left.kind().name(),
        });
    }

    match (left.kind(), right.kind()) {
        (AnchorKind::Bounds(left_edges), AnchorKind::Bounds(right_edges)) => {
            expand_bounds(equation, subject, left_edges, &right, right_edges)
        }
        (AnchorKind::Vertical(_), AnchorKind::Vertical(_))
        | (AnchorKind::Horizontal(_), AnchorKind::Horizontal(_))
        | (AnchorKind::Dimension(_), AnchorKind::Dimension(_)) => {
            Ok(vec![normalize_scalar(equation, subject, &right)?])
        }
        (l, r) => Err(ContractViolation::mismatched(l.name(), r.name())),
    }
}

/// Normalize a whole declaration pass, stopping at the first violation
pub fn normalize_all<I>(
    equations: &[Equation<I>],
) -> Result<Vec<PrimitiveConstraint<I>>, ContractViolation>
where
    I: Copy + Eq + Hash,
{
    let mut out = Vec::with_capacity(equations.len());
    for equation in equations {
        out.extend(normalize(equation)?);
    }
    trace!(
        "normalized {} equations into {} primitives",
        equations.len(),
        out.len()
    );
    Ok(out)
}

fn normalize_scalar<I>(
    equation: &Equation<I>,
    subject: I,
    right: &Expression<I>,
) -> Result<PrimitiveConstraint<I>, ContractViolation>
where
    I: Copy + Eq + Hash,
{
    let left = &equation.left;
    check_scaling(left)?;
    check_scaling(right)?;

    let left_multiplier = left.multiplier();
    if left_multiplier == 0.0 {
        return Err(ContractViolation::ZeroMultiplier);
    }

    // Both sides are scalar kinds here
    let subject_attr = left
        .kind()
        .attribute()
        .ok_or_else(|| ContractViolation::mismatched(left.kind().name(), right.kind().name()))?;
    let reference = match (right.owner(), right.kind().attribute()) {
        (Some(item), Some(attribute)) => Some(AttributeRef::new(item, attribute)),
        _ => None,
    };

    let relation = if left_multiplier < 0.0 {
        equation.relation.inverted()
    } else {
        equation.relation
    };
    let constant = (right.offset_value() - left.offset_value()) / left_multiplier;
    // A constant right side has nothing to scale
    let multiplier = if reference.is_some() {
        right.multiplier() / left_multiplier
    } else {
        1.0
    };

    Ok(PrimitiveConstraint {
        subject: AttributeRef::new(subject, subject_attr),
        relation,
        reference,
        constant,
        multiplier,
        priority: equation.priority,
        active: equation.active,
    })
}

fn check_scaling<I: Copy>(expr: &Expression<I>) -> Result<(), ContractViolation> {
    let scalable = matches!(expr.kind(), AnchorKind::Dimension(_));
    if !scalable && expr.multiplier() != 1.0 {
        return Err(ContractViolation::ScaledPosition {
            anchor: expr.kind().name(),
            multiplier: expr.multiplier(),
        });
    }
    Ok(())
}

/// One primitive per shared edge. Insets on either side measure inward
/// distance between the paired edges, so far edges take the negated constant
/// and the inverted relation.
fn expand_bounds<I>(
    equation: &Equation<I>,
    subject: I,
    left_edges: Edges,
    right: &Expression<I>,
    right_edges: Edges,
) -> Result<Vec<PrimitiveConstraint<I>>, ContractViolation>
where
    I: Copy + Eq + Hash,
{
    let left = &equation.left;
    check_scaling(left)?;
    check_scaling(right)?;
    for expr in [left, right] {
        if expr.offset_value() != 0.0 {
            return Err(ContractViolation::OffsetBounds {
                offset: expr.offset_value(),
            });
        }
    }
    let reference = right.owner().ok_or(ContractViolation::ConstantReference {
        anchor: AnchorKind::Bounds(left_edges).name(),
    })?;

    let constraints = left_edges
        .intersection(right_edges)
        .iter()
        .map(|edge| {
            let inset = left.insets().get(edge) + right.insets().get(edge);
            let (constant, relation) = if edge.is_near() {
                (inset, equation.relation)
            } else {
                (-inset, equation.relation.inverted())
            };
            PrimitiveConstraint {
                subject: AttributeRef::new(subject, edge.attribute()),
                relation,
                reference: Some(AttributeRef::new(reference, edge.attribute())),
                constant,
                multiplier: 1.0,
                priority: equation.priority,
                active: equation.active,
            }
        })
        .collect();
    Ok(constraints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equation::{Attribute, DimensionAttribute, EdgeInsets, Priority, Relation};

    const A: u32 = 1;
    const B: u32 = 2;

    fn single(equation: Equation<u32>) -> PrimitiveConstraint<u32> {
        let mut out = normalize(&equation).unwrap();
        assert_eq!(out.len(), 1);
        out.remove(0)
    }

    #[test]
    fn test_plain_equality() {
        let c = single(Equation::equal(Expression::top(A), Expression::top(B)));
        assert_eq!(c.subject, AttributeRef::new(A, Attribute::Top));
        assert_eq!(c.reference, Some(AttributeRef::new(B, Attribute::Top)));
        assert_eq!(c.constant, 0.0);
        assert_eq!(c.multiplier, 1.0);
        assert_eq!(c.relation, Relation::Equal);
    }

    #[test]
    fn test_offset_on_both_sides() {
        // A.leading + 3 == B.trailing + 10  =>  A.leading == B.trailing + 7
        let c = single(Equation::equal(
            Expression::leading(A).offset(3.0),
            Expression::trailing(B).offset(10.0),
        ));
        assert_eq!(c.constant, 7.0);
        assert_eq!(c.reference, Some(AttributeRef::new(B, Attribute::Trailing)));
    }

    #[test]
    fn test_scaling_algebra() {
        // 4 * A.width == B.width + 8  =>  A.width == 0.25 * B.width + 2
        let c = single(Equation::equal(
            Expression::width(A).scaled(4.0),
            Expression::width(B).offset(8.0),
        ));
        assert_eq!(c.multiplier, 0.25);
        assert_eq!(c.constant, 2.0);
    }

    #[test]
    fn test_negative_subject_multiplier_flips_relation() {
        let c = single(Equation::less_or_equal(
            Expression::width(A).scaled(-1.0),
            Expression::width(B),
        ));
        assert_eq!(c.relation, Relation::GreaterOrEqual);
        assert_eq!(c.multiplier, -1.0);
    }

    #[test]
    fn test_constant_operand_promotes_to_dimension() {
        let c = single(Equation::equal(Expression::height(A), 44.0));
        assert_eq!(c.reference, None);
        assert_eq!(c.constant, 44.0);
        assert_eq!(c.multiplier, 1.0);
    }

    #[test]
    fn test_constant_expression_on_right() {
        let c = single(Equation::greater_or_equal(
            Expression::width(A).scaled(2.0),
            Expression::constant(100.0, DimensionAttribute::Width),
        ));
        assert_eq!(c.reference, None);
        assert_eq!(c.constant, 50.0);
        assert_eq!(c.multiplier, 1.0);
    }

    #[test]
    fn test_priority_and_active_carried() {
        let c = single(
            Equation::equal(Expression::top(A), Expression::top(B))
                .with_priority(Priority::DEFAULT_LOW)
                .with_active(false),
        );
        assert_eq!(c.priority, Priority::DEFAULT_LOW);
        assert!(!c.active);
    }

    #[test]
    fn test_constant_subject_is_rejected() {
        let eq = Equation::equal(
            Expression::<u32>::constant(10.0, DimensionAttribute::Width),
            Expression::width(B),
        );
        assert_eq!(
            normalize(&eq),
            Err(ContractViolation::UnownedSubject { anchor: "dimension" })
        );
    }

    #[test]
    fn test_constant_against_position_is_rejected() {
        let eq = Equation::equal(Expression::top(A), 10.0);
        assert_eq!(
            normalize(&eq),
            Err(ContractViolation::ConstantReference { anchor: "vertical" })
        );
    }

    #[test]
    fn test_constant_expression_against_position_is_rejected() {
        let eq = Equation::equal(
            Expression::top(A),
            Expression::constant(10.0, DimensionAttribute::Height),
        );
        assert_eq!(
            normalize(&eq),
            Err(ContractViolation::ConstantReference { anchor: "vertical" })
        );

        let eq = Equation::equal(
            Expression::bounds(A),
            Expression::constant(10.0, DimensionAttribute::Width),
        );
        assert_eq!(
            normalize(&eq),
            Err(ContractViolation::ConstantReference { anchor: "bounds" })
        );
    }

    #[test]
    fn test_mismatched_kinds_are_rejected() {
        let eq = Equation::equal(Expression::top(A), Expression::leading(B));
        assert_eq!(
            normalize(&eq),
            Err(ContractViolation::mismatched("vertical", "horizontal"))
        );

        let eq = Equation::equal(Expression::bounds(A), Expression::top(B));
        assert_eq!(
            normalize(&eq),
            Err(ContractViolation::mismatched("bounds", "vertical"))
        );
    }

    #[test]
    fn test_scaled_position_is_rejected() {
        let eq = Equation::equal(Expression::center_x(A).scaled(2.0), Expression::center_x(B));
        assert!(matches!(
            normalize(&eq),
            Err(ContractViolation::ScaledPosition { .. })
        ));
    }

    #[test]
    fn test_zero_multiplier_is_rejected() {
        let eq = Equation::equal(Expression::width(A).scaled(0.0), Expression::width(B));
        assert_eq!(normalize(&eq), Err(ContractViolation::ZeroMultiplier));
    }

    #[test]
    fn test_bounds_expand_to_four_edges() {
        let out = normalize(&Equation::equal(
            Expression::bounds(A).inset_all(8.0),
            Expression::bounds(B),
        ))
        .unwrap();
        let summary: Vec<(Attribute, f64)> =
            out.iter().map(|c| (c.subject.attribute, c.constant)).collect();
        assert_eq!(
            summary,
            vec![
                (Attribute::Top, 8.0),
                (Attribute::Leading, 8.0),
                (Attribute::Bottom, -8.0),
                (Attribute::Trailing, -8.0),
            ]
        );
    }

    #[test]
    fn test_bounds_far_edges_invert_relation() {
        let out = normalize(&Equation::less_or_equal(
            Expression::bounds(A).edges(Edges::VERTICAL),
            Expression::bounds(B).inset(EdgeInsets::new(2.0, 0.0, 3.0, 0.0)),
        ))
        .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].relation, Relation::LessOrEqual);
        assert_eq!(out[0].constant, 2.0);
        assert_eq!(out[1].relation, Relation::GreaterOrEqual);
        assert_eq!(out[1].constant, -3.0);
    }

    #[test]
    fn test_bounds_offset_is_rejected() {
        let eq = Equation::equal(Expression::bounds(A).offset(5.0), Expression::bounds(B));
        assert_eq!(normalize(&eq), Err(ContractViolation::OffsetBounds { offset: 5.0 }));

        let eq = Equation::equal(Expression::bounds(A), Expression::bounds(B).offset(-2.0));
        assert_eq!(normalize(&eq), Err(ContractViolation::OffsetBounds { offset: -2.0 }));
    }

    #[test]
    fn test_bounds_disjoint_edges_produce_nothing() {
        let out = normalize(&Equation::equal(
            Expression::bounds(A).edges(Edges::HORIZONTAL),
            Expression::bounds(B).edges(Edges::VERTICAL),
        ))
        .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_normalize_all_stops_at_first_violation() {
        let eqs = [
            Equation::equal(Expression::top(A), Expression::top(B)),
            Equation::equal(Expression::top(A), Expression::width(B)),
        ];
        assert_eq!(
            normalize_all(&eqs),
            Err(ContractViolation::mismatched("vertical", "dimension"))
        );
    }
}
