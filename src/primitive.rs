//! Canonical single-subject constraints and their reuse identity

use std::fmt;
use std::hash::Hash;

use crate::equation::{Attribute, Priority, Relation};

/// An attribute of a concrete item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeRef<I> {
    pub item: I,
    pub attribute: Attribute,
}

impl<I> AttributeRef<I> {
    pub fn new(item: I, attribute: Attribute) -> Self {
        Self { item, attribute }
    }
}

/// `subject relation multiplier * reference + constant`
///
/// An absent reference means the right side is the bare constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveConstraint<I> {
    pub subject: AttributeRef<I>,
    pub relation: Relation,
    pub reference: Option<AttributeRef<I>>,
    pub constant: f64,
    pub multiplier: f64,
    pub priority: Priority,
    pub active: bool,
}

impl<I: Copy + Eq + Hash> PrimitiveConstraint<I> {
    /// The fields the solver treats as immutable once the object exists
    pub fn identity(&self) -> ReuseIdentity<I> {
        ReuseIdentity {
            subject: self.subject,
            relation: self.relation,
            reference: self.reference,
            multiplier_bits: canonical_bits(self.multiplier),
        }
    }
}

impl<I: fmt::Debug> fmt::Display for PrimitiveConstraint<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}.{} {} ",
            self.subject.item, self.subject.attribute, self.relation
        )?;
        match &self.reference {
            Some(reference) if self.multiplier == 1.0 => {
                write!(f, "{:?}.{}", reference.item, reference.attribute)?
            }
            Some(reference) => write!(
                f,
                "{} * {:?}.{}",
                self.multiplier, reference.item, reference.attribute
            )?,
            None => return write!(f, "{}", self.constant),
        }
        if self.constant != 0.0 {
            write!(f, " + {}", self.constant)?;
        }
        Ok(())
    }
}

fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Structural key naming one solver constraint slot
///
/// Constant, priority and active flag are excluded: those are the only
/// fields that can be rewritten on a live constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReuseIdentity<I> {
    subject: AttributeRef<I>,
    relation: Relation,
    reference: Option<AttributeRef<I>>,
    multiplier_bits: u64,
}

impl<I: Copy> ReuseIdentity<I> {
    pub fn subject(&self) -> AttributeRef<I> {
        self.subject
    }

    pub fn reference(&self) -> Option<AttributeRef<I>> {
        self.reference
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn multiplier(&self) -> f64 {
        f64::from_bits(self.multiplier_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint(constant: f64, multiplier: f64) -> PrimitiveConstraint<u32> {
        PrimitiveConstraint {
            subject: AttributeRef::new(1, Attribute::Top),
            relation: Relation::Equal,
            reference: Some(AttributeRef::new(2, Attribute::Top)),
            constant,
            multiplier,
            priority: Priority::REQUIRED,
            active: true,
        }
    }

    #[test]
    fn test_identity_ignores_mutable_fields() {
        let a = constraint(0.0, 1.0);
        let b = PrimitiveConstraint {
            constant: 12.0,
            priority: Priority::DEFAULT_LOW,
            active: false,
            ..a
        };
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn test_identity_distinguishes_multiplier() {
        assert_ne!(
            constraint(0.0, 1.0).identity(),
            constraint(0.0, 0.5).identity()
        );
    }

    #[test]
    fn test_identity_canonicalizes_negative_zero() {
        assert_eq!(
            constraint(0.0, 0.0).identity(),
            constraint(0.0, -0.0).identity()
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(constraint(4.0, 1.0).to_string(), "1.top == 2.top + 4");
        assert_eq!(constraint(0.0, 0.25).to_string(), "1.top == 0.25 * 2.top");
    }
}
