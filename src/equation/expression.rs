//! Anchor expressions: `multiplier * owner.anchor + offset`

use super::anchor::{
    AnchorKind, DimensionAttribute, EdgeInsets, Edges, HorizontalAttribute, VerticalAttribute,
};

/// Immutable reference to a geometric property of an item
///
/// Every modifier returns a new expression. An expression without an owner
/// is a pure constant whose multiplier stays at 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expression<I> {
    owner: Option<I>,
    kind: AnchorKind,
    offset: f64,
    multiplier: f64,
    insets: EdgeInsets,
}

impl<I: Copy> Expression<I> {
    pub fn new(owner: I, kind: AnchorKind) -> Self {
        Self {
            owner: Some(owner),
            kind,
            offset: 0.0,
            multiplier: 1.0,
            insets: EdgeInsets::default(),
        }
    }

    /// An owner-less dimension expression holding `value`
    pub fn constant(value: f64, dimension: DimensionAttribute) -> Self {
        Self {
            owner: None,
            kind: AnchorKind::Dimension(dimension),
            offset: value,
            multiplier: 1.0,
            insets: EdgeInsets::default(),
        }
    }

    pub fn top(owner: I) -> Self {
        Self::new(owner, AnchorKind::Vertical(VerticalAttribute::Top))
    }

    pub fn bottom(owner: I) -> Self {
        Self::new(owner, AnchorKind::Vertical(VerticalAttribute::Bottom))
    }

    pub fn center_y(owner: I) -> Self {
        Self::new(owner, AnchorKind::Vertical(VerticalAttribute::CenterY))
    }

    pub fn leading(owner: I) -> Self {
        Self::new(owner, AnchorKind::Horizontal(HorizontalAttribute::Leading))
    }

    pub fn trailing(owner: I) -> Self {
        Self::new(owner, AnchorKind::Horizontal(HorizontalAttribute::Trailing))
    }

    pub fn center_x(owner: I) -> Self {
        Self::new(owner, AnchorKind::Horizontal(HorizontalAttribute::CenterX))
    }

    pub fn width(owner: I) -> Self {
        Self::new(owner, AnchorKind::Dimension(DimensionAttribute::Width))
    }

    pub fn height(owner: I) -> Self {
        Self::new(owner, AnchorKind::Dimension(DimensionAttribute::Height))
    }

    /// All four edges of the owner
    pub fn bounds(owner: I) -> Self {
        Self::new(owner, AnchorKind::Bounds(Edges::ALL))
    }

    pub fn owner(&self) -> Option<I> {
        self.owner
    }

    pub fn kind(&self) -> AnchorKind {
        self.kind
    }

    pub fn offset_value(&self) -> f64 {
        self.offset
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn insets(&self) -> EdgeInsets {
        self.insets
    }

    pub fn is_constant(&self) -> bool {
        self.owner.is_none()
    }

    /// Add `by` to the offset
    ///
    /// Bounds expressions position through `inset`; normalizing one with a
    /// non-zero offset fails.
    pub fn offset(self, by: f64) -> Self {
        Self {
            offset: self.offset + by,
            ..self
        }
    }

    /// Multiply the whole expression by `by`
    ///
    /// Constants are folded: the offset is scaled and the multiplier stays 1.
    pub fn scaled(self, by: f64) -> Self {
        let multiplier = if self.owner.is_some() {
            self.multiplier * by
        } else {
            1.0
        };
        Self {
            offset: self.offset * by,
            multiplier,
            ..self
        }
    }

    /// Add per-edge insets; only meaningful on bounds expressions
    pub fn inset(self, insets: EdgeInsets) -> Self {
        Self {
            insets: self.insets + insets,
            ..self
        }
    }

    /// Add the same inset to every edge
    pub fn inset_all(self, value: f64) -> Self {
        self.inset(EdgeInsets::uniform(value))
    }

    /// Restrict a bounds expression to `edges`; scalar expressions are unchanged
    pub fn edges(self, edges: Edges) -> Self {
        match self.kind {
            AnchorKind::Bounds(current) => Self {
                kind: AnchorKind::Bounds(current.intersection(edges)),
                ..self
            },
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_returns_new_value() {
        let base = Expression::top(1u32);
        let moved = base.offset(4.0);
        assert_eq!(base.offset_value(), 0.0);
        assert_eq!(moved.offset_value(), 4.0);
    }

    #[test]
    fn test_scaled_applies_to_offset_and_multiplier() {
        let expr = Expression::width(1u32).offset(2.0).scaled(3.0);
        assert_eq!(expr.multiplier(), 3.0);
        assert_eq!(expr.offset_value(), 6.0);
    }

    #[test]
    fn test_constant_keeps_unit_multiplier() {
        let expr = Expression::<u32>::constant(10.0, DimensionAttribute::Width).scaled(2.0);
        assert!(expr.is_constant());
        assert_eq!(expr.multiplier(), 1.0);
        assert_eq!(expr.offset_value(), 20.0);
    }

    #[test]
    fn test_edges_restricts_bounds() {
        let expr = Expression::bounds(1u32).edges(Edges::HORIZONTAL);
        assert_eq!(expr.kind(), AnchorKind::Bounds(Edges::HORIZONTAL));

        let scalar = Expression::top(1u32).edges(Edges::HORIZONTAL);
        assert_eq!(scalar.kind(), Expression::top(1u32).kind());
    }
}
