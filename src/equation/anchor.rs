//! Attribute, relation and anchor-kind vocabulary shared by every layer

use std::fmt;

// ============================================================================
// Attribute and Relation
// ============================================================================

/// Scalar layout attributes understood by the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Left,
    Right,
    Top,
    Bottom,
    Leading,
    Trailing,
    Width,
    Height,
    CenterX,
    CenterY,
    FirstBaseline,
    LastBaseline,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attribute::Left => "left",
            Attribute::Right => "right",
            Attribute::Top => "top",
            Attribute::Bottom => "bottom",
            Attribute::Leading => "leading",
            Attribute::Trailing => "trailing",
            Attribute::Width => "width",
            Attribute::Height => "height",
            Attribute::CenterX => "center_x",
            Attribute::CenterY => "center_y",
            Attribute::FirstBaseline => "first_baseline",
            Attribute::LastBaseline => "last_baseline",
        };
        f.write_str(name)
    }
}

/// Relational operator joining the two sides of a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Equal,
    LessOrEqual,
    GreaterOrEqual,
}

impl Relation {
    /// The relation obtained by swapping both sides
    pub fn inverted(self) -> Self {
        match self {
            Relation::Equal => Relation::Equal,
            Relation::LessOrEqual => Relation::GreaterOrEqual,
            Relation::GreaterOrEqual => Relation::LessOrEqual,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Relation::Equal => "==",
            Relation::LessOrEqual => "<=",
            Relation::GreaterOrEqual => ">=",
        })
    }
}

// ============================================================================
// Priority
// ============================================================================

/// Constraint priority on the solver's 0..=1000 scale
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Priority(pub f32);

impl Priority {
    pub const REQUIRED: Priority = Priority(1000.0);
    pub const DEFAULT_HIGH: Priority = Priority(750.0);
    pub const DEFAULT_LOW: Priority = Priority(250.0);
    pub const FITTING_SIZE: Priority = Priority(50.0);

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn is_required(self) -> bool {
        self.0 >= Self::REQUIRED.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::REQUIRED
    }
}

impl From<f32> for Priority {
    fn from(value: f32) -> Self {
        Priority(value)
    }
}

// ============================================================================
// Typed scalar attributes
// ============================================================================

/// Attributes on the vertical axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalAttribute {
    Top,
    Bottom,
    CenterY,
    FirstBaseline,
    LastBaseline,
}

impl From<VerticalAttribute> for Attribute {
    fn from(attr: VerticalAttribute) -> Self {
        match attr {
            VerticalAttribute::Top => Attribute::Top,
            VerticalAttribute::Bottom => Attribute::Bottom,
            VerticalAttribute::CenterY => Attribute::CenterY,
            VerticalAttribute::FirstBaseline => Attribute::FirstBaseline,
            VerticalAttribute::LastBaseline => Attribute::LastBaseline,
        }
    }
}

/// Attributes on the horizontal axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalAttribute {
    Leading,
    Trailing,
    Left,
    Right,
    CenterX,
}

impl From<HorizontalAttribute> for Attribute {
    fn from(attr: HorizontalAttribute) -> Self {
        match attr {
            HorizontalAttribute::Leading => Attribute::Leading,
            HorizontalAttribute::Trailing => Attribute::Trailing,
            HorizontalAttribute::Left => Attribute::Left,
            HorizontalAttribute::Right => Attribute::Right,
            HorizontalAttribute::CenterX => Attribute::CenterX,
        }
    }
}

/// Size attributes; the only ones that may be scaled or compared to a constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionAttribute {
    Width,
    Height,
}

impl From<DimensionAttribute> for Attribute {
    fn from(attr: DimensionAttribute) -> Self {
        match attr {
            DimensionAttribute::Width => Attribute::Width,
            DimensionAttribute::Height => Attribute::Height,
        }
    }
}

// ============================================================================
// Edges
// ============================================================================

/// One of the four box edges a bounds anchor can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Leading,
    Bottom,
    Trailing,
}

impl Edge {
    /// Iteration order used when expanding bounds relationships
    pub const ORDER: [Edge; 4] = [Edge::Top, Edge::Leading, Edge::Bottom, Edge::Trailing];

    /// Near edges (top, leading) grow toward the far side of their axis
    pub fn is_near(self) -> bool {
        matches!(self, Edge::Top | Edge::Leading)
    }

    pub fn attribute(self) -> Attribute {
        match self {
            Edge::Top => Attribute::Top,
            Edge::Leading => Attribute::Leading,
            Edge::Bottom => Attribute::Bottom,
            Edge::Trailing => Attribute::Trailing,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Edge::Top => 1,
            Edge::Leading => 1 << 1,
            Edge::Bottom => 1 << 2,
            Edge::Trailing => 1 << 3,
        }
    }
}

/// A set of edges
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edges(u8);

impl Edges {
    pub const NONE: Edges = Edges(0);
    pub const TOP: Edges = Edges(1);
    pub const LEADING: Edges = Edges(1 << 1);
    pub const BOTTOM: Edges = Edges(1 << 2);
    pub const TRAILING: Edges = Edges(1 << 3);
    pub const HORIZONTAL: Edges = Edges(Self::LEADING.0 | Self::TRAILING.0);
    pub const VERTICAL: Edges = Edges(Self::TOP.0 | Self::BOTTOM.0);
    pub const ALL: Edges = Edges(Self::HORIZONTAL.0 | Self::VERTICAL.0);

    pub fn contains(self, edge: Edge) -> bool {
        self.0 & edge.bit() != 0
    }

    pub fn intersection(self, other: Edges) -> Edges {
        Edges(self.0 & other.0)
    }

    pub fn union(self, other: Edges) -> Edges {
        Edges(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Edges in the set, in `Edge::ORDER`
    pub fn iter(self) -> impl Iterator<Item = Edge> {
        Edge::ORDER.into_iter().filter(move |e| self.contains(*e))
    }
}

impl From<Edge> for Edges {
    fn from(edge: Edge) -> Self {
        Edges(edge.bit())
    }
}

impl fmt::Debug for Edges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Per-edge inward insets of a bounds expression
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets {
    pub top: f64,
    pub leading: f64,
    pub bottom: f64,
    pub trailing: f64,
}

impl EdgeInsets {
    pub fn new(top: f64, leading: f64, bottom: f64, trailing: f64) -> Self {
        Self {
            top,
            leading,
            bottom,
            trailing,
        }
    }

    /// The same inset on every edge
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn get(&self, edge: Edge) -> f64 {
        match edge {
            Edge::Top => self.top,
            Edge::Leading => self.leading,
            Edge::Bottom => self.bottom,
            Edge::Trailing => self.trailing,
        }
    }
}

impl std::ops::Add for EdgeInsets {
    type Output = EdgeInsets;

    fn add(self, rhs: EdgeInsets) -> EdgeInsets {
        EdgeInsets::new(
            self.top + rhs.top,
            self.leading + rhs.leading,
            self.bottom + rhs.bottom,
            self.trailing + rhs.trailing,
        )
    }
}

// ============================================================================
// AnchorKind
// ============================================================================

/// What an expression refers to on its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    Vertical(VerticalAttribute),
    Horizontal(HorizontalAttribute),
    Dimension(DimensionAttribute),
    Bounds(Edges),
}

impl AnchorKind {
    /// Short name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            AnchorKind::Vertical(_) => "vertical",
            AnchorKind::Horizontal(_) => "horizontal",
            AnchorKind::Dimension(_) => "dimension",
            AnchorKind::Bounds(_) => "bounds",
        }
    }

    /// The scalar attribute, if this is not a bounds anchor
    pub fn attribute(&self) -> Option<Attribute> {
        match *self {
            AnchorKind::Vertical(a) => Some(a.into()),
            AnchorKind::Horizontal(a) => Some(a.into()),
            AnchorKind::Dimension(a) => Some(a.into()),
            AnchorKind::Bounds(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_inverted() {
        assert_eq!(Relation::Equal.inverted(), Relation::Equal);
        assert_eq!(Relation::LessOrEqual.inverted(), Relation::GreaterOrEqual);
        assert_eq!(Relation::GreaterOrEqual.inverted(), Relation::LessOrEqual);
    }

    #[test]
    fn test_edges_iterate_in_fixed_order() {
        let edges: Vec<Edge> = Edges::ALL.iter().collect();
        assert_eq!(edges, Edge::ORDER.to_vec());

        let horizontal: Vec<Edge> = Edges::HORIZONTAL.iter().collect();
        assert_eq!(horizontal, vec![Edge::Leading, Edge::Trailing]);
    }

    #[test]
    fn test_edges_intersection() {
        assert_eq!(Edges::ALL.intersection(Edges::TOP), Edges::TOP);
        assert!(Edges::HORIZONTAL.intersection(Edges::VERTICAL).is_empty());
        assert_eq!(Edges::TOP.union(Edges::BOTTOM), Edges::VERTICAL);
    }

    #[test]
    fn test_default_priority_is_required() {
        assert!(Priority::default().is_required());
        assert!(!Priority::DEFAULT_HIGH.is_required());
    }
}
