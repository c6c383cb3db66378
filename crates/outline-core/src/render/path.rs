//! A minimal vector path made of rectangles and ellipses.

use crate::domain::geometry::{Point, Rect};

/// How overlapping sub-paths combine when the path is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// A point is filled if it lies inside any sub-path.
    #[default]
    NonZero,
    /// A point is filled if it lies inside an odd number of sub-paths, so a
    /// sub-path nested in another punches a hole.
    EvenOdd,
}

/// One closed sub-path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathElement {
    Rect(Rect),
    /// An ellipse inscribed in the given rectangle.
    Ellipse(Rect),
}

impl PathElement {
    fn contains(&self, p: Point) -> bool {
        match self {
            PathElement::Rect(r) => r.contains(p),
            PathElement::Ellipse(r) => {
                let rx = r.width / 2.0;
                let ry = r.height / 2.0;
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let c = r.center();
                let nx = (p.x - c.x) / rx;
                let ny = (p.y - c.y) / ry;
                nx * nx + ny * ny < 1.0
            }
        }
    }
}

/// A filled path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    elements: Vec<PathElement>,
    fill_rule: FillRule,
}

impl Path {
    pub fn new(fill_rule: FillRule) -> Self {
        Self {
            elements: Vec::new(),
            fill_rule,
        }
    }

    pub fn add_rect(&mut self, rect: Rect) -> &mut Self {
        self.elements.push(PathElement::Rect(rect));
        self
    }

    pub fn add_ellipse(&mut self, in_rect: Rect) -> &mut Self {
        self.elements.push(PathElement::Ellipse(in_rect));
        self
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    /// Returns `true` if filling this path would paint `point`.
    pub fn contains(&self, point: Point) -> bool {
        let hits = self.elements.iter().filter(|e| e.contains(point)).count();
        match self.fill_rule {
            FillRule::NonZero => hits > 0,
            FillRule::EvenOdd => hits % 2 == 1,
        }
    }
}
