//! Derives connection curves for documents that only declare aspect references.
//!
//! The curve runs from the source port to the destination port. Interior
//! control points are pushed off the chord along its normal, on the side picked
//! by `bend_flipped` so the curve approaches the destination port from outside
//! the node.

use super::curve::Curve;
use super::ports::port_position;
use crate::error::{FramError, Result};
use crate::parser::AspectReference;
use crate::store::{Aspect, FunctionId, Point};
use std::collections::HashSet;

pub const DEFAULT_CURVINESS: f64 = 0.15;

/// Chord fractions of the three interior control points.
const INTERIOR_T: [f64; 3] = [1.0 / 3.0, 0.5, 2.0 / 3.0];

/// Position of the destination port relative to the source port.
///
/// y grows downward, so `Lower*` means the destination is drawn below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    LowerLeft,
    LowerRight,
    UpperLeft,
    UpperRight,
}

impl Quadrant {
    pub fn classify(from: Point, to: Point) -> Self {
        let right = to.x - from.x >= 0.0;
        let lower = to.y - from.y >= 0.0;
        match (lower, right) {
            (true, false) => Quadrant::LowerLeft,
            (true, true) => Quadrant::LowerRight,
            (false, false) => Quadrant::UpperLeft,
            (false, true) => Quadrant::UpperRight,
        }
    }
}

/// Whether the bend uses the right-hand normal instead of the left-hand one.
///
/// The left-hand normal points down the page for rightward chords and up for
/// leftward ones. Time/Control ports are entered from above, Precondition/Resource
/// from below. Input curves are S-shaped: their first bend leaves the source
/// horizontally, i.e. against the vertical direction of travel.
fn bend_flipped(aspect: Aspect, quadrant: Quadrant) -> bool {
    use Quadrant::*;
    match (aspect, quadrant) {
        (Aspect::Time | Aspect::Control, LowerRight | UpperRight) => true,
        (Aspect::Time | Aspect::Control, LowerLeft | UpperLeft) => false,
        (Aspect::Precondition | Aspect::Resource, LowerRight | UpperRight) => false,
        (Aspect::Precondition | Aspect::Resource, LowerLeft | UpperLeft) => true,
        (Aspect::Input, LowerRight | UpperLeft) => true,
        (Aspect::Input, LowerLeft | UpperRight) => false,
        // Output never receives a connection; rejected before this table is consulted.
        (Aspect::Output, _) => false,
    }
}

/// Builds the curve from `from_aspect` of a function centered at `from_center`
/// to `to_aspect` of a function centered at `to_center`.
pub fn synthesize_curve(
    from_center: Point,
    from_aspect: Aspect,
    to_center: Point,
    to_aspect: Aspect,
    curviness: f64,
) -> Result<Curve> {
    if to_aspect == Aspect::Output {
        return Err(FramError::InvalidAspectCode(to_aspect.code().to_string()));
    }

    let p0 = port_position(from_center, from_aspect);
    let p4 = port_position(to_center, to_aspect);
    let (dx, dy) = (p4.x - p0.x, p4.y - p0.y);
    let chord = dx.hypot(dy);
    if chord == 0.0 {
        return Err(FramError::DegenerateGeometry { x: p0.x, y: p0.y });
    }

    let quadrant = Quadrant::classify(p0, p4);
    let sign = if bend_flipped(to_aspect, quadrant) { -1.0 } else { 1.0 };
    let magnitude = curviness * chord;
    let (nx, ny) = (-dy / chord, dx / chord);

    // S-curves cross the chord at the midpoint; single bends stay on one side.
    let weights: [f64; 3] = if to_aspect == Aspect::Input { [1.0, 0.0, -1.0] } else { [1.0, 1.0, 1.0] };

    let interior = |i: usize| {
        let k = sign * magnitude * weights[i];
        p0.lerp(&p4, INTERIOR_T[i]).offset(k * nx, k * ny)
    };

    Ok(Curve::new([p0, interior(0), interior(1), interior(2), p4]))
}

/// A connection implied by two legacy references sharing a link name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImpliedLink {
    pub from_fn: FunctionId,
    pub to_fn: FunctionId,
    pub to_aspect: Aspect,
    pub link_name: String,
}

/// Pairs every Output declarer with every other function that declares a
/// non-Output reference under the same link name.
///
/// Order follows the documents: output declarers first, then their targets.
/// Repeated declarations of the same pair collapse into one link.
pub fn pair_references(references: &[AspectReference]) -> Vec<ImpliedLink> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for source in references.iter().filter(|r| r.aspect == Aspect::Output) {
        let targets = references
            .iter()
            .filter(|r| r.aspect != Aspect::Output && r.link_name == source.link_name && r.owner != source.owner);

        for target in targets {
            let link = ImpliedLink {
                from_fn: source.owner,
                to_fn: target.owner,
                to_aspect: target.aspect,
                link_name: source.link_name.clone(),
            };
            if seen.insert(link.clone()) {
                links.push(link);
            }
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SOURCE: Point = Point::new(0.0, 0.0);

    fn side_of_chord(curve: &Curve, i: usize) -> f64 {
        let (a, b, p) = (curve.start(), curve.end(), curve.points[i]);
        (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
    }

    #[rstest]
    fn test_endpoints_sit_on_ports(
        #[values(Aspect::Input, Aspect::Time, Aspect::Control, Aspect::Precondition, Aspect::Resource)] aspect: Aspect,
        #[values(Point::new(-300.0, 200.0), Point::new(300.0, 200.0), Point::new(-300.0, -200.0), Point::new(300.0, -200.0))]
        target: Point,
    ) {
        let curve = synthesize_curve(SOURCE, Aspect::Output, target, aspect, DEFAULT_CURVINESS).unwrap();
        assert_eq!(curve.start(), port_position(SOURCE, Aspect::Output));
        assert_eq!(curve.end(), port_position(target, aspect));
    }

    #[rstest]
    #[case(Point::new(300.0, 200.0), Quadrant::LowerRight)]
    #[case(Point::new(-300.0, 200.0), Quadrant::LowerLeft)]
    #[case(Point::new(300.0, -200.0), Quadrant::UpperRight)]
    #[case(Point::new(-300.0, -200.0), Quadrant::UpperLeft)]
    fn test_quadrant_classification(#[case] target: Point, #[case] expected: Quadrant) {
        assert_eq!(Quadrant::classify(SOURCE, target), expected);
    }

    #[test]
    fn test_input_curves_are_s_shaped() {
        let curve =
            synthesize_curve(SOURCE, Aspect::Output, Point::new(400.0, 150.0), Aspect::Input, DEFAULT_CURVINESS)
                .unwrap();
        let first = side_of_chord(&curve, 1);
        let last = side_of_chord(&curve, 3);
        assert!(first * last < 0.0, "interior points should straddle the chord");
        assert!(side_of_chord(&curve, 2).abs() < 1e-9, "midpoint stays on the chord");
    }

    #[test]
    fn test_single_bend_stays_on_one_side() {
        let curve =
            synthesize_curve(SOURCE, Aspect::Output, Point::new(400.0, 150.0), Aspect::Control, DEFAULT_CURVINESS)
                .unwrap();
        let sides: Vec<f64> = (1..4).map(|i| side_of_chord(&curve, i)).collect();
        assert!(sides.iter().all(|s| *s < 0.0) || sides.iter().all(|s| *s > 0.0));
    }

    #[test]
    fn test_control_bends_above_and_resource_below() {
        let target = Point::new(400.0, 0.0);
        let control = synthesize_curve(SOURCE, Aspect::Output, target, Aspect::Control, DEFAULT_CURVINESS).unwrap();
        let resource = synthesize_curve(SOURCE, Aspect::Output, target, Aspect::Resource, DEFAULT_CURVINESS).unwrap();

        let chord_mid = control.start().lerp(&control.end(), 0.5);
        assert!(control.points[2].y < chord_mid.y);
        let chord_mid = resource.start().lerp(&resource.end(), 0.5);
        assert!(resource.points[2].y > chord_mid.y);
    }

    #[test]
    fn test_offset_scales_with_curviness() {
        let target = Point::new(400.0, 0.0);
        let flat = synthesize_curve(SOURCE, Aspect::Output, target, Aspect::Time, 0.0).unwrap();
        let bent = synthesize_curve(SOURCE, Aspect::Output, target, Aspect::Time, 0.3).unwrap();

        let chord_len = {
            let (a, b) = (bent.start(), bent.end());
            (b.x - a.x).hypot(b.y - a.y)
        };
        let mid = bent.start().lerp(&bent.end(), 0.5);
        let offset = (bent.points[2].x - mid.x).hypot(bent.points[2].y - mid.y);
        assert!((offset - 0.3 * chord_len).abs() < 1e-9);
        assert!(side_of_chord(&flat, 2).abs() < 1e-9);
    }

    #[test]
    fn test_coincident_ports_are_degenerate() {
        // Output port of the source lands exactly on the Input port of the target.
        let target = Point::new(88.0, 0.0);
        let err = synthesize_curve(SOURCE, Aspect::Output, target, Aspect::Input, DEFAULT_CURVINESS).unwrap_err();
        assert_eq!(err, FramError::DegenerateGeometry { x: 44.0, y: 0.0 });
    }

    fn reference(aspect: Aspect, link: &str, owner: u32) -> AspectReference {
        AspectReference { aspect, link_name: link.into(), owner: FunctionId(owner) }
    }

    #[test]
    fn test_pairing_by_link_name() {
        let refs = vec![
            reference(Aspect::Output, "order", 0),
            reference(Aspect::Input, "order", 1),
            reference(Aspect::Control, "order", 2),
            reference(Aspect::Input, "other", 3),
            // A function never links to itself.
            reference(Aspect::Time, "order", 0),
            // Declared twice, linked once.
            reference(Aspect::Input, "order", 1),
        ];

        let links = pair_references(&refs);
        let summary: Vec<_> = links.iter().map(|l| (l.from_fn.0, l.to_fn.0, l.to_aspect)).collect();
        assert_eq!(summary, vec![(0, 1, Aspect::Input), (0, 2, Aspect::Control)]);
        assert!(links.iter().all(|l| l.link_name == "order"));
    }

    #[test]
    fn test_pairing_without_outputs_is_empty() {
        let refs = vec![reference(Aspect::Input, "a", 1), reference(Aspect::Input, "a", 2)];
        assert!(pair_references(&refs).is_empty());
    }

    #[test]
    fn test_output_is_not_a_destination() {
        let err = synthesize_curve(SOURCE, Aspect::Output, Point::new(200.0, 0.0), Aspect::Output, 0.15).unwrap_err();
        assert_eq!(err, FramError::InvalidAspectCode("O".into()));
    }
}
