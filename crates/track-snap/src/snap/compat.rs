use crate::geometry::normalize_angle;
use crate::types::Connector;

/// Maximum height difference between two mating connectors.
pub const HEIGHT_TOLERANCE: f64 = 1.0;

/// How far from exactly antiparallel two facing angles may be.
pub const DEFAULT_ANGLE_TOLERANCE: f64 = 15.0;

/// Whether two connectors may physically mate: opposite types and matching
/// height. Facing is checked separately since it depends on placement.
pub fn connectors_compatible(a: &Connector, b: &Connector) -> bool {
    if a.kind == b.kind {
        return false;
    }
    (a.height - b.height).abs() <= HEIGHT_TOLERANCE
}

/// Stricter check honoring each connector's `compatible` list. A connector
/// with a non-empty list only accepts a partner whose id or type name is
/// listed; the check runs in both directions.
pub fn connectors_explicitly_compatible(a: &Connector, b: &Connector) -> bool {
    connectors_compatible(a, b) && accepts(a, b) && accepts(b, a)
}

fn accepts(owner: &Connector, other: &Connector) -> bool {
    match owner.compatible.as_deref() {
        None | Some([]) => true,
        Some(list) => list
            .iter()
            .any(|entry| entry == &other.id || entry == other.kind.as_str()),
    }
}

/// True when the two angles point in roughly opposite directions, i.e. their
/// circular difference is within `tolerance` of 180 degrees.
pub fn angles_opposite(angle1: f64, angle2: f64, tolerance: f64) -> bool {
    let a1 = normalize_angle(angle1);
    let a2 = normalize_angle(angle2);

    let mut diff = (a1 - a2).abs();
    if diff > 180.0 {
        diff = 360.0 - diff;
    }

    (diff - 180.0).abs() < tolerance
}
