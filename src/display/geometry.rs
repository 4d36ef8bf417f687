//! Line-segment and arrow-head geometry for rendered edges.
use super::error::PayloadError;
use crate::layout::Position;
use serde::Serialize;

/// Arrow head sitting just short of the target node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Arrow {
    pub tip: Position,
    pub base: Position,
    pub length: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeGeometry {
    pub start: Position,
    pub end: Position,
    /// Unit vector from `start` to `end`.
    pub direction: [f64; 3],
    pub length: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow: Option<Arrow>,
}

/// Computes the segment between two node positions.
///
/// The arrow tip is pulled back from the target by `arrow_offset` (at most
/// half the segment) so it stays visible outside the node marker.
pub fn edge_geometry(
    start: Position,
    end: Position,
    directional: bool,
    arrow_offset: f64,
) -> Result<EdgeGeometry, PayloadError> {
    let length = start.distance(&end);
    if !length.is_finite() || length <= f64::EPSILON {
        return Err(PayloadError::NumericError(format!(
            "edge from ({}, {}, {}) to ({}, {}, {}) has zero length",
            start.x, start.y, start.z, end.x, end.y, end.z
        )));
    }
    let direction = [(end.x - start.x) / length, (end.y - start.y) / length, (end.z - start.z) / length];

    let arrow = directional.then(|| {
        let back = arrow_offset.min(length / 2.0);
        let tip = end.offset(scale(direction, -back));
        let head = (length * 0.1).min(arrow_offset);
        Arrow { tip, base: tip.offset(scale(direction, -head)), length: head }
    });

    Ok(EdgeGeometry { start, end, direction, length, arrow })
}

fn scale([x, y, z]: [f64; 3], by: f64) -> [f64; 3] {
    [x * by, y * by, z * by]
}
