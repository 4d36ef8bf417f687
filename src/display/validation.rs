//! Checks applied to caller-facing geometry before any edge math runs.
use super::error::PayloadError;
use std::collections::HashMap;

/// Validates parallel identifier and coordinate columns.
///
/// Checks run in a fixed order so a caller always sees the most basic fault
/// first: missing or mismatched columns, then ragged or non-3-D rows, then
/// non-finite numbers, then empty or repeated identifiers.
///
/// # Returns
/// - `Ok(points)` with one `[x, y, z]` per identifier, in input order.
/// - `Err(PayloadError)` naming the first failed check.
pub fn validate_geometry<S: AsRef<str>>(
    ids: Option<&[S]>,
    coords: Option<&[Vec<f64>]>,
) -> Result<Vec<[f64; 3]>, PayloadError> {
    let (ids, coords) = match (ids, coords) {
        (Some(ids), Some(coords)) => (ids, coords),
        (None, _) => return Err(PayloadError::InvalidInput("identifier collection is missing".into())),
        (_, None) => return Err(PayloadError::InvalidInput("coordinate collection is missing".into())),
    };
    if ids.len() != coords.len() {
        return Err(PayloadError::InvalidInput(format!(
            "{} identifiers but {} coordinate rows",
            ids.len(),
            coords.len()
        )));
    }

    if let Some(first) = coords.first() {
        let dims = first.len();
        if let Some((row, bad)) = coords.iter().enumerate().find(|(_, c)| c.len() != dims) {
            return Err(PayloadError::ShapeError(format!(
                "row {} has {} dimensions, expected {}",
                row,
                bad.len(),
                dims
            )));
        }
        if dims != 3 {
            return Err(PayloadError::ShapeError(format!("coordinates are {}-D, expected 3-D", dims)));
        }
    }

    for (row, c) in coords.iter().enumerate() {
        if let Some(v) = c.iter().find(|v| !v.is_finite()) {
            return Err(PayloadError::NumericError(format!(
                "row {} ('{}') contains non-finite value {}",
                row,
                ids[row].as_ref(),
                v
            )));
        }
    }

    if let Some(row) = ids.iter().position(|id| id.as_ref().trim().is_empty()) {
        return Err(PayloadError::ContentError(format!("identifier at row {} is empty", row)));
    }

    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(ids.len());
    for (row, id) in ids.iter().enumerate() {
        if let Some(first) = seen.insert(id.as_ref(), row) {
            return Err(PayloadError::ContentError(format!(
                "identifier '{}' appears at rows {} and {}",
                id.as_ref(),
                first,
                row
            )));
        }
    }

    Ok(coords.iter().map(|c| [c[0], c[1], c[2]]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_valid_geometry() {
        let ids = ids(&["A", "B"]);
        let coords = vec![vec![0.0, 1.0, 2.0], vec![-1.0, 0.5, 3.0]];
        let points = validate_geometry(Some(&ids[..]), Some(&coords[..])).unwrap();
        assert_eq!(points, vec![[0.0, 1.0, 2.0], [-1.0, 0.5, 3.0]]);
    }

    #[test]
    fn test_missing_or_mismatched_columns() {
        let ids = ids(&["A", "B"]);
        let coords = vec![vec![0.0, 0.0, 0.0]];
        assert!(matches!(validate_geometry::<String>(None, Some(&coords[..])), Err(PayloadError::InvalidInput(_))));
        assert!(matches!(validate_geometry(Some(&ids[..]), None), Err(PayloadError::InvalidInput(_))));
        assert!(matches!(validate_geometry(Some(&ids[..]), Some(&coords[..])), Err(PayloadError::InvalidInput(_))));
    }

    #[test]
    fn test_ragged_and_wrong_dimensionality() {
        let ids = ids(&["A", "B"]);
        let ragged = vec![vec![0.0, 0.0, 0.0], vec![0.0, 0.0]];
        assert!(matches!(validate_geometry(Some(&ids[..]), Some(&ragged[..])), Err(PayloadError::ShapeError(_))));
        let planar = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        assert!(matches!(validate_geometry(Some(&ids[..]), Some(&planar[..])), Err(PayloadError::ShapeError(_))));
    }

    #[test]
    fn test_non_finite_values() {
        let ids = ids(&["A", "B"]);
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let coords = vec![vec![0.0, 0.0, 0.0], vec![1.0, bad, 0.0]];
            let err = validate_geometry(Some(&ids[..]), Some(&coords[..])).unwrap_err();
            assert!(matches!(err, PayloadError::NumericError(_)), "{:?}", err);
        }
    }

    #[test]
    fn test_empty_identifier() {
        let ids = ids(&["A", " "]);
        let coords = vec![vec![0.0, 0.0, 0.0], vec![1.0, 1.0, 1.0]];
        assert!(matches!(validate_geometry(Some(&ids[..]), Some(&coords[..])), Err(PayloadError::ContentError(_))));
    }

    #[test]
    fn test_repeated_identifier() {
        let ids = ids(&["A", "B", "A"]);
        let coords = vec![vec![0.0, 0.0, 0.0], vec![1.0, 0.0, 0.0], vec![9.0, 9.0, 9.0]];
        let err = validate_geometry(Some(&ids[..]), Some(&coords[..])).unwrap_err();
        assert!(matches!(err, PayloadError::ContentError(ref msg) if msg.contains("rows 0 and 2")), "{:?}", err);
    }

    #[test]
    fn test_shape_is_checked_before_numbers() {
        let ids = ids(&["", "B"]);
        let coords = vec![vec![f64::NAN, 0.0], vec![1.0, 1.0]];
        assert!(matches!(validate_geometry(Some(&ids[..]), Some(&coords[..])), Err(PayloadError::ShapeError(_))));
    }

    #[test]
    fn test_empty_columns_are_valid() {
        let ids: Vec<String> = Vec::new();
        let coords: Vec<Vec<f64>> = Vec::new();
        assert!(validate_geometry(Some(&ids[..]), Some(&coords[..])).unwrap().is_empty());
    }
}
