use ndarray::Array2;
use std::path::Path;

use super::{read_artifact, ArtifactError};

pub fn load_matrix(path: &Path) -> Result<Array2<f64>, ArtifactError> {
    let content = read_artifact(path)?;
    parse_matrix(&path.display().to_string(), &content)
}

/// Parse a JSON array of equal-length numeric rows.
pub fn parse_matrix(name: &str, content: &str) -> Result<Array2<f64>, ArtifactError> {
    let rows: Vec<Vec<f64>> =
        serde_json::from_str(content).map_err(|e| ArtifactError::ParseError(name.to_string(), e))?;

    let ncols = rows.first().map(Vec::len).unwrap_or(0);
    if let Some(idx) = rows.iter().position(|row| row.len() != ncols) {
        return Err(ArtifactError::Invalid(
            name.to_string(),
            format!("row {} has {} columns, expected {}", idx, rows[idx].len(), ncols),
        ));
    }

    let nrows = rows.len();
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((nrows, ncols), flat)
        .map_err(|e| ArtifactError::Invalid(name.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_parse_matrix() {
        let m = parse_matrix("m", "[[1, 2.5, 0], [0, 0, 3]]").unwrap();
        assert_eq!(m, array![[1.0, 2.5, 0.0], [0.0, 0.0, 3.0]]);

        let empty = parse_matrix("m", "[]").unwrap();
        assert_eq!(empty.dim(), (0, 0));
    }

    #[test]
    fn test_parse_ragged_matrix() {
        let err = parse_matrix("m", "[[1, 2], [3]]").unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid(_, msg) if msg.contains("row 1")));
    }

    #[test]
    fn test_parse_non_numeric_matrix() {
        let err = parse_matrix("m", r#"[["a"]]"#).unwrap_err();
        assert!(matches!(err, ArtifactError::ParseError(_, _)));
    }
}
