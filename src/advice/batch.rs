use crate::SUGGEST_COLS;
use crate::SUGGEST_ROWS;
use serde::Deserialize;
use serde::Serialize;

/// Raw numbers handed to an [`Advisor`](super::Advisor): one row per seat,
/// a fixed number of values per row.
///
/// Values that are not finite numbers are stored as zero, so every batch
/// that exists is well formed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Batch([[f64; SUGGEST_COLS]; SUGGEST_ROWS]);

impl Batch {
    pub fn new(rows: [[f64; SUGGEST_COLS]; SUGGEST_ROWS]) -> Self {
        Self(rows.map(|row| row.map(|x| if x.is_finite() { x } else { 0. })))
    }
    pub fn rows(&self) -> &[[f64; SUGGEST_COLS]; SUGGEST_ROWS] {
        &self.0
    }
    pub fn row(&self, index: usize) -> Option<&[f64; SUGGEST_COLS]> {
        self.0.get(index)
    }
}

impl TryFrom<Vec<Vec<f64>>> for Batch {
    type Error = anyhow::Error;
    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        if rows.len() != SUGGEST_ROWS {
            return Err(anyhow::anyhow!(
                "expected {} rows, got {}",
                SUGGEST_ROWS,
                rows.len()
            ));
        }
        let mut batch = [[0.; SUGGEST_COLS]; SUGGEST_ROWS];
        for (i, row) in rows.into_iter().enumerate() {
            batch[i] = <[f64; SUGGEST_COLS]>::try_from(row)
                .map_err(|row| anyhow::anyhow!("row {} has {} values", i, row.len()))?;
        }
        Ok(Self::new(batch))
    }
}

/// Rows separated by `;`, values by whitespace or commas. Anything that
/// does not parse as a number counts as zero.
impl TryFrom<&str> for Batch {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.split(';')
            .map(|row| {
                row.split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|v| !v.is_empty())
                    .map(|v| v.parse::<f64>().unwrap_or(0.))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>()
            .try_into()
    }
}

impl std::fmt::Display for Batch {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, row) in self.0.iter().enumerate() {
            let row = row.iter().map(|x| x.to_string()).collect::<Vec<_>>();
            writeln!(f, "User {}: {}", i, row.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_values_become_zero() {
        let mut rows = [[1.; SUGGEST_COLS]; SUGGEST_ROWS];
        rows[0][0] = f64::NAN;
        rows[3][5] = f64::NEG_INFINITY;
        let batch = Batch::new(rows);
        assert_eq!(batch.rows()[0][0], 0.);
        assert_eq!(batch.rows()[3][5], 0.);
        assert_eq!(batch.rows()[1][1], 1.);
    }

    #[test]
    fn shape_is_enforced() {
        assert!(Batch::try_from(vec![vec![0.; SUGGEST_COLS]; SUGGEST_ROWS - 1]).is_err());
        let mut rows = vec![vec![0.; SUGGEST_COLS]; SUGGEST_ROWS];
        rows[2].push(1.);
        assert!(Batch::try_from(rows).is_err());
    }

    #[test]
    fn parses_text_rows() {
        let batch = Batch::try_from("1 2 3 4 5 6; 1,1,1,1,1,1; 0 0 0 0 0 x; 6 5 4 3 2 1").unwrap();
        assert_eq!(batch.row(0), Some(&[1., 2., 3., 4., 5., 6.]));
        assert_eq!(batch.rows()[2][5], 0.);
        assert!(batch.row(SUGGEST_ROWS).is_none());
        assert!(Batch::try_from("1 2 3").is_err());
    }
}
