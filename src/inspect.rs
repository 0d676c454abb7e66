use std::fmt;

use crate::frame::Frame;

/// Observed bounds of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRange {
    pub name: String,
    pub min: f64,
    pub max: f64,
}

/// Compute min and max of every numeric column of `frame`.
/// Missing values are ignored; a column without any value gets `NaN` bounds.
pub fn column_ranges(frame: &Frame) -> Vec<ColumnRange> {
    frame
        .columns()
        .filter_map(|(name, column)| {
            let values = match column.to_f64() {
                Some(values) => values,
                None => {
                    tracing::debug!("skipping non-numeric column `{}`", name);
                    return None;
                }
            };
            // `f64::min`/`f64::max` return the other operand when one side is NaN.
            Some(ColumnRange {
                name: name.to_string(),
                min: values.fold(f64::NAN, |acc, &v| acc.min(v)),
                max: values.fold(f64::NAN, |acc, &v| acc.max(v)),
            })
        })
        .collect()
}

/// Printable min/max report of a frame.
pub struct RangeReport(pub Vec<ColumnRange>);

impl RangeReport {
    pub fn new(frame: &Frame) -> Self {
        Self(column_ranges(frame))
    }
}

impl fmt::Display for RangeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.0.iter().map(|r| r.name.len()).max().unwrap_or(0);
        writeln!(f, "Minimum values for each column:")?;
        for range in &self.0 {
            writeln!(f, "{:<width$}    {:?}", range.name, range.min)?;
        }
        writeln!(f, "Maximum values for each column:")?;
        for range in &self.0 {
            writeln!(f, "{:<width$}    {:?}", range.name, range.max)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::frame::Column;
    use approx::assert_relative_eq;
    use ndarray::arr1;

    fn frame() -> Frame {
        Frame::new(vec![
            (
                "petal width".to_string(),
                Column::Float(arr1(&[0.2, f64::NAN, 2.5, 0.1])),
            ),
            ("rings".to_string(), Column::Integer(arr1(&[7, 29, 1, 3]))),
            (
                "class".to_string(),
                Column::Text(vec![Some("x".to_string()); 4]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn ranges_skip_missing_values() {
        let ranges = column_ranges(&frame());
        assert_eq!(2, ranges.len());

        assert_eq!("petal width", ranges[0].name);
        assert_relative_eq!(0.1, ranges[0].min);
        assert_relative_eq!(2.5, ranges[0].max);

        assert_eq!("rings", ranges[1].name);
        assert_relative_eq!(1.0, ranges[1].min);
        assert_relative_eq!(29.0, ranges[1].max);
    }

    #[test]
    fn all_missing_column_has_nan_bounds() {
        let frame = Frame::new(vec![(
            "empty".to_string(),
            Column::Float(arr1(&[f64::NAN, f64::NAN])),
        )])
        .unwrap();
        let ranges = column_ranges(&frame);
        assert!(ranges[0].min.is_nan());
        assert!(ranges[0].max.is_nan());
    }

    #[test]
    fn report_lists_both_sections() {
        let report = RangeReport::new(&frame()).to_string();
        let lines = report.lines().collect::<Vec<_>>();
        assert_eq!(
            vec![
                "Minimum values for each column:",
                "petal width    0.1",
                "rings          1.0",
                "Maximum values for each column:",
                "petal width    2.5",
                "rings          29.0",
            ],
            lines
        );
    }
}
