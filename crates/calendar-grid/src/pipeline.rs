//! Runs the matrix stages in order for one render request.

use climate_common::PipelineOptions;
use tracing::info;

use crate::builder::shift;
use crate::matrix::CalendarMatrix;
use crate::repair::fill_nulls;
use crate::smooth::smooth;

/// Matrix stages requested for a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridTransform {
    pub start_index: Option<usize>,
    pub fill_null: bool,
    pub smooth_vertical: bool,
    pub smooth_horizontal: bool,
    pub passes: u32,
}

impl From<&PipelineOptions> for GridTransform {
    fn from(options: &PipelineOptions) -> Self {
        Self {
            start_index: options.start_index,
            fill_null: options.fill_null,
            smooth_vertical: options.smooth_vertical,
            smooth_horizontal: options.smooth_horizontal,
            passes: options.recursion,
        }
    }
}

/// Re-center, repair and smooth a freshly built matrix.
///
/// Order: shift (when a start index is set) → fill nulls (once) → the
/// smoothing passes.
pub fn transform(matrix: CalendarMatrix, stages: &GridTransform) -> CalendarMatrix {
    let mut matrix = match stages.start_index {
        Some(start) => shift(&matrix, start),
        None => matrix,
    };

    if stages.fill_null {
        let (repaired, report) = fill_nulls(&matrix);
        info!(
            repaired = report.repaired,
            residual = report.residual,
            "Repaired missing cells"
        );
        matrix = repaired;
    }

    if stages.passes > 0 && (stages.smooth_vertical || stages.smooth_horizontal) {
        matrix = smooth(
            &matrix,
            stages.smooth_vertical,
            stages.smooth_horizontal,
            stages.passes,
        );
    }

    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_options() {
        let options = PipelineOptions {
            start_index: Some(10),
            smooth_vertical: false,
            recursion: 5,
            ..Default::default()
        };
        let stages = GridTransform::from(&options);
        assert_eq!(
            stages,
            GridTransform {
                start_index: Some(10),
                fill_null: true,
                smooth_vertical: false,
                smooth_horizontal: true,
                passes: 5,
            }
        );
    }

    #[test]
    fn test_no_stages_is_identity() {
        let matrix = CalendarMatrix::from_rows(vec![vec![Some(1.0), None, Some(3.0)]]).unwrap();
        assert_eq!(transform(matrix.clone(), &GridTransform::default()), matrix);
    }
}
