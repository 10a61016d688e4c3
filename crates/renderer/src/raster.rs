//! Matrix → pixel raster.

use calendar_grid::CalendarMatrix;
use climate_common::{ClimateError, ClimateResult};
use image::{Rgb as Pixel, RgbImage};
use tracing::debug;

use crate::colormap::ColorBinner;

/// Draw `matrix` with one `cell_width` × `cell_height` block per cell.
///
/// Columns run left to right, years top to bottom. Every pixel of a block
/// has the color of its cell.
pub fn compose(
    matrix: &CalendarMatrix,
    binner: &ColorBinner,
    cell_width: u32,
    cell_height: u32,
) -> ClimateResult<RgbImage> {
    if cell_width == 0 || cell_height == 0 {
        return Err(ClimateError::Render(format!(
            "cell size {cell_width}x{cell_height} has no pixels"
        )));
    }

    let image_width = pixel_extent(matrix.width(), cell_width)?;
    let image_height = pixel_extent(matrix.height(), cell_height)?;
    let mut image = RgbImage::new(image_width, image_height);

    for (row, cells) in matrix.rows().enumerate() {
        let y0 = row as u32 * cell_height;
        for (col, cell) in cells.iter().enumerate() {
            let pixel = Pixel(binner.color_for(*cell).channels());
            let x0 = col as u32 * cell_width;
            for y in y0..y0 + cell_height {
                for x in x0..x0 + cell_width {
                    image.put_pixel(x, y, pixel);
                }
            }
        }
    }

    debug!(
        width = image_width,
        height = image_height,
        "Composed raster"
    );
    Ok(image)
}

fn pixel_extent(cells: usize, cell_size: u32) -> ClimateResult<u32> {
    u32::try_from(cells)
        .ok()
        .and_then(|cells| cells.checked_mul(cell_size))
        .ok_or_else(|| {
            ClimateError::Render(format!("{cells} cells of {cell_size}px overflow the image size"))
        })
}
