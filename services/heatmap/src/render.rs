//! One render request: observation file → PNG heatmap.
//!
//! The request either produces a complete image or an error. Nothing is
//! written until the PNG is fully encoded.

use std::fs;
use std::path::{Path, PathBuf};

use calendar_grid::{build_matrix, transform, BuildReport, CalendarMatrix, GridTransform, Period};
use climate_common::{ClimateError, ClimateResult, Palette, PaletteTable, PipelineOptions};
use image::RgbImage;
use renderer::{compose, encode_png, ColorBinner, ValueDomain};
use station_parser::{parse_csv, parse_ushcn_daily, Granularity, Observation, ParsedRecords};
use tracing::{debug, info, warn};

use crate::config::{HeatmapConfig, InputConfig, InputFormat};

/// A rendered heatmap and what went into it.
#[derive(Debug, Clone)]
pub struct Heatmap {
    /// Descriptive file name derived from the options
    pub name: String,
    pub matrix: CalendarMatrix,
    pub image: RgbImage,
    pub png: Vec<u8>,
    /// Palette after size fallback and reversal
    pub palette: Palette,
    /// `None` when every cell was missing
    pub domain: Option<ValueDomain>,
    pub build: BuildReport,
}

/// Parse an input file's content according to the input configuration.
pub fn read_observations(content: &str, input: &InputConfig) -> ClimateResult<ParsedRecords> {
    match input.format {
        InputFormat::Csv => {
            parse_csv(content, &input.csv).map_err(|e| ClimateError::Parse(e.to_string()))
        }
        InputFormat::Ushcn => Ok(parse_ushcn_daily(content, &input.ushcn_filter())),
    }
}

pub fn period_for(granularity: Granularity) -> Period {
    match granularity {
        Granularity::Daily => Period::Daily,
        Granularity::Monthly => Period::Monthly,
    }
}

/// Palette for a request: the requested size (or the next smaller one),
/// reversed when the options ask for it.
pub fn select_palette(palettes: &PaletteTable, options: &PipelineOptions) -> ClimateResult<Palette> {
    let palette = palettes.resolve(&options.palette, options.bins)?;
    Ok(if options.reverse_palette {
        palette.reversed()
    } else {
        palette
    })
}

/// Run the full pipeline over parsed observations.
///
/// `source` names the input and prefixes the image name.
pub fn render_observations(
    records: &[Observation],
    period: Period,
    palettes: &PaletteTable,
    options: &PipelineOptions,
    source: &str,
) -> ClimateResult<Heatmap> {
    options.validate()?;
    let palette = select_palette(palettes, options)?;

    let (matrix, build) = build_matrix(records, period)?;
    let matrix = transform(matrix, &GridTransform::from(options));

    let domain = ValueDomain::of(&matrix);
    if domain.is_none() {
        warn!("Every cell is missing; the image will only show the missing color");
    }

    let binner = ColorBinner::new(
        palette.clone(),
        domain.unwrap_or(ValueDomain::new(0.0, 0.0)),
        options.continuity,
    )?
    .with_missing_color(options.missing_color);

    let image = compose(&matrix, &binner, options.cell_width, options.cell_height)?;
    let png = encode_png(&image).map_err(ClimateError::Render)?;
    let name = options.image_name(source);

    info!(
        name = %name,
        years = matrix.height(),
        width = image.width(),
        height = image.height(),
        bytes = png.len(),
        "Rendered heatmap"
    );

    Ok(Heatmap {
        name,
        matrix,
        image,
        png,
        palette,
        domain,
        build,
    })
}

/// Read, parse and render one input file.
pub fn render_file(
    input: &Path,
    config: &HeatmapConfig,
    palettes: &PaletteTable,
) -> ClimateResult<Heatmap> {
    let content = fs::read_to_string(input)?;
    let parsed = read_observations(&content, &config.input)?;
    debug!(
        file = %input.display(),
        records = parsed.len(),
        skipped = parsed.skipped_rows,
        "Read observations"
    );
    if parsed.skipped_rows > 0 {
        warn!(skipped = parsed.skipped_rows, "Skipped unreadable rows");
    }

    render_observations(
        &parsed.records,
        period_for(config.input.granularity),
        palettes,
        &config.options,
        &source_name(input),
    )
}

/// Write the PNG into `dir` under the heatmap's name.
pub fn write_heatmap(heatmap: &Heatmap, dir: &Path) -> ClimateResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&heatmap.name);
    fs::write(&path, &heatmap.png)?;
    info!(path = %path.display(), "Wrote heatmap");
    Ok(path)
}

/// File stem of the input, used as the image name prefix.
pub fn source_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "heatmap".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_name() {
        assert_eq!(source_name(Path::new("/data/btv-mean-temp.csv")), "btv-mean-temp");
        assert_eq!(source_name(Path::new("USH00300042.dly")), "USH00300042");
        assert_eq!(source_name(Path::new("/")), "heatmap");
    }

    #[test]
    fn test_period_for() {
        assert_eq!(period_for(Granularity::Daily), Period::Daily);
        assert_eq!(period_for(Granularity::Monthly), Period::Monthly);
    }
}
