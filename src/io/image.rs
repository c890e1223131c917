//! PNG rendering of a packed layout

use crate::algorithm::canonical::OrientationTable;
use crate::algorithm::packer::Placement;
use crate::io::configuration::MAX_RENDER_PIXELS;
use crate::io::error::{PackingError, Result, invalid_parameter};
use image::{ImageBuffer, Rgba};
use std::path::Path;

/// Colour of cells no item covers
pub const EMPTY_COLOR: [u8; 4] = [40, 40, 40, 255];

// Cycled per placed item
const PALETTE: [[u8; 4]; 10] = [
    [230, 25, 75, 255],
    [60, 180, 75, 255],
    [255, 225, 25, 255],
    [0, 130, 200, 255],
    [245, 130, 48, 255],
    [145, 30, 180, 255],
    [70, 240, 240, 255],
    [240, 50, 230, 255],
    [210, 245, 60, 255],
    [250, 190, 212, 255],
];

/// Colour used for the `index`-th placed item
pub fn item_color(index: usize) -> [u8; 4] {
    PALETTE.get(index % PALETTE.len()).copied().unwrap_or(EMPTY_COLOR)
}

/// Per-cell item index for a layout, `None` where the grid is empty
pub fn cell_owners(
    layout: &[Placement],
    table: &OrientationTable,
    width: usize,
    height: usize,
) -> Vec<Option<usize>> {
    let mut owners = vec![None; width * height];

    for (index, placement) in layout.iter().enumerate() {
        let Some(orientation) = table
            .orientations(placement.shape)
            .and_then(|orientations| orientations.get(placement.orientation))
        else {
            continue;
        };

        for (dr, dc) in orientation.cells() {
            let (row, col) = (placement.row + dr, placement.col + dc);
            if row < height && col < width {
                if let Some(owner) = owners.get_mut(row * width + col) {
                    *owner = Some(index);
                }
            }
        }
    }

    owners
}

/// Export a layout as a PNG with one `cell_pixels` square per grid cell
///
/// # Errors
///
/// Returns an error if:
/// - `cell_pixels` is zero
/// - The image would exceed [`MAX_RENDER_PIXELS`] pixels
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_layout_as_png(
    layout: &[Placement],
    table: &OrientationTable,
    (width, height): (usize, usize),
    cell_pixels: u32,
    output_path: &Path,
) -> Result<()> {
    if cell_pixels == 0 {
        return Err(invalid_parameter(
            "cell_pixels",
            &cell_pixels,
            &"must be positive",
        ));
    }

    let scaled = |cells: usize| {
        u32::try_from(cells)
            .ok()
            .and_then(|cells| cells.checked_mul(cell_pixels))
    };
    let (Some(image_width), Some(image_height)) = (scaled(width), scaled(height)) else {
        return Err(invalid_parameter(
            "cell_pixels",
            &cell_pixels,
            &format!("a {width}x{height} grid exceeds the maximum image size"),
        ));
    };
    if u64::from(image_width) * u64::from(image_height) > MAX_RENDER_PIXELS {
        return Err(invalid_parameter(
            "cell_pixels",
            &cell_pixels,
            &format!("{image_width}x{image_height} pixels exceeds {MAX_RENDER_PIXELS}"),
        ));
    }

    let owners = cell_owners(layout, table, width, height);
    let img = ImageBuffer::from_fn(image_width, image_height, |x, y| {
        let (row, col) = ((y / cell_pixels) as usize, (x / cell_pixels) as usize);
        let color = owners
            .get(row * width + col)
            .copied()
            .flatten()
            .map_or(EMPTY_COLOR, item_color);
        Rgba(color)
    });

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PackingError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| PackingError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
