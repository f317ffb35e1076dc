use super::*;

const BACKGROUND: ColorRgba8 = [0, 0, 0, 255];
const SPLAT_COLOR: ColorRgba8 = [255, 255, 255, 255];
const HEATMAP_COLD: ColorRgb = ColorRgb::BLACK;
const HEATMAP_HOT: ColorRgb = ColorRgb::WHITE;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Shade each pixel by the number of grid candidates along its primary ray.
    Heatmap,
    /// Mark the pixels mesh vertices project to.
    Splat,
}

/// Visits every cell `(i, j, k)` in order and sums the lengths of their
/// triangle lists.
pub fn scan_grid(grid: &Grid) -> Result<usize> {
    let [nx, ny, nz] = grid.dimensions();
    let mut count = 0;
    for i in 0..nx {
        for j in 0..ny {
            for k in 0..nz {
                count += grid.at([i, j, k])?.len();
            }
        }
    }
    Ok(count)
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeatmapStats {
    pub max_candidates: usize,
    pub mean_candidates: f64,
    pub covered_pixels: usize,
}

pub fn heatmap(camera: &Camera, grid: &Grid, canvas: &mut Canvas) -> Result<HeatmapStats> {
    let timer = Instant::now();
    let (width, height) = canvas.size();

    // Primary rays, one per pixel center.
    let pixel_count = width as usize * height as usize;
    let counts = {
        let canvas = &*canvas;
        (0..pixel_count)
            .into_par_iter()
            .map(|pixel_index| {
                let x = (pixel_index % width as usize) as u32;
                let y = (pixel_index / width as usize) as u32;
                let ndc = canvas.normalized_coordinates(x, y);
                let ray = camera.ray_from_viewport(ndc.x, ndc.y);
                grid.candidates(&ray).len()
            })
            .collect::<Vec<_>>()
    };

    // Shade.
    let max_candidates = counts.iter().copied().max().unwrap_or(0);
    for (pixel_index, &count) in counts.iter().enumerate() {
        let t = if max_candidates == 0 {
            0.0
        } else {
            count as f32 / max_candidates as f32
        };
        let color = lerp_color(&HEATMAP_COLD, &HEATMAP_HOT, t).into_srgba8();
        let x = (pixel_index % width as usize) as u32;
        let y = (pixel_index / width as usize) as u32;
        canvas.set_pixel(x, y, color)?;
    }

    let stats = HeatmapStats {
        max_candidates,
        mean_candidates: if counts.is_empty() {
            0.0
        } else {
            counts.iter().sum::<usize>() as f64 / counts.len() as f64
        },
        covered_pixels: counts.iter().filter(|&&count| count > 0).count(),
    };
    info!(
        "Rendered {width}x{height} heatmap in {:.03} s",
        timer.elapsed().as_secs_f64()
    );
    debug!("Heatmap stats: {stats:#?}");
    Ok(stats)
}

/// Projects every mesh vertex in front of the camera and marks its pixel.
/// Returns the number of vertices that landed on the canvas.
pub fn splat(
    camera: &Camera,
    mesh: &Mesh,
    canvas: &mut Canvas,
    znear: f32,
    zfar: f32,
) -> Result<usize> {
    let clip_from_world = camera.clip_from_world(znear, zfar)?;
    let size = canvas.size();
    let origin = camera.ray().origin();
    let dir = camera.ray().dir();

    canvas.fill(BACKGROUND);
    let mut hits = 0;
    for position in mesh.positions() {
        // Skip anything behind the near plane or beyond the far plane.
        let depth = (position - origin).dot(&dir);
        if depth < znear || depth > zfar {
            continue;
        }

        // Skip anything outside the frustum sides before truncating to pixels.
        let ndc = project_ndc(position, &clip_from_world)?;
        if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 {
            continue;
        }
        let pixel = camera.project_point_to(position, &clip_from_world, size)?;
        let (Ok(x), Ok(y)) = (u32::try_from(pixel.x), u32::try_from(pixel.y)) else {
            continue;
        };
        if canvas.contains(x, y) {
            canvas.set_pixel(x, y, SPLAT_COLOR)?;
            hits += 1;
        }
    }
    info!("Splatted {hits} of {} vertices", mesh.triangles().len() * 3);
    Ok(hits)
}
