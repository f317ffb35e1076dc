use std::ops::Index;

use super::*;

// Uniform grid after "A Fast Voxel Traversal Algorithm for Ray Tracing"
// (Amanatides & Woo), with PBRT's rule for picking the cell counts.

/// Upper bound on the cell count along any axis of an `Auto` resolution.
pub const MAX_RESOLUTION: u32 = 64;

/// Upper bound on the total cell count of a `Fixed` resolution.
pub const MAX_CELL_COUNT: usize = 1 << 22;

/// Integer cell coordinate `[i, j, k]`.
pub type Cell = [usize; 3];

/// How many cells the grid gets along each axis.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub enum Resolution {
    /// Exact cell counts, each at least 1.
    Fixed([u32; 3]),
    /// `scale * cbrt(triangle_count)` cells along the longest axis, the other
    /// axes proportional to their extent.
    Auto(f32),
}

impl Default for Resolution {
    fn default() -> Self {
        Self::Auto(3.0)
    }
}

impl Resolution {
    fn validate(self) -> Result<()> {
        match self {
            Self::Fixed(dims) => {
                ensure!(
                    dims.iter().all(|&n| n >= 1),
                    "Grid resolution must be at least 1 along every axis, got {dims:?}"
                );
                let cell_count = dims
                    .iter()
                    .try_fold(1_usize, |count, &n| count.checked_mul(n as usize));
                ensure!(
                    cell_count.map_or(false, |count| count <= MAX_CELL_COUNT),
                    "Grid resolution {dims:?} exceeds {MAX_CELL_COUNT} cells"
                );
            }
            Self::Auto(scale) => {
                ensure!(
                    scale.is_finite() && scale > 0.0,
                    "Grid resolution scale must be positive, got {scale}"
                );
            }
        }
        Ok(())
    }

    fn dimensions(self, bounds: &Aabb, triangle_count: usize) -> Result<[usize; 3]> {
        self.validate()?;
        match self {
            Self::Fixed(dims) => Ok(dims.map(|n| n as usize)),
            Self::Auto(scale) => {
                let extents = bounds.extents();
                let max_extent = extents.max();
                if max_extent <= 0.0 {
                    return Ok([1, 1, 1]);
                }
                let cells_per_unit = scale * (triangle_count as f32).cbrt() / max_extent;
                Ok([0, 1, 2].map(|axis| {
                    let n = (extents[axis] * cells_per_unit).round() as u32;
                    n.clamp(1, MAX_RESOLUTION) as usize
                }))
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub cell_count: usize,
    pub empty_cell_count: usize,
    pub reference_count: usize,
    pub max_cell_len: usize,
}

/// Uniform spatial index over a triangle list.
///
/// Cells store [`TriangleId`]s into the list the grid was built from. A
/// triangle is inserted into every cell its bounding box overlaps, so the
/// same id may appear in many cells.
#[derive(Clone, Debug)]
pub struct Grid {
    bounds: Aabb,
    dimensions: [usize; 3],
    cell_size: Vec3,
    cells: Vec<Vec<TriangleId>>,
}

impl Grid {
    pub fn create(triangles: &[Triangle], resolution: Resolution) -> Result<Self> {
        // Validation.
        ensure!(
            u32::try_from(triangles.len()).is_ok(),
            "Too many triangles for a grid: {}",
            triangles.len()
        );
        resolution.validate()?;

        // Nothing to index.
        if triangles.is_empty() {
            debug!("Creating empty grid");
            return Ok(Self {
                bounds: Aabb::new(),
                dimensions: [0, 0, 0],
                cell_size: Vec3::zeros(),
                cells: vec![],
            });
        }

        let timer = Instant::now();

        // Bounds.
        let triangle_bounds = triangles
            .par_iter()
            .map(Triangle::bounds)
            .collect::<Vec<_>>();
        let bounds = triangle_bounds
            .iter()
            .fold(Aabb::new(), |bounds, other| bounds.merged(other));

        // Dimensions.
        let dimensions = resolution.dimensions(&bounds, triangles.len())?;
        let extents = bounds.extents();
        let cell_size = vector![
            extents.x / dimensions[0] as f32,
            extents.y / dimensions[1] as f32,
            extents.z / dimensions[2] as f32
        ];
        let mut grid = Self {
            bounds,
            dimensions,
            cell_size,
            cells: vec![vec![]; dimensions[0] * dimensions[1] * dimensions[2]],
        };

        // Footprints.
        let footprints = triangle_bounds
            .par_iter()
            .map(|bounds| (grid.clamped_cell(&bounds.min()), grid.clamped_cell(&bounds.max())))
            .collect::<Vec<_>>();

        // Insert in triangle order.
        for (triangle_index, (lo, hi)) in footprints.into_iter().enumerate() {
            let id = TriangleId::new(triangle_index as u32);
            for k in lo[2]..=hi[2] {
                for j in lo[1]..=hi[1] {
                    for i in lo[0]..=hi[0] {
                        let flat = grid.flat_index([i, j, k]);
                        grid.cells[flat].push(id);
                    }
                }
            }
        }

        info!(
            "Created {}x{}x{} grid with {} references to {} triangles in {:.03} s",
            dimensions[0],
            dimensions[1],
            dimensions[2],
            grid.reference_count(),
            triangles.len(),
            timer.elapsed().as_secs_f64()
        );
        debug!("Grid stats: {:#?}", grid.stats());

        Ok(grid)
    }

    #[inline]
    pub fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }

    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    #[inline]
    pub fn cell_size(&self) -> Vec3 {
        self.cell_size
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains_cell(&self, cell: Cell) -> bool {
        (0..3).all(|axis| cell[axis] < self.dimensions[axis])
    }

    /// Triangles stored in `cell`. Fails when `cell` lies outside
    /// [`Grid::dimensions`].
    pub fn at(&self, cell: Cell) -> Result<&[TriangleId]> {
        ensure!(
            self.contains_cell(cell),
            "Cell {cell:?} is outside grid dimensions {:?}",
            self.dimensions
        );
        Ok(&self.cells[self.flat_index(cell)])
    }

    /// Cell containing `point`, or `None` outside the grid bounds. Points on
    /// the max face belong to the last cell.
    pub fn cell_of(&self, point: &Point3) -> Option<Cell> {
        if self.is_empty() || !self.bounds.contains(point) {
            return None;
        }
        Some(self.clamped_cell(point))
    }

    pub fn cell_bounds(&self, cell: Cell) -> Result<Aabb> {
        ensure!(
            self.contains_cell(cell),
            "Cell {cell:?} is outside grid dimensions {:?}",
            self.dimensions
        );
        let cell_coords = vector![cell[0] as f32, cell[1] as f32, cell[2] as f32];
        let min = self.bounds.min() + self.cell_size.component_mul(&cell_coords);
        let max = min + self.cell_size;
        Ok(Aabb::from_min_max(&min, &max))
    }

    /// All cells with their contents, `i` varying fastest.
    pub fn cells(&self) -> impl Iterator<Item = (Cell, &[TriangleId])> + '_ {
        let [nx, ny, _] = self.dimensions;
        self.cells.iter().enumerate().map(move |(flat, ids)| {
            let cell = [flat % nx, (flat / nx) % ny, flat / (nx * ny)];
            (cell, ids.as_slice())
        })
    }

    pub fn reference_count(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            cell_count: self.cell_count(),
            empty_cell_count: self.cells.iter().filter(|ids| ids.is_empty()).count(),
            reference_count: self.reference_count(),
            max_cell_len: self.cells.iter().map(Vec::len).max().unwrap_or(0),
        }
    }

    /// Cells pierced by `ray`, front to back, starting where the ray enters
    /// the grid bounds (or at its origin when it starts inside).
    pub fn traverse(&self, ray: &Ray) -> Traversal<'_> {
        Traversal::new(self, ray)
    }

    /// Sorted, deduplicated triangles from every cell along `ray`.
    pub fn candidates(&self, ray: &Ray) -> Vec<TriangleId> {
        let mut ids = self
            .traverse(ray)
            .flat_map(|cell| self[cell].iter().copied())
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    #[inline]
    fn flat_index(&self, cell: Cell) -> usize {
        cell[0] + self.dimensions[0] * (cell[1] + self.dimensions[1] * cell[2])
    }

    fn clamped_cell(&self, point: &Point3) -> Cell {
        [0, 1, 2].map(|axis| {
            if self.cell_size[axis] <= 0.0 {
                return 0;
            }
            // Float-to-int casts saturate, negative offsets land in cell 0.
            let offset = (point[axis] - self.bounds.min()[axis]) / self.cell_size[axis];
            (offset.floor() as usize).min(self.dimensions[axis] - 1)
        })
    }
}

impl Index<Cell> for Grid {
    type Output = [TriangleId];

    fn index(&self, cell: Cell) -> &Self::Output {
        assert!(
            self.contains_cell(cell),
            "Cell {cell:?} is outside grid dimensions {:?}",
            self.dimensions
        );
        &self.cells[self.flat_index(cell)]
    }
}

//
// Traversal
//

pub struct Traversal<'a> {
    grid: &'a Grid,
    cell: [usize; 3],
    step: [isize; 3],
    t_next: Vec3,
    t_delta: Vec3,
    t_exit: f32,
    done: bool,
}

impl<'a> Traversal<'a> {
    fn new(grid: &'a Grid, ray: &Ray) -> Self {
        let mut traversal = Self {
            grid,
            cell: [0; 3],
            step: [0; 3],
            t_next: Vec3::repeat(f32::INFINITY),
            t_delta: Vec3::repeat(f32::INFINITY),
            t_exit: 0.0,
            done: true,
        };
        if grid.is_empty() {
            return traversal;
        }
        let Some((t_enter, t_exit)) = grid.bounds.hit(ray, 0.0, f32::INFINITY) else {
            return traversal;
        };

        let origin = ray.origin();
        let dir = ray.dir();
        let entry = ray.at(t_enter);
        traversal.cell = grid.clamped_cell(&entry);
        traversal.t_exit = t_exit;
        traversal.done = false;

        for axis in 0..3 {
            let size = grid.cell_size[axis];
            if dir[axis] == 0.0 || size <= 0.0 {
                continue;
            }
            let cell = traversal.cell[axis] as f32;
            let min = grid.bounds.min()[axis];
            if dir[axis] > 0.0 {
                let boundary = min + (cell + 1.0) * size;
                traversal.step[axis] = 1;
                traversal.t_next[axis] = (boundary - origin[axis]) / dir[axis];
                traversal.t_delta[axis] = size / dir[axis];
            } else {
                let boundary = min + cell * size;
                traversal.step[axis] = -1;
                traversal.t_next[axis] = (boundary - origin[axis]) / dir[axis];
                traversal.t_delta[axis] = -size / dir[axis];
            }
        }

        traversal
    }
}

impl Iterator for Traversal<'_> {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.cell;

        // Step across the nearest cell boundary.
        let (axis, t_next) = self.t_next.argmin();
        if t_next > self.t_exit {
            self.done = true;
            return Some(current);
        }
        match self.cell[axis].checked_add_signed(self.step[axis]) {
            Some(next) if next < self.grid.dimensions[axis] => {
                self.cell[axis] = next;
                self.t_next[axis] += self.t_delta[axis];
            }
            _ => self.done = true,
        }

        trace!("Traversal visits {current:?}");
        Some(current)
    }
}
