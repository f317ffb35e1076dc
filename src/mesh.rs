use super::*;

/// Triangle list plus the grid built over it. Both are fixed after creation.
pub struct Mesh {
    triangles: Vec<Triangle>,
    grid: Grid,
}

impl Mesh {
    pub fn create(triangles: Vec<Triangle>, resolution: Resolution) -> Result<Self> {
        let grid = Grid::create(&triangles, resolution)?;
        Ok(Self { triangles, grid })
    }

    pub fn load(path: &Path, resolution: Resolution) -> Result<Self> {
        Self::create(obj::load(path)?, resolution)
    }

    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    #[inline]
    pub fn triangle(&self, id: TriangleId) -> &Triangle {
        &self.triangles[id.index()]
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn bounds(&self) -> &Aabb {
        self.grid.bounds()
    }

    pub fn positions(&self) -> impl Iterator<Item = &Point3> + '_ {
        self.triangles
            .iter()
            .flat_map(|triangle| triangle.positions.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create() {
        let triangles = obj::parse(
            "v 0 0 0\n\
             v 2 0 0\n\
             v 2 2 0\n\
             v 0 2 2\n\
             f 1 2 3 4\n"
                .as_bytes(),
        )
        .unwrap();
        let mesh = Mesh::create(triangles, Resolution::Fixed([2, 2, 2])).unwrap();
        assert_eq!(mesh.triangles().len(), 2);
        assert_eq!(mesh.positions().count(), 6);
        assert_eq!(mesh.bounds().max(), Point3::new(2.0, 2.0, 2.0));
        assert_eq!(mesh.grid().dimensions(), [2, 2, 2]);

        // Grid ids resolve back into the mesh.
        for (_, ids) in mesh.grid().cells() {
            for &id in ids {
                assert!(mesh.triangles().contains(mesh.triangle(id)));
            }
        }
    }

    #[test]
    fn test_empty() {
        let mesh = Mesh::create(vec![], Resolution::default()).unwrap();
        assert_eq!(mesh.grid().dimensions(), [0, 0, 0]);
        assert!(mesh.grid().at([0, 0, 0]).is_err());
        assert!(mesh.bounds().is_empty());
    }
}
