use super::*;

// Wavefront OBJ, positions and faces only. Faces with more than three
// vertices are fan-triangulated.

pub fn load(path: &Path) -> Result<Vec<Triangle>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let triangles =
        parse(BufReader::new(file)).with_context(|| format!("Failed to parse {}", path.display()))?;
    info!(
        "Loaded {} triangles from {}",
        triangles.len(),
        path.display()
    );
    Ok(triangles)
}

pub fn parse<R: BufRead>(reader: R) -> Result<Vec<Triangle>> {
    let mut positions = vec![];
    let mut triangles = vec![];
    let mut face = vec![];
    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = line_index + 1;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let position = parse_position(tokens)
                    .with_context(|| format!("Invalid vertex on line {line_number}"))?;
                positions.push(position);
            }
            Some("f") => {
                face.clear();
                for token in tokens {
                    let index = parse_vertex_ref(token, positions.len()).with_context(|| {
                        format!("Invalid face vertex {token:?} on line {line_number}")
                    })?;
                    face.push(index);
                }
                ensure!(
                    face.len() >= 3,
                    "Face on line {line_number} has {} vertices, expected at least 3",
                    face.len()
                );
                for i in 1..face.len() - 1 {
                    triangles.push(Triangle::new(
                        positions[face[0]],
                        positions[face[i]],
                        positions[face[i + 1]],
                    ));
                }
            }
            Some(keyword) => trace!("Skipping {keyword:?} on line {line_number}"),
            None => {}
        }
    }
    debug!(
        "Parsed {} positions into {} triangles",
        positions.len(),
        triangles.len()
    );
    Ok(triangles)
}

fn parse_position<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Result<Point3> {
    let mut coords = [0.0_f32; 3];
    for coord in &mut coords {
        let token = tokens
            .next()
            .ok_or_else(|| anyhow!("Expected three coordinates"))?;
        *coord = token.parse()?;
        ensure!(coord.is_finite(), "Coordinate {token:?} is not finite");
    }

    // Optional homogeneous weight.
    let w = match tokens.next() {
        Some(token) => token.parse::<f32>()?,
        None => 1.0,
    };
    ensure!(w.is_finite() && w != 0.0, "Invalid vertex weight {w}");
    Ok(Point3::from(coords) / w)
}

// `v`, `v/vt`, `v//vn` or `v/vt/vn`. Indices are 1-based, negative ones count
// back from the latest vertex.
fn parse_vertex_ref(token: &str, position_count: usize) -> Result<usize> {
    let index = token
        .split('/')
        .next()
        .ok_or_else(|| anyhow!("Missing vertex index"))?
        .parse::<i64>()?;
    let resolved = match index {
        0 => bail!("Vertex index 0 is invalid"),
        i if i > 0 => i - 1,
        i => position_count as i64 + i,
    };
    ensure!(
        (0..position_count as i64).contains(&resolved),
        "Vertex index {index} is out of range, {position_count} vertices defined so far"
    );
    Ok(resolved as usize)
}
