use super::*;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    pub image_width: NonZeroU32,
    pub image_height: NonZeroU32,
    pub camera: CameraConfig,
    pub grid: Resolution,
    pub znear: f32,
    pub zfar: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CameraConfig {
    pub origin: [f32; 3],
    pub direction: [f32; 3],
    pub distance: f32,
    pub width: f32,
    pub height: f32,
    pub tilt_deg: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: NonZeroU32::new(640).expect("Image width must be non-zero"),
            image_height: NonZeroU32::new(480).expect("Image height must be non-zero"),
            camera: CameraConfig::default(),
            grid: Resolution::default(),
            znear: 0.01,
            zfar: 1000.0,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            origin: [0.0, 0.1, 0.25],
            direction: [0.0, 0.0, -1.0],
            distance: 1.0,
            width: 0.8,
            height: 0.6,
            tilt_deg: 0.0,
        }
    }
}

impl RenderConfig {
    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width.get(), self.image_height.get())
    }
}

impl CameraConfig {
    pub fn camera(&self) -> Result<Camera> {
        let ray = Ray::new(Point3::from(self.origin), Vec3::from(self.direction));
        Camera::new(ray, self.distance, self.width, self.height, self.tilt_deg)
    }
}

pub fn read_from_file<P, T>(path: P) -> Result<T>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    from_reader(BufReader::new(file)).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: std::io::Read,
    T: DeserializeOwned,
{
    Ok(ron::de::from_reader(reader)?)
}

pub fn write_to_file<P, T>(path: P, value: &T) -> Result<()>
where
    P: AsRef<Path>,
    T: Serialize,
{
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    to_writer(BufWriter::new(file), value)?;
    info!("Wrote to {}", path.display());
    Ok(())
}

pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: std::io::Write,
    T: Serialize,
{
    let ron_config = ron::ser::PrettyConfig::default();
    ron::ser::to_writer_pretty(writer, &value, ron_config)?;
    Ok(())
}
