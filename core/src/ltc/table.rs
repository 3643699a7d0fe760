//! LTC Lookup Tables

use crate::base::*;
use crate::geometry::*;
use byteorder::{LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{BufReader, Read};

/// Resolution of both lookup tables along each axis.
pub const LTC_LUT_SIZE: usize = 32;

/// Number of texels in one table.
const LTC_TEXELS: usize = LTC_LUT_SIZE * LTC_LUT_SIZE;

/// Fitted LTC data indexed by `(roughness, view angle)`.
///
/// Each matrix texel stores `(a, b, c, d)` of the inverse transform
/// `[[a, 0, c], [0, 1, 0], [b, 0, d]]`. Each amplitude texel stores the BRDF
/// norm and its Fresnel term.
#[derive(Clone, Debug)]
pub struct LtcTable {
    matrix: Vec<[Float; 4]>,
    amplitude: Vec<[Float; 2]>,
}

impl LtcTable {
    /// Returns a table whose every texel is the identity transform with unit
    /// norm, i.e. a clamped cosine lobe.
    pub fn identity() -> Self {
        Self {
            matrix: vec![[1.0, 0.0, 0.0, 1.0]; LTC_TEXELS],
            amplitude: vec![[1.0, 0.0]; LTC_TEXELS],
        }
    }

    /// Create a new `LtcTable` from texel arrays in row-major order, rows
    /// indexed by view angle.
    ///
    /// * `matrix`    - 32x32 texels of `(a, b, c, d)`.
    /// * `amplitude` - 32x32 texels of `(norm, fresnel)`.
    pub fn new(matrix: Vec<[Float; 4]>, amplitude: Vec<[Float; 2]>) -> Result<Self, String> {
        if matrix.len() != LTC_TEXELS {
            return Err(format!(
                "LTC matrix table has {} texels. Expected {}.",
                matrix.len(),
                LTC_TEXELS
            ));
        }
        if amplitude.len() != LTC_TEXELS {
            return Err(format!(
                "LTC amplitude table has {} texels. Expected {}.",
                amplitude.len(),
                LTC_TEXELS
            ));
        }
        let finite = matrix.iter().flatten().chain(amplitude.iter().flatten()).all(|v| v.is_finite());
        if !finite {
            return Err("LTC tables contain non-finite values.".to_string());
        }
        Ok(Self { matrix, amplitude })
    }

    /// Reads both tables from streams of little-endian `f32` values.
    ///
    /// * `matrix`    - Stream with 32x32x4 values.
    /// * `amplitude` - Stream with 32x32x2 values.
    pub fn from_reader<R1: Read, R2: Read>(matrix: &mut R1, amplitude: &mut R2) -> Result<Self, String> {
        let m = read_f32_vec(matrix, LTC_TEXELS * 4)?;
        let a = read_f32_vec(amplitude, LTC_TEXELS * 2)?;
        Self::new(
            m.chunks_exact(4).map(|c| [c[0], c[1], c[2], c[3]]).collect(),
            a.chunks_exact(2).map(|c| [c[0], c[1]]).collect(),
        )
    }

    /// Loads both tables from binary files.
    ///
    /// * `matrix_path`    - Path to the matrix table.
    /// * `amplitude_path` - Path to the amplitude table.
    pub fn from_files(matrix_path: &str, amplitude_path: &str) -> Result<Self, String> {
        let mut matrix = BufReader::new(open_file(matrix_path)?);
        let mut amplitude = BufReader::new(open_file(amplitude_path)?);
        let table = Self::from_reader(&mut matrix, &mut amplitude)?;
        info!("Loaded LTC tables from '{}' and '{}'", matrix_path, amplitude_path);
        Ok(table)
    }

    /// Returns the texel coordinates for a view angle and roughness.
    ///
    /// * `cos_theta` - Cosine of the angle between normal and view direction.
    /// * `roughness` - Roughness parameter value in [0, 1].
    pub fn ltc_coords(cos_theta: Float, roughness: Float) -> Point2f {
        let theta = safe_acos(cos_theta);
        let scale = (LTC_LUT_SIZE - 1) as Float;
        Point2f::new(
            clamp(roughness, 0.0, 1.0) * scale,
            clamp(theta / PI_OVER_TWO, 0.0, 1.0) * scale,
        )
    }

    /// Returns the inverse LTC matrix at the given texel coordinates.
    ///
    /// * `coords` - Texel coordinates from `ltc_coords`.
    pub fn ltc_matrix(&self, coords: &Point2f) -> Matrix3x3 {
        let [a, b, c, d] = bilinear_lookup(&self.matrix, coords);
        Matrix3x3::new([[a, 0.0, c], [0.0, 1.0, 0.0], [b, 0.0, d]])
    }

    /// Returns the `(norm, fresnel)` pair at the given texel coordinates.
    ///
    /// * `coords` - Texel coordinates from `ltc_coords`.
    pub fn ltc_amplitude(&self, coords: &Point2f) -> (Float, Float) {
        let [norm, fresnel] = bilinear_lookup(&self.amplitude, coords);
        (norm, fresnel)
    }
}

/// Bilinearly interpolates a 32x32 table at coordinates given in texel units.
/// Coordinates outside the table clamp to the border.
///
/// * `data`   - Row-major texels.
/// * `coords` - `(column, row)` in texel units.
pub fn bilinear_lookup<const N: usize>(data: &[[Float; N]], coords: &Point2f) -> [Float; N] {
    let last = (LTC_LUT_SIZE - 1) as Float;
    let x = clamp(coords.x, 0.0, last);
    let y = clamp(coords.y, 0.0, last);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = min(x0 + 1, LTC_LUT_SIZE - 1);
    let y1 = min(y0 + 1, LTC_LUT_SIZE - 1);
    let fx = x - x0 as Float;
    let fy = y - y0 as Float;

    let t00 = &data[y0 * LTC_LUT_SIZE + x0];
    let t10 = &data[y0 * LTC_LUT_SIZE + x1];
    let t01 = &data[y1 * LTC_LUT_SIZE + x0];
    let t11 = &data[y1 * LTC_LUT_SIZE + x1];

    let mut out = [0.0; N];
    for i in 0..N {
        let top = t00[i] * (1.0 - fx) + t10[i] * fx;
        let bottom = t01[i] * (1.0 - fx) + t11[i] * fx;
        out[i] = top * (1.0 - fy) + bottom * fy;
    }
    out
}

/// Opens a file for reading or returns an error if unable to do so.
///
/// * `path` - The file path.
fn open_file(path: &str) -> Result<File, String> {
    match File::open(path) {
        Ok(file) => Ok(file),
        Err(err) => Err(format!("Could not open {}. {}", path, err)),
    }
}

/// Reads given number of little-endian 32-bit floating point values.
///
/// * `reader` - The input stream.
/// * `count`  - Number of values to read.
fn read_f32_vec<R: Read>(reader: &mut R, count: usize) -> Result<Vec<f32>, String> {
    let mut values = vec![0.0_f32; count];
    match reader.read_f32_into::<LittleEndian>(&mut values) {
        Ok(_) => Ok(values),
        Err(err) => Err(format!("Error reading {} f32 values. {:}.", count, err)),
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
