//! SH Visualization

use pbrt_core::base::*;
use pbrt_core::geometry::*;
use pbrt_core::sh::*;
use itertools::iproduct;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Receives finished SH coefficients to turn them into something renderable.
/// Failures only affect the visualization, never the integration result.
pub trait VisualizationSink {
    /// Rebuilds the visualization.
    ///
    /// * `coefficients` - SH coefficients.
    /// * `bands`        - Number of SH bands.
    /// * `normalize`    - Whether to scale the plot to unit maximum radius.
    fn rebuild(&mut self, coefficients: &[Float], bands: usize, normalize: bool) -> Result<(), String>;
}

/// A triangle mesh of a spherical plot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShMesh {
    /// Vertex positions.
    pub positions: Vec<Point3f>,

    /// Triangles as vertex indices.
    pub triangles: Vec<[usize; 3]>,
}

impl ShMesh {
    /// Writes the mesh in Wavefront OBJ format.
    ///
    /// * `w` - The writer.
    pub fn write_obj<W: Write>(&self, w: &mut W) -> Result<(), String> {
        let result = (|| -> std::io::Result<()> {
            writeln!(w, "# SH plot: {} vertices, {} faces", self.positions.len(), self.triangles.len())?;
            for p in self.positions.iter() {
                writeln!(w, "v {} {} {}", p.x, p.y, p.z)?;
            }
            for t in self.triangles.iter() {
                writeln!(w, "f {} {} {}", t[0] + 1, t[1] + 1, t[2] + 1)?;
            }
            w.flush()
        })();
        result.map_err(|err| format!("Error writing OBJ. {}.", err))
    }

    /// Writes the mesh to an OBJ file.
    ///
    /// * `path` - The file path.
    pub fn save_obj(&self, path: &str) -> Result<(), String> {
        let file = File::create(path).map_err(|err| format!("Could not create {}. {}", path, err))?;
        self.write_obj(&mut BufWriter::new(file))
    }
}

/// Builds latitude/longitude spherical plots with radius `|f(d)|` of the
/// function encoded by SH coefficients.
pub struct ShMeshBuilder {
    /// The SH basis evaluator.
    basis: ArcShBasis,

    /// Number of latitude segments.
    n_theta: usize,

    /// Number of longitude segments.
    n_phi: usize,

    /// Optional OBJ output written on every rebuild.
    path: Option<String>,

    /// The last mesh built.
    mesh: Option<ShMesh>,
}

impl ShMeshBuilder {
    /// Create a new `ShMeshBuilder`.
    ///
    /// * `basis`   - The SH basis evaluator.
    /// * `n_theta` - Number of latitude segments (at least 2).
    /// * `n_phi`   - Number of longitude segments (at least 3).
    pub fn new(basis: ArcShBasis, n_theta: usize, n_phi: usize) -> Self {
        Self {
            basis,
            n_theta: max(n_theta, 2),
            n_phi: max(n_phi, 3),
            path: None,
            mesh: None,
        }
    }

    /// Writes every rebuilt mesh to an OBJ file.
    ///
    /// * `path` - The file path.
    pub fn with_obj_output(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    /// Returns the last mesh built.
    pub fn mesh(&self) -> Option<&ShMesh> {
        self.mesh.as_ref()
    }

    /// Builds the spherical plot.
    ///
    /// * `coefficients` - SH coefficients.
    /// * `bands`        - Number of SH bands.
    /// * `normalize`    - Whether to scale the plot to unit maximum radius.
    pub fn build(&self, coefficients: &[Float], bands: usize, normalize: bool) -> Result<ShMesh, String> {
        if coefficients.len() != sh_terms(bands) {
            return Err(format!(
                "Expected {} coefficients for {} bands, got {}.",
                sh_terms(bands),
                bands,
                coefficients.len()
            ));
        }
        if let Some(c) = coefficients.iter().find(|c| !c.is_finite()) {
            return Err(format!("Cannot plot non-finite coefficient {}.", c));
        }

        let mut y = vec![0.0; sh_terms(bands)];
        let mut directions = Vec::with_capacity((self.n_theta + 1) * self.n_phi);
        let mut radii = Vec::with_capacity(directions.capacity());
        for i in 0..=self.n_theta {
            let theta = PI * i as Float / self.n_theta as Float;
            for j in 0..self.n_phi {
                let phi = TWO_PI * j as Float / self.n_phi as Float;
                let d = Vector3f::new(sin(theta) * cos(phi), sin(theta) * sin(phi), cos(theta));
                self.basis.evaluate_into(bands, &d, &mut y);
                let f: Float = coefficients.iter().zip(y.iter()).map(|(c, y)| c * y).sum();
                directions.push(d);
                radii.push(abs(f));
            }
        }

        let max_radius = radii.iter().fold(0.0, |a: Float, b| max(a, *b));
        let scale = if normalize && max_radius > 0.0 { 1.0 / max_radius } else { 1.0 };
        let positions = directions
            .iter()
            .zip(radii.iter())
            .map(|(d, r)| Point3f::from(*d * (r * scale)))
            .collect();

        let mut triangles = Vec::with_capacity(2 * self.n_theta * self.n_phi);
        for (i, j) in iproduct!(0..self.n_theta, 0..self.n_phi) {
            let a = i * self.n_phi + j;
            let b = i * self.n_phi + (j + 1) % self.n_phi;
            let c = a + self.n_phi;
            let d = b + self.n_phi;
            triangles.push([a, c, b]);
            triangles.push([b, c, d]);
        }

        Ok(ShMesh { positions, triangles })
    }
}

impl VisualizationSink for ShMeshBuilder {
    fn rebuild(&mut self, coefficients: &[Float], bands: usize, normalize: bool) -> Result<(), String> {
        let mesh = self.build(coefficients, bands, normalize)?;
        if let Some(path) = self.path.as_ref() {
            mesh.save_obj(path)?;
            info!("Wrote SH plot to '{}'", path);
        }
        self.mesh = Some(mesh);
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
