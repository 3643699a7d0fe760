//! Command line options

use clap::Parser;
use pbrt_core::base::*;
use integrators::*;
use std::time::Duration;

/// Options of the demo scene integration.
#[derive(Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Options {
    /// Integration method name.
    #[clap(
        long = "method",
        short = 'm',
        value_name = "NAME",
        default_value = "angular",
        help = "Integration method: mc-unit, mc-world, angular, spherical-rect, ltc, five-point, mrp, planar-bary, planar-unit or zonal."
    )]
    pub method: String,

    /// BRDF lobes.
    #[clap(
        long = "brdf",
        short = 'b',
        value_name = "NAME",
        default_value = "diffuse",
        help = "BRDF lobes: none, diffuse, ggx or both."
    )]
    pub brdf: String,

    /// Sample budget per light.
    #[clap(
        long = "samples",
        short = 's',
        value_name = "NUM",
        default_value_t = 1024,
        help = "Number of samples per light for the sampling methods."
    )]
    pub samples: usize,

    /// GGX roughness.
    #[clap(
        long = "roughness",
        short = 'r',
        value_name = "FLOAT",
        default_value_t = 0.5,
        help = "GGX roughness in [0, 1]."
    )]
    pub roughness: Float,

    /// Number of SH bands.
    #[clap(
        long = "bands",
        short = 'l',
        value_name = "NUM",
        default_value_t = 3,
        help = "Number of SH bands; the projection has bands² coefficients."
    )]
    pub bands: usize,

    /// Random number generator seed.
    #[clap(long = "seed", value_name = "NUM", default_value_t = 0, help = "Seed of the random sampling methods.")]
    pub seed: u64,

    /// Normalize the SH plot.
    #[clap(long, help = "Scale the SH plot to unit maximum radius.")]
    pub normalize: bool,

    /// LTC matrix table.
    #[clap(
        long = "ltc-matrix",
        value_name = "FILE",
        requires = "ltc_amplitude",
        help = "Little endian f32 file with the 32x32 LTC inverse matrices (a, b, c, d)."
    )]
    pub ltc_matrix: Option<String>,

    /// LTC amplitude table.
    #[clap(
        long = "ltc-amplitude",
        value_name = "FILE",
        requires = "ltc_matrix",
        help = "Little endian f32 file with the 32x32 LTC amplitudes (norm, fresnel)."
    )]
    pub ltc_amplitude: Option<String>,

    /// Path to the OBJ plot.
    #[clap(long = "mesh", short = 'o', value_name = "FILE", help = "Write the SH plot to the given OBJ file.")]
    pub mesh_file: Option<String>,

    /// Run the convergence study instead of the integration.
    #[clap(long, help = "Compare angular stratification against random sampling at increasing sample counts.")]
    pub converge: bool,

    /// Convergence time budget.
    #[clap(
        long = "time-budget",
        value_name = "SECS",
        help = "Stop the convergence study once the given number of seconds is used up."
    )]
    pub time_budget: Option<f64>,
}

impl Options {
    /// Returns the integration settings.
    pub fn config(&self) -> Result<ShIntegrationConfig, String> {
        let method = self.method.parse::<IntegrationMethod>()?;
        let brdf = self.brdf.parse::<Brdf>()?;
        if self.bands == 0 {
            return Err("At least one SH band is required.".to_string());
        }
        if self.seed != 0 && !method.is_stochastic() {
            warn!("Seed {} has no effect on deterministic method {}", self.seed, method);
        }
        if !(0.0..=1.0).contains(&self.roughness) {
            warn!("Roughness {} clamped to [0, 1]", self.roughness);
        }
        Ok(ShIntegrationConfig {
            method,
            brdf,
            samples: self.samples,
            roughness: clamp(self.roughness, 0.0, 1.0),
            bands: self.bands,
            normalize: self.normalize,
            seed: self.seed,
            ..Default::default()
        })
    }

    /// Returns the convergence time budget.
    pub fn time_budget(&self) -> Result<Option<Duration>, String> {
        match self.time_budget {
            None => Ok(None),
            Some(secs) if secs.is_finite() && secs > 0.0 => Ok(Some(Duration::from_secs_f64(secs))),
            Some(secs) => Err(format!("Invalid time budget {} seconds.", secs)),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = Options::try_parse_from(["sh-area-lights"]).unwrap();
        let config = options.config().unwrap();
        assert_eq!(config.method, IntegrationMethod::AngularStratification);
        assert_eq!(config.brdf, Brdf::DIFFUSE);
        assert_eq!(config.samples, 1024);
        assert_eq!(config.bands, 3);
        assert!(options.time_budget().unwrap().is_none());
    }

    #[test]
    fn parses_method_and_brdf() {
        let options = Options::try_parse_from([
            "sh-area-lights",
            "--method",
            "ltc",
            "--brdf",
            "both",
            "--bands",
            "4",
            "--roughness",
            "2.0",
            "--time-budget",
            "1.5",
            "--seed",
            "7",
        ])
        .unwrap();
        let config = options.config().unwrap();
        assert_eq!(config.method, IntegrationMethod::Ltc);
        assert_eq!(config.brdf, Brdf::BOTH);
        assert_eq!(config.bands, 4);
        assert_eq!(config.roughness, 1.0);
        assert_eq!(config.seed, 7);
        assert_eq!(options.time_budget().unwrap(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn rejects_unknown_names() {
        let options = Options::try_parse_from(["sh-area-lights", "--method", "raytrace"]).unwrap();
        assert!(options.config().is_err());
        let options = Options::try_parse_from(["sh-area-lights", "--brdf", "phong"]).unwrap();
        assert!(options.config().is_err());
        let options = Options::try_parse_from(["sh-area-lights", "--bands", "0"]).unwrap();
        assert!(options.config().is_err());
    }

    #[test]
    fn ltc_files_come_in_pairs() {
        assert!(Options::try_parse_from(["sh-area-lights", "--ltc-matrix", "m.bin"]).is_err());
        assert!(Options::try_parse_from(["sh-area-lights", "--ltc-matrix", "m.bin", "--ltc-amplitude", "a.bin"]).is_ok());
    }
}
