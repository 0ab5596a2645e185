use crate::math::fit_scale;
use crate::render::RenderParams;
use crate::state::SpringParams;
use clap::Parser;
use std::time::Duration;

/// A single undamped spring bouncing in the terminal.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Milliseconds between simulation ticks.
    #[arg(short('i'), long, default_value = "50", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: u64,

    /// Hooke's constant; the mass is normalized to 1.
    #[arg(short('k'), long, default_value = "0.15", value_parser = parse_finite, allow_negative_numbers = true)]
    pub spring_constant: f64,

    /// Resting height of the spring tip above the ground.
    #[arg(short('e'), long, default_value = "300", value_parser = parse_finite, allow_negative_numbers = true)]
    pub equilibrium: f64,

    /// Offset from equilibrium the tip is released at.
    #[arg(short('d'), long, default_value = "75", value_parser = parse_finite, allow_negative_numbers = true)]
    pub displacement: f64,

    /// Number of coil segments drawn between the ground and the tip.
    #[arg(short('c'), long, default_value = "10", value_parser = clap::value_parser!(u32).range(2..))]
    pub coils: u32,

    /// Sideways excursion of each coil.
    #[arg(short('r'), long, default_value = "40", value_parser = parse_finite, allow_negative_numbers = true)]
    pub coil_radius: f64,

    /// Radius of the mass at the spring tip.
    #[arg(long, default_value = "30", value_parser = parse_non_negative)]
    pub tip_radius: f64,

    /// Stroke width of the coil.
    #[arg(long, default_value = "5", value_parser = parse_non_negative)]
    pub stroke_width: f64,

    /// Pixels per simulation unit. Fits the motion into the upper half of the
    /// terminal when omitted.
    #[arg(short('s'), long, value_parser = parse_positive)]
    pub scale: Option<f64>,

    /// Start with the debug overlay visible.
    #[arg(long)]
    pub debug: bool,

    /// Run without a terminal UI: advance this many ticks and print
    /// `tick,position,velocity` rows to stdout.
    #[arg(short('t'), long)]
    pub ticks: Option<u64>,
}

impl Args {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn spring_params(&self) -> SpringParams {
        SpringParams {
            spring_constant: self.spring_constant,
            equilibrium: self.equilibrium,
            initial_displacement: self.displacement,
        }
    }

    pub fn render_params(&self) -> RenderParams {
        RenderParams {
            coil_radius: self.coil_radius,
            coil_count: self.coils,
            tip_radius: self.tip_radius,
            stroke_width: self.stroke_width,
            ..RenderParams::default()
        }
    }

    /// Pixels per unit for a surface `height` pixels tall.
    ///
    /// Without an explicit scale, the rest height plus twice the initial
    /// displacement and the tip radius fit in the upper half.
    pub fn scale_for(&self, height: f64) -> f64 {
        self.scale.unwrap_or_else(|| {
            let extent = self.equilibrium.abs() + 2.0 * self.displacement.abs() + self.tip_radius;
            fit_scale(height / 2.0, extent)
        })
    }
}

fn parse_finite(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("`{s}` is not a number: {e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("`{s}` must be finite"))
    }
}

fn parse_non_negative(s: &str) -> Result<f64, String> {
    let value = parse_finite(s)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("`{s}` must not be negative"))
    }
}

fn parse_positive(s: &str) -> Result<f64, String> {
    let value = parse_finite(s)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(format!("`{s}` must be positive"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Args {
        Args::parse_from(["springview"])
    }

    #[test]
    fn defaults_match_the_classic_demo() {
        let args = defaults();
        assert_eq!(args.interval(), Duration::from_millis(50));
        assert_eq!(args.spring_params(), SpringParams::default());
        assert_eq!(args.render_params(), RenderParams::default());
        assert!(!args.debug);
        assert_eq!(args.ticks, None);
    }

    #[test]
    fn overrides_are_applied() {
        let args = Args::try_parse_from([
            "springview", "-k", "0.5", "-e", "100", "-d", "-20", "-c", "4", "--ticks", "12",
        ])
        .unwrap();
        let spring = args.spring_params();
        assert_eq!(spring.spring_constant, 0.5);
        assert_eq!(spring.equilibrium, 100.0);
        assert_eq!(spring.initial_displacement, -20.0);
        assert_eq!(args.render_params().coil_count, 4);
        assert_eq!(args.ticks, Some(12));
    }

    #[test]
    fn rejects_degenerate_values() {
        assert!(Args::try_parse_from(["springview", "--coils", "1"]).is_err());
        assert!(Args::try_parse_from(["springview", "--interval-ms", "0"]).is_err());
        assert!(Args::try_parse_from(["springview", "-k", "NaN"]).is_err());
        assert!(Args::try_parse_from(["springview", "-e", "inf"]).is_err());
        assert!(Args::try_parse_from(["springview", "--scale", "0"]).is_err());
        assert!(Args::try_parse_from(["springview", "--tip-radius", "-1"]).is_err());
    }

    #[test]
    fn auto_scale_fits_upper_half() {
        let args = defaults();
        // 300 + 2 * 75 + 30 units into 24 pixels
        assert_eq!(args.scale_for(48.0), 24.0 / 480.0);

        let args = Args::try_parse_from(["springview", "--scale", "2"]).unwrap();
        assert_eq!(args.scale_for(48.0), 2.0);
    }
}
