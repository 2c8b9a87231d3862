use cc_core::ports::Problem;
use cc_plot::{Figure, PlotConfig, PlotError, PlotRenderer};
use std::io::Write;

/// Render the optimum diagram, or the arbitrage diagram when `x0` is given
pub fn render(config: &PlotConfig, problem: &Problem, x0: Option<f64>) -> Result<Figure, PlotError> {
    let renderer = PlotRenderer::new(config.clone());
    match x0 {
        Some(x0) => renderer.arbitrage(&problem.budget, &problem.preferences, x0),
        None => Ok(renderer.optimum(&problem.budget, &problem.preferences)),
    }
}

pub fn write_svg(figure: &Figure, mut output: impl Write) -> anyhow::Result<()> {
    writeln!(output, "{figure}")?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_core::models::{Budget, Preferences};

    fn problem() -> Problem {
        Problem::new(
            Budget::new(1.0, 100.0).unwrap(),
            Preferences::new(0.4).unwrap(),
        )
    }

    #[test]
    fn renders_both_variants() {
        let config = PlotConfig::default();

        let optimum = render(&config, &problem(), None).unwrap();
        assert!(optimum.labels().any(|label| label.starts_with("Optimal bundle")));

        let arbitrage = render(&config, &problem(), Some(10.0)).unwrap();
        assert!(arbitrage.labels().any(|label| label.starts_with("MU0/p0")));

        assert!(render(&config, &problem(), Some(500.0)).is_err());
    }

    #[test]
    fn writes_svg_document() {
        let figure = render(&PlotConfig::default(), &problem(), None).unwrap();
        let mut buffer = Vec::new();
        write_svg(&figure, &mut buffer).unwrap();

        let svg = String::from_utf8(buffer).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
