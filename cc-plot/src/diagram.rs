use crate::svg::{Anchor, Canvas, Element, Figure, Point, palette};
use cc_core::models::{
    Arbitrage, Budget, Bundle, BundleError, Preferences, UtilityError, closed_form_demand,
};
use tracing::{Level, event};

/// Layout of the rendered diagrams.
///
/// The axis limits are fixed when given; otherwise each diagram scales its
/// axes to fit the budget line's intercepts.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlotConfig {
    /// Image width in pixels
    pub width: f64,
    /// Image height in pixels
    pub height: f64,
    /// Space around the plot area in pixels
    pub margin: f64,
    /// Fixed upper limit of the good-0 axis
    pub x_max: Option<f64>,
    /// Fixed upper limit of the good-1 axis
    pub y_max: Option<f64>,
    /// Number of points used to trace the indifference curve
    pub samples: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            margin: 56.0,
            x_max: None,
            y_max: None,
            samples: 200,
        }
    }
}

impl PlotConfig {
    /// Check that the layout leaves room for a plot area
    pub fn validate(&self) -> Result<(), PlotError> {
        let invalid = |reason| Err(PlotError::Layout(reason));
        if ![self.width, self.height, self.margin]
            .iter()
            .all(|value| value.is_finite())
        {
            return invalid("width, height and margin must be finite");
        }
        if self.margin < 0.0 {
            return invalid("margin must not be negative");
        }
        if self.width <= 2.0 * self.margin || self.height <= 2.0 * self.margin {
            return invalid("width and height must exceed twice the margin");
        }
        if self.samples < 2 {
            return invalid("samples must be at least 2");
        }
        for limit in [self.x_max, self.y_max].into_iter().flatten() {
            if !limit.is_finite() || limit <= 0.0 {
                return invalid("axis limits must be positive");
            }
        }
        Ok(())
    }
}

// Headroom above the budget intercepts when the axes are fitted automatically.
const HEADROOM: f64 = 1.1;

/// Renders budget-line and indifference-curve diagrams.
///
/// Every call is a pure function of its inputs; nothing is retained between
/// renders.
#[derive(Clone, Debug, Default)]
pub struct PlotRenderer {
    config: PlotConfig,
}

impl PlotRenderer {
    /// Create a renderer with the given layout
    pub fn new(config: PlotConfig) -> Self {
        Self { config }
    }

    /// The layout in use
    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Diagram of the utility-maximizing bundle for a budget
    pub fn optimum(&self, budget: &Budget, preferences: &Preferences) -> Figure {
        let demand = closed_form_demand(budget, preferences);
        let mut figure = self.base(budget);

        self.draw_indifference(&mut figure, preferences, demand.utility);
        draw_bundle(&mut figure, &demand.bundle);

        let title = format!(
            "Optimal bundle ({:.2}, {:.2}), utility {:.3}",
            demand.bundle.x0(),
            demand.bundle.x1(),
            demand.utility
        );
        self.annotate(&mut figure, budget, preferences, title, None);
        figure
    }

    /// Diagram of the bundle on the budget line with `x0` units of good 0,
    /// annotated with the comparison of marginal utilities per price.
    ///
    /// # Errors
    ///
    /// Fails if the bundle is not in the interior of the consumption set,
    /// i.e. unless `0 < x0 < income / price`.
    pub fn arbitrage(
        &self,
        budget: &Budget,
        preferences: &Preferences,
        x0: f64,
    ) -> Result<Figure, PlotError> {
        let bundle = budget.bundle_at(x0)?;
        let arbitrage = Arbitrage::evaluate(&bundle, budget, preferences)?;
        let utility = preferences.utility(&bundle)?;

        let mut figure = self.base(budget);
        self.draw_indifference(&mut figure, preferences, utility);
        draw_bundle(&mut figure, &bundle);

        let title = format!(
            "Bundle ({:.2}, {:.2}), utility {:.3}",
            bundle.x0(),
            bundle.x1(),
            utility
        );
        self.annotate(&mut figure, budget, preferences, title, Some(&arbitrage));

        event!(Level::DEBUG, x0, %arbitrage, "rendered arbitrage diagram");
        Ok(figure)
    }

    fn canvas(&self, budget: &Budget) -> Canvas {
        let fit = |limit: Option<f64>, intercept: f64| {
            limit
                .filter(|limit| *limit > 0.0)
                .unwrap_or_else(|| (HEADROOM * intercept).max(1.0))
        };

        Canvas {
            width: self.config.width,
            height: self.config.height,
            margin: self.config.margin,
            x_max: fit(self.config.x_max, budget.max_x0()),
            y_max: fit(self.config.y_max, budget.income()),
        }
    }

    /// A figure with the shaded budget set and the budget line
    fn base(&self, budget: &Budget) -> Figure {
        let canvas = self.canvas(budget);
        let mut figure = Figure::new(canvas);

        // The budget line enters through the left edge or the top, and leaves
        // through the horizontal axis or the right edge. Both ends are computed
        // exactly, so no clipping of rounded values is needed.
        let (price, income) = (budget.price(), budget.income());
        let enter = if income > canvas.y_max {
            ((income - canvas.y_max) / price, canvas.y_max)
        } else {
            (0.0, income)
        };
        let leave = if budget.max_x0() > canvas.x_max {
            (canvas.x_max, (income - price * canvas.x_max).clamp(0.0, canvas.y_max))
        } else {
            (budget.max_x0(), 0.0)
        };

        // Everything is affordable when the line passes above the top-right corner
        if enter.0 >= canvas.x_max {
            figure.push(Element::Area {
                points: vec![
                    (0.0, 0.0),
                    (0.0, canvas.y_max),
                    (canvas.x_max, canvas.y_max),
                    (canvas.x_max, 0.0),
                ],
                fill: palette::BUDGET_SET,
                opacity: 0.5,
            });
            return figure;
        }

        let mut area = vec![(0.0, 0.0), (0.0, enter.1)];
        if enter.0 > 0.0 {
            area.push(enter);
        }
        area.push(leave);
        if leave.1 > 0.0 {
            area.push((leave.0, 0.0));
        }
        figure.push(Element::Area {
            points: area,
            fill: palette::BUDGET_SET,
            opacity: 0.5,
        });

        figure.push(Element::Line {
            points: vec![enter, leave],
            stroke: palette::BUDGET,
            width: 2.0,
            dashed: false,
        });

        figure
    }

    /// Trace the indifference curve at the target utility across the visible
    /// domain, starting where it enters through the top of the plot
    fn draw_indifference(&self, figure: &mut Figure, preferences: &Preferences, target: f64) {
        if target.is_nan() || target <= 0.0 {
            return;
        }
        let canvas = figure.canvas;

        // Solve u(x, y_max) = target for x
        let a = preferences.share();
        let enter = (target / canvas.y_max.powf(1.0 - a)).powf(1.0 / a);
        if enter.is_nan() || enter >= canvas.x_max {
            return;
        }

        let n = self.config.samples.max(2);
        let points: Vec<Point> = (0..n)
            .map(|i| enter + (canvas.x_max - enter) * i as f64 / (n - 1) as f64)
            .filter_map(|x| {
                preferences
                    .indifference_curve(x, target)
                    .ok()
                    .map(|y| (x, y.min(canvas.y_max)))
            })
            .collect();

        figure.push(Element::Line {
            points,
            stroke: palette::INDIFFERENCE,
            width: 2.0,
            dashed: false,
        });
    }

    fn annotate(
        &self,
        figure: &mut Figure,
        budget: &Budget,
        preferences: &Preferences,
        title: String,
        arbitrage: Option<&Arbitrage>,
    ) {
        let canvas = figure.canvas;
        let center = canvas.width / 2.0;
        let left = canvas.px(0.0);
        let bottom = canvas.py(0.0);

        figure.push(Element::Label {
            x: center,
            y: canvas.margin / 2.0,
            text: title,
            anchor: Anchor::Middle,
            size: 15.0,
        });
        figure.push(Element::Label {
            x: center,
            y: canvas.height - canvas.margin / 4.0,
            text: "good 0 (x0)".into(),
            anchor: Anchor::Middle,
            size: 12.0,
        });
        figure.push(Element::Label {
            x: left,
            y: canvas.margin - 8.0,
            text: "good 1 (x1)".into(),
            anchor: Anchor::Middle,
            size: 12.0,
        });

        // Axis limits
        figure.push(Element::Label {
            x: canvas.px(canvas.x_max),
            y: bottom + 16.0,
            text: format!("{:.0}", canvas.x_max),
            anchor: Anchor::Middle,
            size: 11.0,
        });
        figure.push(Element::Label {
            x: left - 6.0,
            y: canvas.py(canvas.y_max) + 4.0,
            text: format!("{:.0}", canvas.y_max),
            anchor: Anchor::End,
            size: 11.0,
        });

        // Parameters
        let right = canvas.px(canvas.x_max);
        let top = canvas.py(canvas.y_max);
        let parameters = [
            format!("p = {:.2}, m = {:.0}", budget.price(), budget.income()),
            format!("a = {:.2}", preferences.share()),
        ];
        for (i, text) in parameters.into_iter().enumerate() {
            figure.push(Element::Label {
                x: right,
                y: top + 16.0 * (i + 1) as f64,
                text,
                anchor: Anchor::End,
                size: 12.0,
            });
        }

        if let Some(arbitrage) = arbitrage {
            figure.push(Element::Label {
                x: right,
                y: top + 56.0,
                text: arbitrage.to_string(),
                anchor: Anchor::End,
                size: 13.0,
            });
            figure.push(Element::Label {
                x: right,
                y: top + 74.0,
                text: arbitrage.advice().into(),
                anchor: Anchor::End,
                size: 12.0,
            });
        }
    }
}

/// Dashed guides from both axes to the bundle, and a marker on it
fn draw_bundle(figure: &mut Figure, bundle: &Bundle) {
    let at = (bundle.x0(), bundle.x1());
    if !figure.canvas.contains(at) {
        return;
    }

    for guide in [vec![(at.0, 0.0), at], vec![(0.0, at.1), at]] {
        figure.push(Element::Line {
            points: guide,
            stroke: palette::BUNDLE,
            width: 1.0,
            dashed: true,
        });
    }
    figure.push(Element::Marker {
        at,
        fill: palette::BUNDLE,
        radius: 5.0,
    });
}

/// Errors that can occur when rendering a diagram
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PlotError {
    /// The requested bundle is not a valid bundle on the budget line
    #[error(transparent)]
    Bundle(#[from] BundleError),
    /// Utility is undefined at the requested bundle
    #[error(transparent)]
    Utility(#[from] UtilityError),
    /// The layout leaves no room to plot
    #[error("Invalid plot layout: {0}")]
    Layout(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    fn lines(figure: &Figure) -> Vec<&Vec<Point>> {
        figure
            .elements
            .iter()
            .filter_map(|element| match element {
                Element::Line { points, .. } => Some(points),
                _ => None,
            })
            .collect()
    }

    fn markers(figure: &Figure) -> Vec<Point> {
        figure
            .elements
            .iter()
            .filter_map(|element| match element {
                Element::Marker { at, .. } => Some(*at),
                _ => None,
            })
            .collect()
    }

    fn inputs(price: f64, income: f64, share: f64) -> (Budget, Preferences) {
        (
            Budget::new(price, income).unwrap(),
            Preferences::new(share).unwrap(),
        )
    }

    #[test]
    fn optimum_marks_demand() {
        let (budget, prefs) = inputs(1.0, 100.0, 0.4);
        let figure = PlotRenderer::default().optimum(&budget, &prefs);

        let marks = markers(&figure);
        assert_eq!(marks.len(), 1);
        assert_abs_diff_eq!(marks[0].0, 40.0, epsilon = 1e-9);
        assert_abs_diff_eq!(marks[0].1, 60.0, epsilon = 1e-9);

        // budget line, indifference curve, and two guides
        assert_eq!(lines(&figure).len(), 4);
        assert!(figure.labels().any(|label| label.contains("(40.00, 60.00)")));
    }

    #[test]
    fn budget_line_spans_intercepts_with_auto_axes() {
        let (budget, prefs) = inputs(2.0, 100.0, 0.5);
        let figure = PlotRenderer::default().optimum(&budget, &prefs);

        let budget_line = lines(&figure)[0];
        assert_eq!(budget_line.first(), Some(&(0.0, 100.0)));
        assert_eq!(budget_line.last(), Some(&(50.0, 0.0)));
        assert_abs_diff_eq!(figure.canvas.x_max, 55.0, epsilon = 1e-9);
        assert_abs_diff_eq!(figure.canvas.y_max, 110.0, epsilon = 1e-9);
    }

    #[test]
    fn budget_line_is_clipped_to_fixed_axes() {
        let renderer = PlotRenderer::new(PlotConfig {
            x_max: Some(40.0),
            y_max: Some(80.0),
            ..Default::default()
        });
        let (budget, prefs) = inputs(1.0, 100.0, 0.5);
        let figure = renderer.optimum(&budget, &prefs);

        // Enters through the top at x = 20, leaves through the right at y = 60
        let budget_line = lines(&figure)[0];
        assert_eq!(budget_line, &vec![(20.0, 80.0), (40.0, 60.0)]);

        // The optimum (50, 50) is off the plot, so no marker is drawn
        assert!(markers(&figure).is_empty());
    }

    #[rstest]
    #[case(1.0, 100.0, 0.4)]
    #[case(0.2, 50.0, 0.1)]
    #[case(2.0, 200.0, 0.9)]
    fn indifference_curve_stays_on_level_set(
        #[case] price: f64,
        #[case] income: f64,
        #[case] share: f64,
    ) {
        let (budget, prefs) = inputs(price, income, share);
        let figure = PlotRenderer::default().optimum(&budget, &prefs);
        let target = closed_form_demand(&budget, &prefs).utility;

        let curve = lines(&figure)[1];
        assert!(curve.len() > 2);
        for &(x, y) in curve.iter().skip(1) {
            assert!(figure.canvas.contains((x, y)));
            let bundle = Bundle::new(x, y).unwrap();
            assert_abs_diff_eq!(prefs.utility(&bundle).unwrap(), target, epsilon = 1e-6 * target);
        }
    }

    #[test]
    fn arbitrage_annotates_comparison() {
        let (budget, prefs) = inputs(1.0, 100.0, 0.4);
        let renderer = PlotRenderer::default();

        let comparison = |figure: &Figure| {
            figure
                .labels()
                .find(|label| label.starts_with("MU0/p0"))
                .map(str::to_owned)
                .unwrap()
        };

        let figure = renderer.arbitrage(&budget, &prefs, 20.0).unwrap();
        assert!(comparison(&figure).contains(" > MU1/p1"));
        assert!(figure.to_string().contains("&gt;"));

        let figure = renderer.arbitrage(&budget, &prefs, 70.0).unwrap();
        assert!(comparison(&figure).contains(" < MU1/p1"));

        let figure = renderer.arbitrage(&budget, &prefs, 40.0).unwrap();
        assert!(comparison(&figure).contains(" = MU1/p1"));
    }

    // Every price and income a slider can reach, with fitted and fixed axes
    #[rstest]
    #[case::fitted(PlotConfig::default())]
    #[case::fixed(PlotConfig { x_max: Some(250.0), y_max: Some(220.0), ..Default::default() })]
    fn budget_line_is_drawn_across_slider_grid(#[case] config: PlotConfig) {
        let renderer = PlotRenderer::new(config);
        for i in 0..=18 {
            for j in 0..=15 {
                let price = 0.2 + 0.1 * i as f64;
                let income = 50.0 + 10.0 * j as f64;
                let (budget, prefs) = inputs(price, income, 0.4);
                let figure = renderer.optimum(&budget, &prefs);

                let line = lines(&figure)[0];
                assert_eq!(line.len(), 2, "p={price} m={income}");
                assert!(line.iter().all(|&point| figure.canvas.contains(point)));

                // It starts on the left edge or the top, and ends on the
                // horizontal axis or the right edge
                let (start, end) = (line[0], line[1]);
                assert!(start.0 == 0.0 || start.1 == figure.canvas.y_max);
                assert!(end.1 == 0.0 || end.0 == figure.canvas.x_max);
                assert_abs_diff_eq!(start.1, budget.budget_line(start.0), epsilon = 1e-9);
                assert_abs_diff_eq!(end.1, budget.budget_line(end.0), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn line_above_the_plot_shades_everything() {
        let renderer = PlotRenderer::new(PlotConfig {
            x_max: Some(10.0),
            y_max: Some(10.0),
            ..Default::default()
        });
        let (budget, prefs) = inputs(1.0, 100.0, 0.5);
        let figure = renderer.optimum(&budget, &prefs);

        let area = figure.elements.iter().find_map(|element| match element {
            Element::Area { points, .. } => Some(points.len()),
            _ => None,
        });
        assert_eq!(area, Some(4));
        assert!(markers(&figure).is_empty());
    }

    #[test]
    fn arbitrage_rejects_boundary_bundles() {
        let (budget, prefs) = inputs(1.0, 100.0, 0.4);
        let renderer = PlotRenderer::default();

        assert_eq!(
            renderer.arbitrage(&budget, &prefs, 0.0).unwrap_err(),
            PlotError::Utility(UtilityError::NonPositiveQuantity)
        );
        assert_eq!(
            renderer.arbitrage(&budget, &prefs, 120.0).unwrap_err(),
            PlotError::Bundle(BundleError::Negative)
        );
    }

    #[test]
    fn default_layout_is_valid() {
        assert_eq!(PlotConfig::default().validate(), Ok(()));
    }

    #[rstest]
    #[case::narrow(PlotConfig { width: 100.0, ..Default::default() })]
    #[case::flat(PlotConfig { height: 112.0, ..Default::default() })]
    #[case::negative_margin(PlotConfig { margin: -1.0, ..Default::default() })]
    #[case::infinite(PlotConfig { width: f64::INFINITY, ..Default::default() })]
    #[case::one_sample(PlotConfig { samples: 1, ..Default::default() })]
    #[case::zero_axis(PlotConfig { x_max: Some(0.0), ..Default::default() })]
    #[case::nan_axis(PlotConfig { y_max: Some(f64::NAN), ..Default::default() })]
    fn rejects_degenerate_layouts(#[case] config: PlotConfig) {
        assert!(matches!(config.validate(), Err(PlotError::Layout(_))));
    }

    #[test]
    fn zero_income_renders() {
        let (budget, prefs) = inputs(1.0, 0.0, 0.4);
        let svg = PlotRenderer::default().optimum(&budget, &prefs).to_string();
        assert!(svg.ends_with("</svg>"));
    }
}
