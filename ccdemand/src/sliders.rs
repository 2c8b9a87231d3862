//! Slider ranges and the events that move them.
//!
//! `explore` emulates an interactive surface with one slider per parameter.
//! Each slider has a closed range and a step; values are snapped to the step
//! the way a UI slider would.

use cc_core::models::{Budget, BudgetError, BundleError, Preferences, PreferencesError};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The sliders a user can move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slider {
    Price,
    Income,
    Share,
    /// Quantity of good 0 in the evaluated bundle; its range follows the
    /// budget line rather than the configuration
    X0,
}

impl Slider {
    pub fn name(&self) -> &'static str {
        match self {
            Slider::Price => "price",
            Slider::Income => "income",
            Slider::Share => "share",
            Slider::X0 => "x0",
        }
    }
}

impl fmt::Display for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Slider {
    type Err = ExploreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "price" | "p" => Ok(Slider::Price),
            "income" | "m" => Ok(Slider::Income),
            "share" | "a" => Ok(Slider::Share),
            "x0" => Ok(Slider::X0),
            _ => Err(ExploreError::UnknownSlider(s.to_owned())),
        }
    }
}

/// A closed range of slider positions, discretized by `step`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub initial: f64,
}

impl SliderRange {
    pub const fn new(min: f64, max: f64, step: f64, initial: f64) -> Self {
        Self {
            min,
            max,
            step,
            initial,
        }
    }

    fn validate(&self, slider: Slider) -> Result<(), ExploreError> {
        let invalid = |reason| Err(ExploreError::InvalidRange { slider, reason });
        if ![self.min, self.max, self.step, self.initial]
            .iter()
            .all(|value| value.is_finite())
        {
            return invalid("bounds must be finite");
        }
        if self.min >= self.max {
            return invalid("min must be below max");
        }
        if self.step <= 0.0 {
            return invalid("step must be positive");
        }
        if self.initial < self.min || self.initial > self.max {
            return invalid("initial value must lie within the range");
        }
        Ok(())
    }

    /// Snap `value` to the nearest step, measured from `min`.
    ///
    /// # Errors
    ///
    /// Fails if `value` is not finite or lies outside the range.
    pub fn snap(&self, slider: Slider, value: f64) -> Result<f64, ExploreError> {
        if !value.is_finite() || value < self.min || value > self.max {
            return Err(ExploreError::OutOfRange {
                slider,
                value,
                min: self.min,
                max: self.max,
            });
        }
        let steps = ((value - self.min) / self.step).round();
        let snapped = (self.min + steps * self.step).min(self.max);
        // Strip the accumulated error of `min + k * step`
        Ok((snapped * 1e9).round() / 1e9)
    }
}

/// The configurable slider ranges
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sliders {
    pub price: SliderRange,
    pub income: SliderRange,
    pub share: SliderRange,
}

impl Default for Sliders {
    fn default() -> Self {
        Self {
            price: SliderRange::new(0.2, 2.0, 0.1, 1.0),
            income: SliderRange::new(50.0, 200.0, 10.0, 100.0),
            share: SliderRange::new(0.1, 0.9, 0.05, 0.4),
        }
    }
}

impl Sliders {
    /// The range of a configurable slider
    pub fn range(&self, slider: Slider) -> Option<&SliderRange> {
        match slider {
            Slider::Price => Some(&self.price),
            Slider::Income => Some(&self.income),
            Slider::Share => Some(&self.share),
            Slider::X0 => None,
        }
    }

    /// Check that every range is well formed and that every position within
    /// it is a valid market.
    pub fn validate(&self) -> Result<(), ExploreError> {
        self.price.validate(Slider::Price)?;
        self.income.validate(Slider::Income)?;
        self.share.validate(Slider::Share)?;

        // Budgets and preferences are valid on convex sets, so the corners suffice
        Budget::new(self.price.min, self.income.min)?;
        Budget::new(self.price.max, self.income.max)?;
        Preferences::new(self.share.min)?;
        Preferences::new(self.share.max)?;
        Ok(())
    }

    /// Every slider at its initial position
    pub fn initial(&self) -> SliderState {
        SliderState {
            price: self.price.initial,
            income: self.income.initial,
            share: self.share.initial,
            x0: None,
        }
    }
}

/// The current position of every slider
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SliderState {
    pub price: f64,
    pub income: f64,
    pub share: f64,
    /// When absent, the diagram shows the optimum instead of a chosen bundle
    pub x0: Option<f64>,
}

impl SliderState {
    pub fn budget(&self) -> Result<Budget, BudgetError> {
        Budget::new(self.price, self.income)
    }

    pub fn preferences(&self) -> Result<Preferences, PreferencesError> {
        Preferences::new(self.share)
    }
}

/// A single line of `explore` input
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Move a slider to a value
    Set { slider: Slider, value: f64 },
    /// Return every slider to its initial position
    Reset,
}

impl FromStr for Event {
    type Err = ExploreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some(word), None, None) if word.eq_ignore_ascii_case("reset") => Ok(Event::Reset),
            (Some(slider), Some(value), None) => {
                let slider = slider.parse()?;
                let value = value
                    .parse()
                    .map_err(|_| ExploreError::Parse(s.trim().to_owned()))?;
                Ok(Event::Set { slider, value })
            }
            _ => Err(ExploreError::Parse(s.trim().to_owned())),
        }
    }
}

/// Errors raised while exploring
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ExploreError {
    /// The line is neither `<slider> <value>` nor `reset`
    #[error("Cannot parse event {0:?}; expected `<slider> <value>` or `reset`")]
    Parse(String),
    /// The slider name is not one of price, income, share or x0
    #[error("Unknown slider {0:?}")]
    UnknownSlider(String),
    /// The value lies outside the slider's range
    #[error("{slider} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        slider: Slider,
        value: f64,
        min: f64,
        max: f64,
    },
    /// A configured range is malformed
    #[error("Invalid {slider} slider: {reason}")]
    InvalidRange {
        slider: Slider,
        reason: &'static str,
    },
    /// A configured range admits an invalid budget
    #[error(transparent)]
    Budget(#[from] BudgetError),
    /// A configured range admits invalid preferences
    #[error(transparent)]
    Preferences(#[from] PreferencesError),
    /// The chosen bundle is not on the budget line
    #[error(transparent)]
    Bundle(#[from] BundleError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[rstest]
    #[case(1.0, 1.0)]
    #[case(1.04, 1.0)]
    #[case(1.06, 1.1)]
    #[case(0.2, 0.2)]
    #[case(2.0, 2.0)]
    fn snaps_price(#[case] value: f64, #[case] expected: f64) {
        let range = Sliders::default().price;
        assert_abs_diff_eq!(
            range.snap(Slider::Price, value).unwrap(),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn snap_never_exceeds_max() {
        let range = SliderRange::new(0.0, 1.0, 0.4, 0.0);
        assert_eq!(range.snap(Slider::Share, 0.95).unwrap(), 0.8);
        assert_eq!(range.snap(Slider::Share, 1.0).unwrap(), 1.0);
    }

    #[rstest]
    #[case(0.1)]
    #[case(2.5)]
    #[case(f64::NAN)]
    fn rejects_out_of_range(#[case] value: f64) {
        let range = Sliders::default().price;
        assert!(matches!(
            range.snap(Slider::Price, value),
            Err(ExploreError::OutOfRange { .. })
        ));
    }

    #[test]
    fn default_sliders_are_valid() {
        let sliders = Sliders::default();
        assert!(sliders.validate().is_ok());
        assert_eq!(
            sliders.initial(),
            SliderState {
                price: 1.0,
                income: 100.0,
                share: 0.4,
                x0: None
            }
        );
    }

    #[test]
    fn rejects_bad_ranges() {
        let mut sliders = Sliders::default();
        sliders.share = SliderRange::new(0.0, 1.0, 0.05, 0.5);
        assert_eq!(
            sliders.validate(),
            Err(ExploreError::Preferences(PreferencesError::OutOfRange(0.0)))
        );

        let mut sliders = Sliders::default();
        sliders.income.step = 0.0;
        assert!(matches!(
            sliders.validate(),
            Err(ExploreError::InvalidRange {
                slider: Slider::Income,
                ..
            })
        ));

        let mut sliders = Sliders::default();
        sliders.price.initial = 5.0;
        assert!(sliders.validate().is_err());
    }

    #[rstest]
    #[case("price 1.5", Event::Set { slider: Slider::Price, value: 1.5 })]
    #[case("  income 120 ", Event::Set { slider: Slider::Income, value: 120.0 })]
    #[case("Share 0.25", Event::Set { slider: Slider::Share, value: 0.25 })]
    #[case("x0 30", Event::Set { slider: Slider::X0, value: 30.0 })]
    #[case("reset", Event::Reset)]
    fn parses_events(#[case] line: &str, #[case] expected: Event) {
        assert_eq!(line.parse::<Event>().unwrap(), expected);
    }

    #[rstest]
    #[case("price")]
    #[case("price one")]
    #[case("price 1 2")]
    #[case("reset now")]
    fn rejects_malformed_events(#[case] line: &str) {
        assert!(matches!(line.parse::<Event>(), Err(ExploreError::Parse(_))));
    }

    #[test]
    fn rejects_unknown_slider() {
        assert_eq!(
            "tax 0.1".parse::<Event>(),
            Err(ExploreError::UnknownSlider("tax".to_owned()))
        );
    }
}
