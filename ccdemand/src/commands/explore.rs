use crate::{Event, ExploreError, Slider, SliderState, Sliders};
use cc_core::models::{Arbitrage, Budget, Demand, Preferences, closed_form_demand};
use cc_plot::{Figure, PlotConfig, PlotError, PlotRenderer};
use std::io::{BufRead, BufReader, Read};
use tracing::{Level, event};

/// One re-rendered view of the exploration
#[derive(Debug)]
pub struct Frame {
    pub state: SliderState,
    pub figure: Figure,
    /// The utility-maximizing bundle for the current sliders
    pub demand: Demand,
    /// The comparison at the displayed bundle (absent on the boundary)
    pub arbitrage: Option<Arbitrage>,
}

/// Replays slider events against a renderer, one at a time
pub struct Explorer {
    sliders: Sliders,
    state: SliderState,
    budget: Budget,
    preferences: Preferences,
    renderer: PlotRenderer,
}

impl Explorer {
    pub fn new(sliders: Sliders, plot: PlotConfig) -> Result<Self, ExploreError> {
        sliders.validate()?;
        let state = sliders.initial();
        Ok(Self {
            budget: state.budget()?,
            preferences: state.preferences()?,
            state,
            sliders,
            renderer: PlotRenderer::new(plot),
        })
    }

    pub fn state(&self) -> &SliderState {
        &self.state
    }

    /// Apply an event, leaving the state untouched if it is rejected
    pub fn apply(&mut self, event: Event) -> Result<(), ExploreError> {
        let mut next = self.state;
        match event {
            Event::Reset => next = self.sliders.initial(),
            Event::Set {
                slider: Slider::X0,
                value,
            } => {
                let max = self.budget.max_x0();
                if value.is_nan() || value <= 0.0 || value >= max {
                    return Err(ExploreError::OutOfRange {
                        slider: Slider::X0,
                        value,
                        min: 0.0,
                        max,
                    });
                }
                next.x0 = Some(value);
            }
            Event::Set { slider, value } => {
                let Some(range) = self.sliders.range(slider) else {
                    return Err(ExploreError::UnknownSlider(slider.to_string()));
                };
                let value = range.snap(slider, value)?;
                match slider {
                    Slider::Price => next.price = value,
                    Slider::Income => next.income = value,
                    _ => next.share = value,
                }
            }
        }

        let budget = next.budget()?;
        let preferences = next.preferences()?;

        // A new budget line may no longer pass through the chosen bundle's x0
        if let Some(x0) = next.x0 {
            if x0 >= budget.max_x0() {
                event!(Level::INFO, x0, "bundle left the budget set; showing the optimum");
                next.x0 = None;
            }
        }

        self.state = next;
        self.budget = budget;
        self.preferences = preferences;
        Ok(())
    }

    /// Render the current state
    pub fn render(&self) -> Result<Frame, PlotError> {
        let demand = closed_form_demand(&self.budget, &self.preferences);
        let (figure, bundle) = match self.state.x0 {
            Some(x0) => (
                self.renderer.arbitrage(&self.budget, &self.preferences, x0)?,
                self.budget.bundle_at(x0)?,
            ),
            None => (
                self.renderer.optimum(&self.budget, &self.preferences),
                demand.bundle,
            ),
        };
        let arbitrage = Arbitrage::evaluate(&bundle, &self.budget, &self.preferences).ok();

        Ok(Frame {
            state: self.state,
            figure,
            demand,
            arbitrage,
        })
    }

    /// Render the initial state, then re-render after every accepted event
    /// read from `input`, handing each frame to `sink`. Blank lines and lines
    /// starting with `#` are ignored; rejected events are logged and skipped.
    ///
    /// Returns the number of frames rendered.
    pub fn run(
        &mut self,
        input: impl Read,
        mut sink: impl FnMut(&Frame) -> anyhow::Result<()>,
    ) -> anyhow::Result<usize> {
        let mut frames = 0;
        self.emit(&mut sink)?;
        frames += 1;

        for (i, line) in BufReader::new(input).lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let applied = line.parse::<Event>().and_then(|event| self.apply(event));
            if let Err(error) = applied {
                event!(Level::WARN, line = i + 1, %error, "rejected event");
                continue;
            }

            self.emit(&mut sink)?;
            frames += 1;
        }

        Ok(frames)
    }

    fn emit(&self, sink: &mut impl FnMut(&Frame) -> anyhow::Result<()>) -> anyhow::Result<()> {
        let frame = self.render()?;
        match &frame.arbitrage {
            Some(arbitrage) => event!(
                Level::INFO,
                price = frame.state.price,
                income = frame.state.income,
                share = frame.state.share,
                x0 = ?frame.state.x0,
                %arbitrage,
                advice = arbitrage.advice(),
                "arbitrage comparison"
            ),
            None => event!(
                Level::INFO,
                price = frame.state.price,
                income = frame.state.income,
                share = frame.state.share,
                "marginal utilities undefined at the displayed bundle"
            ),
        }
        sink(&frame)
    }
}
