#![warn(missing_docs)]
//! Budget-line and indifference-curve diagrams, rendered to SVG.
//!
//! [`PlotRenderer`] turns a budget and preferences into a [`Figure`]: the
//! shaded budget set, the budget line, the indifference curve through the
//! bundle of interest, guide lines and a marker on that bundle. The
//! arbitrage variant places an arbitrary bundle on the budget line and
//! annotates it with the marginal-utility-per-price comparison. A figure
//! writes itself out as a standalone SVG document through `Display`.

mod diagram;
pub use diagram::{PlotConfig, PlotError, PlotRenderer};

/// Low-level drawing primitives
pub mod svg;
pub use svg::Figure;
