use std::fmt::{self, Write as _};

/// A point in data coordinates (quantities of good 0 and good 1).
pub type Point = (f64, f64);

/// Fill and stroke colors used throughout the diagrams
pub mod palette {
    /// Budget line
    pub const BUDGET: &str = "#1f77b4";
    /// Shaded budget set
    pub const BUDGET_SET: &str = "#aec7e8";
    /// Indifference curve
    pub const INDIFFERENCE: &str = "#d62728";
    /// Bundle marker and guide lines
    pub const BUNDLE: &str = "#2ca02c";
    /// Axes and text
    pub const INK: &str = "#333333";
}

/// The rectangle of data space that is drawn, and where it lands on the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    /// Width of the image in pixels
    pub width: f64,
    /// Height of the image in pixels
    pub height: f64,
    /// Space reserved around the plot area for labels, in pixels
    pub margin: f64,
    /// The upper limit of the horizontal axis (good 0)
    pub x_max: f64,
    /// The upper limit of the vertical axis (good 1)
    pub y_max: f64,
}

impl Canvas {
    /// Horizontal pixel coordinate of a quantity of good 0
    pub fn px(&self, x: f64) -> f64 {
        self.margin + x / self.x_max * (self.width - 2.0 * self.margin)
    }

    /// Vertical pixel coordinate of a quantity of good 1 (the y axis points up)
    pub fn py(&self, y: f64) -> f64 {
        self.height - self.margin - y / self.y_max * (self.height - 2.0 * self.margin)
    }

    /// Whether a data point lies within the axes
    pub fn contains(&self, (x, y): Point) -> bool {
        (0.0..=self.x_max).contains(&x) && (0.0..=self.y_max).contains(&y)
    }
}

/// Horizontal alignment of a text annotation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// Text starts at the anchor point
    Start,
    /// Text is centered on the anchor point
    Middle,
    /// Text ends at the anchor point
    End,
}

impl Anchor {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// The drawing primitives a diagram is built from. Geometry is kept in data
/// coordinates until the figure is written out.
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    /// An open polyline
    Line {
        /// The vertices, in order
        points: Vec<Point>,
        /// Stroke color
        stroke: &'static str,
        /// Stroke width in pixels
        width: f64,
        /// Whether the stroke is dashed
        dashed: bool,
    },
    /// A closed, filled polygon without outline
    Area {
        /// The vertices, in order
        points: Vec<Point>,
        /// Fill color
        fill: &'static str,
        /// Fill opacity
        opacity: f64,
    },
    /// A filled circle marker with a radius in pixels
    Marker {
        /// The center
        at: Point,
        /// Fill color
        fill: &'static str,
        /// Radius in pixels
        radius: f64,
    },
    /// A text annotation positioned in pixels, independent of the axes
    Label {
        /// Horizontal pixel position
        x: f64,
        /// Vertical pixel position (baseline)
        y: f64,
        /// The (unescaped) text
        text: String,
        /// Horizontal alignment
        anchor: Anchor,
        /// Font size in pixels
        size: f64,
    },
}

/// A complete diagram: a canvas and the elements drawn on it.
///
/// Rendering to SVG is done through [`fmt::Display`], so `figure.to_string()`
/// yields a standalone SVG document.
#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    /// The canvas the elements are drawn on
    pub canvas: Canvas,
    /// The elements, in painting order
    pub elements: Vec<Element>,
}

impl Figure {
    /// Create an empty figure
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            elements: Vec::new(),
        }
    }

    /// Append an element
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// All label texts, in painting order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|element| match element {
            Element::Label { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    fn write_points(&self, out: &mut fmt::Formatter<'_>, points: &[Point]) -> fmt::Result {
        for (i, &(x, y)) in points.iter().enumerate() {
            if i > 0 {
                out.write_char(' ')?;
            }
            write!(out, "{:.2},{:.2}", self.canvas.px(x), self.canvas.py(y))?;
        }
        Ok(())
    }
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Canvas { width, height, .. } = self.canvas;

        write!(
            f,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" \
             width=\"{width}\" height=\"{height}\" \
             viewBox=\"0 0 {width} {height}\">"
        )?;
        f.write_str("<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>")?;

        // Axes
        let (x0, y0) = (self.canvas.px(0.0), self.canvas.py(0.0));
        let (x1, y1) = (
            self.canvas.px(self.canvas.x_max),
            self.canvas.py(self.canvas.y_max),
        );
        write!(
            f,
            "<path d=\"M{x0:.2},{y1:.2} L{x0:.2},{y0:.2} L{x1:.2},{y0:.2}\" \
             fill=\"none\" stroke=\"{}\" stroke-width=\"1\"/>",
            palette::INK
        )?;

        for element in self.elements.iter() {
            match element {
                Element::Line {
                    points,
                    stroke,
                    width,
                    dashed,
                } => {
                    if points.len() < 2 {
                        continue;
                    }
                    f.write_str("<polyline points=\"")?;
                    self.write_points(f, points)?;
                    write!(
                        f,
                        "\" fill=\"none\" stroke=\"{stroke}\" stroke-width=\"{width}\""
                    )?;
                    if *dashed {
                        f.write_str(" stroke-dasharray=\"4 3\"")?;
                    }
                    f.write_str("/>")?;
                }
                Element::Area {
                    points,
                    fill,
                    opacity,
                } => {
                    if points.len() < 3 {
                        continue;
                    }
                    f.write_str("<polygon points=\"")?;
                    self.write_points(f, points)?;
                    write!(f, "\" fill=\"{fill}\" fill-opacity=\"{opacity}\"/>")?;
                }
                Element::Marker { at, fill, radius } => {
                    write!(
                        f,
                        "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{radius}\" fill=\"{fill}\"/>",
                        self.canvas.px(at.0),
                        self.canvas.py(at.1)
                    )?;
                }
                Element::Label {
                    x,
                    y,
                    text,
                    anchor,
                    size,
                } => {
                    write!(
                        f,
                        "<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"{}\" \
                         font-family=\"sans-serif\" font-size=\"{size}\" fill=\"{}\">",
                        anchor.as_str(),
                        palette::INK
                    )?;
                    write_escaped(f, text)?;
                    f.write_str("</text>")?;
                }
            }
        }

        f.write_str("</svg>")
    }
}

/// SVG-escape a string into the output.
fn write_escaped(out: &mut impl fmt::Write, s: &str) -> fmt::Result {
    for c in s.chars() {
        match c {
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            '&' => out.write_str("&amp;")?,
            _ => out.write_char(c)?,
        }
    }
    Ok(())
}
