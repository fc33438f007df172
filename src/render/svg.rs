use serde::{Deserialize, Deserializer, de};
use std::fmt::{self, Display};

/// Colour of a fill or stroke attribute.
///
/// Rendered by case: `none`, the name verbatim, `rgb(r,g,b)` or
/// `rgba(r,g,b,a)`. [`Color::Named`] also carries colours that were
/// already rendered to their textual form once (the frozen artifact
/// stores colours as strings).
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Color {
    #[default]
    None,
    Named(String),
    Rgb(Rgb),
    Rgba(Rgb, f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::None => f.write_str("none"),
            Color::Named(name) => f.write_str(name),
            Color::Rgb(rgb) => write!(f, "rgb({},{},{})", rgb.red, rgb.green, rgb.blue),
            Color::Rgba(rgb, alpha) => {
                write!(f, "rgba({},{},{},{})", rgb.red, rgb.green, rgb.blue, alpha)
            }
        }
    }
}

impl From<String> for Color {
    fn from(value: String) -> Self {
        Color::Named(value)
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Color::Named(value.into())
    }
}

impl<'de> Deserialize<'de> for Color {
    /// Input documents spell a colour as either a name or an array of
    /// three or four channels.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Named(String),
            Channels(Vec<f64>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Named(name) => Ok(Color::Named(name)),
            Raw::Channels(channels) => {
                let rgb = |r: f64, g: f64, b: f64| Rgb {
                    red: r as u8,
                    green: g as u8,
                    blue: b as u8,
                };
                match channels.as_slice() {
                    [r, g, b] => Ok(Color::Rgb(rgb(*r, *g, *b))),
                    [r, g, b, a] => Ok(Color::Rgba(rgb(*r, *g, *b), *a)),
                    other => Err(de::Error::invalid_length(
                        other.len(),
                        &"3 or 4 colour channels",
                    )),
                }
            }
        }
    }
}

/// Attributes every primitive carries.
#[derive(Debug, Clone, PartialEq)]
struct Attrs {
    fill: Color,
    stroke: Color,
    stroke_width: f64,
    line_cap: Option<String>,
    line_join: Option<String>,
}

impl Default for Attrs {
    fn default() -> Self {
        Self {
            fill: Color::None,
            stroke: Color::None,
            stroke_width: 1.0,
            line_cap: None,
            line_join: None,
        }
    }
}

impl Display for Attrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fill=\"{}\" ", self.fill)?;
        write!(f, "stroke=\"{}\" ", self.stroke)?;
        write!(f, "stroke-width=\"{}\" ", self.stroke_width)?;
        if let Some(cap) = &self.line_cap {
            write!(f, "stroke-linecap=\"{cap}\" ")?;
        }
        if let Some(join) = &self.line_join {
            write!(f, "stroke-linejoin=\"{join}\" ")?;
        }
        Ok(())
    }
}

macro_rules! impl_attrs {
    ($owner:ident) => {
        impl $owner {
            pub fn fill(mut self, color: Color) -> Self {
                self.attrs.fill = color;
                self
            }

            pub fn stroke(mut self, color: Color) -> Self {
                self.attrs.stroke = color;
                self
            }

            pub fn stroke_width(mut self, width: f64) -> Self {
                self.attrs.stroke_width = width;
                self
            }

            pub fn line_cap(mut self, value: &str) -> Self {
                self.attrs.line_cap = Some(value.into());
                self
            }

            pub fn line_join(mut self, value: &str) -> Self {
                self.attrs.line_join = Some(value.into());
                self
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    center: (f64, f64),
    radius: f64,
    attrs: Attrs,
}

impl Default for Circle {
    fn default() -> Self {
        Self {
            center: (0.0, 0.0),
            radius: 1.0,
            attrs: Attrs::default(),
        }
    }
}

impl Circle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn center(mut self, center: (f64, f64)) -> Self {
        self.center = center;
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }
}

impl_attrs!(Circle);

impl Display for Circle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" ",
            self.center.0, self.center.1, self.radius
        )?;
        write!(f, "{}/>", self.attrs)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
    attrs: Attrs,
}

impl Polyline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point(mut self, point: (f64, f64)) -> Self {
        self.points.push(point);
        self
    }
}

impl_attrs!(Polyline);

impl Display for Polyline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<polyline points=\"")?;
        let mut first = true;
        for (x, y) in &self.points {
            if first {
                first = false;
            } else {
                f.write_str(" ")?;
            }
            write!(f, "{x},{y}")?;
        }
        write!(f, "\" {}/>", self.attrs)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    position: (f64, f64),
    offset: (f64, f64),
    font_size: u32,
    font_family: Option<String>,
    font_weight: Option<String>,
    data: String,
    attrs: Attrs,
}

impl Default for Text {
    fn default() -> Self {
        Self {
            position: (0.0, 0.0),
            offset: (0.0, 0.0),
            font_size: 1,
            font_family: None,
            font_weight: None,
            data: String::new(),
            attrs: Attrs::default(),
        }
    }
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, position: (f64, f64)) -> Self {
        self.position = position;
        self
    }

    pub fn offset(mut self, offset: (f64, f64)) -> Self {
        self.offset = offset;
        self
    }

    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = size;
        self
    }

    pub fn font_family(mut self, value: &str) -> Self {
        self.font_family = Some(value.into());
        self
    }

    pub fn font_weight(mut self, value: &str) -> Self {
        self.font_weight = Some(value.into());
        self
    }

    pub fn data(mut self, data: &str) -> Self {
        self.data = data.into();
        self
    }
}

impl_attrs!(Text);

impl Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<text x=\"{}\" y=\"{}\" dx=\"{}\" dy=\"{}\" font-size=\"{}\" ",
            self.position.0, self.position.1, self.offset.0, self.offset.1, self.font_size
        )?;
        if let Some(family) = &self.font_family {
            write!(f, "font-family=\"{family}\" ")?;
        }
        if let Some(weight) = &self.font_weight {
            write!(f, "font-weight=\"{weight}\" ")?;
        }
        write!(f, "{}>{}</text>", self.attrs, self.data)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rect {
    position: (f64, f64),
    width: f64,
    height: f64,
    attrs: Attrs,
}

impl Rect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, position: (f64, f64)) -> Self {
        self.position = position;
        self
    }

    pub fn dimensions(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

impl_attrs!(Rect);

impl Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" ",
            self.position.0, self.position.1, self.width, self.height
        )?;
        write!(f, "{} />", self.attrs)
    }
}

/// Any drawable object; the document stores these in paint order.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Circle(Circle),
    Polyline(Polyline),
    Text(Text),
    Rect(Rect),
}

impl Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Circle(circle) => circle.fmt(f),
            Primitive::Polyline(polyline) => polyline.fmt(f),
            Primitive::Text(text) => text.fmt(f),
            Primitive::Rect(rect) => rect.fmt(f),
        }
    }
}

impl From<Circle> for Primitive {
    fn from(value: Circle) -> Self {
        Primitive::Circle(value)
    }
}

impl From<Polyline> for Primitive {
    fn from(value: Polyline) -> Self {
        Primitive::Polyline(value)
    }
}

impl From<Text> for Primitive {
    fn from(value: Text) -> Self {
        Primitive::Text(value)
    }
}

impl From<Rect> for Primitive {
    fn from(value: Rect) -> Self {
        Primitive::Rect(value)
    }
}

/// An ordered sequence of primitives with a fixed XML envelope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    objects: Vec<Primitive>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: impl Into<Primitive>) {
        self.objects.push(object.into());
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>")?;
        f.write_str("<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">")?;
        for object in &self.objects {
            object.fmt(f)?;
        }
        f.write_str("</svg>")
    }
}

#[test]
fn color_rendering_test() {
    assert_eq!(Color::None.to_string(), "none");
    assert_eq!(Color::from("white").to_string(), "white");
    let rgb = Rgb {
        red: 255,
        green: 160,
        blue: 0,
    };
    assert_eq!(Color::Rgb(rgb).to_string(), "rgb(255,160,0)");
    assert_eq!(Color::Rgba(rgb, 0.85).to_string(), "rgba(255,160,0,0.85)");
}

#[test]
fn empty_document_is_envelope_only_test() {
    let rendered = Document::new().render();
    assert_eq!(
        rendered,
        "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\
         <svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\"></svg>"
    );
}

#[test]
fn circle_rendering_test() {
    let mut svg = Document::new();
    svg.add(
        Circle::new()
            .center((10.0, 20.0))
            .radius(5.0)
            .fill(Color::from("white")),
    );
    let rendered = svg.render();
    assert!(rendered.contains("<circle cx=\"10\" cy=\"20\" r=\"5\" fill=\"white\""));
}

#[test]
fn polyline_points_are_space_separated_test() {
    let line = Polyline::new()
        .point((1.0, 2.0))
        .point((3.5, 4.0))
        .stroke(Color::from("red"))
        .line_cap("round");
    let rendered = line.to_string();
    assert!(rendered.contains("points=\"1,2 3.5,4\""));
    assert!(rendered.contains("stroke-linecap=\"round\""));
}
