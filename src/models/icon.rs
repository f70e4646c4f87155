#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconColor {
    Black,
    White,
    Green,
    Red,
    Yellow,
    Orange,
    Purple,
    CornflowerBlue,
}

impl IconColor {
    pub fn as_svg(&self) -> &'static str {
        match self {
            IconColor::Black => "black",
            IconColor::White => "white",
            IconColor::Green => "green",
            IconColor::Red => "red",
            IconColor::Yellow => "yellow",
            IconColor::Orange => "orange",
            IconColor::Purple => "purple",
            IconColor::CornflowerBlue => "cornflowerblue",
        }
    }
}

/// Resolved color/text/progress description handed to the renderer.
/// `progress` is a width fraction for the background bar; `None` means the
/// background fills the whole canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct IconSpec {
    pub background: IconColor,
    pub text_color: IconColor,
    pub lines: Vec<String>,
    pub progress: Option<f64>,
}

impl IconSpec {
    pub fn solid(background: IconColor, text_color: IconColor) -> Self {
        Self {
            background,
            text_color,
            lines: Vec::new(),
            progress: None,
        }
    }
}
