use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba8(255, 255, 255, 255);
    pub const BLACK: Color = Color::rgba8(0, 0, 0, 255);
    pub const TRANSPARENT: Color = Color::rgba8(0, 0, 0, 0);

    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: (r.clamp(0.0, 1.0) * 255.) as u8,
            g: (g.clamp(0.0, 1.0) * 255.) as u8,
            b: (b.clamp(0.0, 1.0) * 255.) as u8,
            a: (a.clamp(0.0, 1.0) * 255.) as u8,
        }
    }

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.)
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Scale the alpha channel, e.g. by the animation phase.
    pub fn fade(self, factor: f64) -> Self {
        let a = (f64::from(self.a) * factor.clamp(0., 1.)).round() as u8;
        self.with_alpha(a)
    }

    pub fn is_visible(&self) -> bool {
        self.a > 0
    }

    pub(crate) fn to_piet_color(self) -> piet::Color {
        piet::Color::rgba8(self.r, self.g, self.b, self.a)
    }
}

impl From<piet::Color> for Color {
    fn from(color: piet::Color) -> Self {
        let (r, g, b, a) = color.as_rgba8();
        Self::rgba8(r, g, b, a)
    }
}

/// Assigns a color to every slice (pie) or data set (radar).
pub trait ColorPalette: dyn_clone::DynClone {
    /// This function is expected to give the same answer for the same input (i.e. be a pure fn).
    fn color(&self, index: usize) -> Color;
}

dyn_clone::clone_trait_object!(ColorPalette);

#[derive(Copy, Clone, Debug)]
pub struct DefaultPalette;

impl ColorPalette for DefaultPalette {
    fn color(&self, index: usize) -> Color {
        let hue = (index as f64 * 140.).rem_euclid(360.);
        piet::Color::hlc(hue, 60., 50.).into()
    }
}

/// A fixed list of colors, repeated when there are more slices than colors.
#[derive(Clone, Debug)]
pub struct FixedPalette(pub Vec<Color>);

impl ColorPalette for FixedPalette {
    fn color(&self, index: usize) -> Color {
        if self.0.is_empty() {
            return Color::BLACK;
        }
        self.0[index % self.0.len()]
    }
}
