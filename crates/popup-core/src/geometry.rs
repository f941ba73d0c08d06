//! Numeric helpers and element style computation.

use crate::element::{Element, ElementKind};
use kurbo::{Point, Size};
use serde::Serialize;
use std::fmt::Write as _;

/// Size assumed for an element with no explicit width/height.
pub const FALLBACK_ELEMENT_SIZE: Size = Size::new(100.0, 40.0);
/// Font size used when an element doesn't specify one.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
/// Graphic size used when a graphic doesn't specify one.
pub const DEFAULT_GRAPHIC_SIZE: f64 = 32.0;
/// Stacking order of elements at rest.
pub const BASE_Z_INDEX: i32 = 1;

const DEFAULT_GRAPHIC_COLOR: &str = "#FBFF37";
const DEFAULT_TEXT_COLOR: &str = "#000000";
const DEFAULT_BACKGROUND: &str = "transparent";

/// Clamp `value` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics: when `max < min` the lower
/// bound wins, which pins oversized elements to the canvas origin.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    min.max(max.min(value))
}

/// Round to a fixed number of decimal places.
pub fn round_to_decimal_places(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Size of an element for boundary checks, falling back per axis.
pub fn element_size(element: &Element, fallback: Size) -> Size {
    Size::new(
        element.width.unwrap_or(fallback.width),
        element.height.unwrap_or(fallback.height),
    )
}

/// Clamp a top-left position so a box of `size` stays inside `canvas`.
pub fn clamp_to_canvas(position: Point, size: Size, canvas: Size) -> Point {
    Point::new(
        clamp(position.x, 0.0, canvas.width - size.width),
        clamp(position.y, 0.0, canvas.height - size.height),
    )
}

/// A CSS length that is either fixed or automatic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Px(f64),
    Auto,
}

impl Dimension {
    fn scaled(value: Option<f64>, scale: f64) -> Self {
        match value {
            Some(v) if v != 0.0 => Dimension::Px(v * scale),
            _ => Dimension::Auto,
        }
    }

    fn css(self) -> String {
        match self {
            Dimension::Px(v) => format!("{v}px"),
            Dimension::Auto => "auto".to_string(),
        }
    }
}

/// Render style of an element at a given scale.
///
/// Only the properties relevant to the element's kind are set; every
/// length is already multiplied by the scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    pub left: f64,
    pub top: f64,
    pub z_index: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
}

impl ElementStyle {
    /// Render as an inline CSS declaration list.
    pub fn to_css(&self) -> String {
        let mut css = format!(
            "position: absolute; left: {}px; top: {}px; z-index: {};",
            self.left, self.top, self.z_index
        );
        if let Some(width) = self.width {
            let _ = write!(css, " width: {};", width.css());
        }
        if let Some(height) = self.height {
            let _ = write!(css, " height: {};", height.css());
        }
        if let Some(font_size) = self.font_size {
            let _ = write!(css, " font-size: {font_size}px;");
        }
        if let Some(color) = &self.color {
            let _ = write!(css, " color: {color};");
        }
        if let Some(background) = &self.background_color {
            let _ = write!(css, " background-color: {background};");
        }
        if let Some(radius) = self.border_radius {
            let _ = write!(css, " border-radius: {radius}px;");
        }
        css
    }
}

/// Compute the render style of an element at `scale`.
pub fn element_style(element: &Element, scale: f64) -> ElementStyle {
    let mut style = ElementStyle {
        left: element.x * scale,
        top: element.y * scale,
        z_index: BASE_Z_INDEX,
        width: None,
        height: None,
        font_size: None,
        color: None,
        background_color: None,
        border_radius: None,
    };

    match element.kind() {
        ElementKind::Graphic(graphic) => {
            let size = graphic.size.unwrap_or(DEFAULT_GRAPHIC_SIZE) * scale;
            style.width = Some(Dimension::Px(size));
            style.height = Some(Dimension::Px(size));
            style.color = Some(color_or(&graphic.color, DEFAULT_GRAPHIC_COLOR));
        }
        ElementKind::Text(text) => {
            style.width = Some(Dimension::scaled(element.width, scale));
            style.font_size = Some(text.font_size.unwrap_or(DEFAULT_FONT_SIZE) * scale);
            style.color = Some(color_or(&text.color, DEFAULT_TEXT_COLOR));
        }
        ElementKind::Button(boxed) | ElementKind::Input(boxed) => {
            style.width = Some(Dimension::scaled(element.width, scale));
            style.height = Some(Dimension::scaled(element.height, scale));
            style.font_size = Some(boxed.font_size.unwrap_or(DEFAULT_FONT_SIZE) * scale);
            style.color = Some(color_or(&boxed.color, DEFAULT_TEXT_COLOR));
            style.background_color = Some(color_or(&boxed.background_color, DEFAULT_BACKGROUND));
            style.border_radius = Some(boxed.border_radius.unwrap_or(0.0) * scale);
        }
    }

    style
}

fn color_or(color: &Option<String>, fallback: &str) -> String {
    match color.as_deref() {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => fallback.to_string(),
    }
}
