//! The design document: canvas settings plus the ordered element list.

use crate::element::{BoxStyle, Element, ElementKind, TextStyle};
use chrono::{DateTime, Utc};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Default logical canvas width.
pub const DEFAULT_CANVAS_WIDTH: f64 = 500.0;
/// Default logical canvas height.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 500.0;
/// Default canvas background.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#FFFFFF";

/// A popup design.
///
/// Elements are kept in z-order: later elements are drawn on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    /// Document identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Canvas background colour.
    pub background_color: String,
    /// Logical canvas width.
    #[serde(rename = "width")]
    pub canvas_width: f64,
    /// Logical canvas height.
    #[serde(rename = "height")]
    pub canvas_height: f64,
    /// Elements, back to front.
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Design {
    fn default() -> Self {
        Self::with_canvas(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

impl Design {
    /// The canonical starter design on a canvas of the given size.
    ///
    /// Contents are deterministic so that a reset always yields the same
    /// document.
    pub fn with_canvas(canvas_width: f64, canvas_height: f64) -> Self {
        let center_x = canvas_width / 2.0;
        let elements = vec![
            Element::new(
                "default-heading",
                "Join our newsletter",
                Point::new(center_x - 100.0, 60.0),
                ElementKind::Text(TextStyle {
                    font_size: Some(24.0),
                    color: Some("#1A202C".to_string()),
                }),
            )
            .with_size(Some(200.0), None),
            Element::new(
                "default-email",
                "Email",
                Point::new(center_x - 100.0, 140.0),
                ElementKind::Input(BoxStyle {
                    font_size: Some(14.0),
                    color: Some("#000000".to_string()),
                    background_color: Some("#FFFFFF".to_string()),
                    border_radius: Some(4.0),
                }),
            )
            .with_size(Some(200.0), Some(40.0)),
            Element::new(
                "default-submit",
                "Subscribe",
                Point::new(center_x - 60.0, 200.0),
                ElementKind::Button(BoxStyle {
                    font_size: Some(16.0),
                    color: Some("#FFFFFF".to_string()),
                    background_color: Some("#2D3748".to_string()),
                    border_radius: Some(4.0),
                }),
            )
            .with_size(Some(120.0), Some(40.0)),
        ];

        Self {
            id: "default".to_string(),
            name: "Default Popup".to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            canvas_width,
            canvas_height,
            elements,
            created_at: None,
            updated_at: None,
        }
    }

    /// Logical canvas size.
    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }

    /// Get an element by ID.
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| el.id == id)
    }

    /// Check whether an element exists.
    pub fn contains(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    /// Remove an element, returning it if it existed.
    pub fn remove_element(&mut self, id: &str) -> Option<Element> {
        let index = self.elements.iter().position(|el| el.id == id)?;
        Some(self.elements.remove(index))
    }

    /// Check that identifiers are unique and the canvas has positive size.
    pub fn is_well_formed(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.canvas_width > 0.0
            && self.canvas_height > 0.0
            && self.elements.iter().all(|el| seen.insert(el.id.as_str()))
    }

    /// Serialize the design to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a design from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
