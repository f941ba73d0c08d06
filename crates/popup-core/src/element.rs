//! Popup element definitions.
//!
//! An element is a closed sum over the kinds the designer can place on a
//! canvas. Fields shared by every kind live on [`Element`]; the fields that
//! only make sense for one kind live in that kind's style struct.

use crate::factory::FactoryError;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique element identifier within a design.
pub type ElementId = String;

/// The kinds of element that can be placed on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Text,
    Button,
    Input,
    #[serde(alias = "svg")]
    Graphic,
}

impl ElementType {
    /// All element types, in toolbar order.
    pub const ALL: [ElementType; 4] = [
        ElementType::Text,
        ElementType::Button,
        ElementType::Input,
        ElementType::Graphic,
    ];

    /// The tag used for this type in identifiers and persisted documents.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Text => "text",
            ElementType::Button => "button",
            ElementType::Input => "input",
            ElementType::Graphic => "graphic",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = FactoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ElementType::Text),
            "button" => Ok(ElementType::Button),
            "input" => Ok(ElementType::Input),
            "graphic" | "svg" => Ok(ElementType::Graphic),
            _ => Err(FactoryError::UnknownElementType(s.to_string())),
        }
    }
}

/// Decorative graphic shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphicKind {
    #[default]
    Star,
    Heart,
}

/// Style fields of a text element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Style fields shared by buttons and inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
}

/// Style fields of a decorative graphic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, alias = "svgType", skip_serializing_if = "Option::is_none")]
    pub graphic_kind: Option<GraphicKind>,
    #[serde(default, alias = "svgSize", skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

/// Kind-specific part of an element, tagged by `type` in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text(TextStyle),
    Button(BoxStyle),
    Input(BoxStyle),
    #[serde(alias = "svg")]
    Graphic(GraphicStyle),
}

impl ElementKind {
    /// The type tag of this kind.
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Text(_) => ElementType::Text,
            ElementKind::Button(_) => ElementType::Button,
            ElementKind::Input(_) => ElementType::Input,
            ElementKind::Graphic(_) => ElementType::Graphic,
        }
    }
}

/// An element placed on the canvas.
///
/// The identifier and kind are fixed at creation; everything else may be
/// changed through [`Element::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub(crate) id: ElementId,
    /// Text content (label, placeholder or graphic name).
    #[serde(default)]
    pub content: String,
    /// Left edge in logical canvas units.
    pub x: f64,
    /// Top edge in logical canvas units.
    pub y: f64,
    /// Explicit width, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Explicit height, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(flatten)]
    pub(crate) kind: ElementKind,
}

impl Element {
    /// Create an element with the given identifier and kind.
    pub fn new(id: impl Into<ElementId>, content: impl Into<String>, position: Point, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            x: position.x,
            y: position.y,
            width: None,
            height: None,
            kind,
        }
    }

    /// Builder-style setter for the explicit size.
    pub fn with_size(mut self, width: Option<f64>, height: Option<f64>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Top-left position in logical units.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Shallow-merge a partial update into this element.
    ///
    /// Fields present in the patch override; absent fields are kept.
    /// Style fields that don't exist on this element's kind are ignored.
    pub fn apply(&mut self, patch: &ElementPatch) {
        if let Some(content) = &patch.content {
            self.content.clone_from(content);
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if patch.width.is_some() {
            self.width = patch.width;
        }
        if patch.height.is_some() {
            self.height = patch.height;
        }

        match &mut self.kind {
            ElementKind::Text(style) => {
                merge(&mut style.font_size, &patch.font_size);
                merge(&mut style.color, &patch.color);
            }
            ElementKind::Button(style) | ElementKind::Input(style) => {
                merge(&mut style.font_size, &patch.font_size);
                merge(&mut style.color, &patch.color);
                merge(&mut style.background_color, &patch.background_color);
                merge(&mut style.border_radius, &patch.border_radius);
            }
            ElementKind::Graphic(style) => {
                merge(&mut style.color, &patch.color);
                merge(&mut style.graphic_kind, &patch.graphic_kind);
                merge(&mut style.size, &patch.size);
            }
        }
    }
}

fn merge<T: Clone>(field: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        field.clone_from(value);
    }
}

/// A partial update to an element. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphic_kind: Option<GraphicKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

impl ElementPatch {
    /// A patch that only moves the element.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Check if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button() -> Element {
        Element::new(
            "button-1",
            "Buy",
            Point::new(10.0, 20.0),
            ElementKind::Button(BoxStyle {
                font_size: Some(16.0),
                color: Some("#FFFFFF".to_string()),
                background_color: Some("#2D3748".to_string()),
                border_radius: None,
            }),
        )
        .with_size(None, Some(40.0))
    }

    #[test]
    fn test_parse_element_type() {
        assert_eq!("text".parse::<ElementType>().unwrap(), ElementType::Text);
        assert_eq!("Button".parse::<ElementType>().unwrap(), ElementType::Button);
        assert_eq!("svg".parse::<ElementType>().unwrap(), ElementType::Graphic);
        assert!(matches!(
            "slider".parse::<ElementType>(),
            Err(FactoryError::UnknownElementType(name)) if name == "slider"
        ));
    }

    #[test]
    fn test_apply_merges_shallowly() {
        let mut el = button();
        el.apply(&ElementPatch {
            content: Some("Subscribe".to_string()),
            border_radius: Some(8.0),
            ..ElementPatch::default()
        });

        assert_eq!(el.content, "Subscribe");
        assert_eq!(el.id(), "button-1");
        assert_eq!(el.position(), Point::new(10.0, 20.0));
        assert_eq!(el.height, Some(40.0));
        match el.kind() {
            ElementKind::Button(style) => {
                assert_eq!(style.border_radius, Some(8.0));
                assert_eq!(style.background_color.as_deref(), Some("#2D3748"));
            }
            other => panic!("kind changed: {other:?}"),
        }
    }

    #[test]
    fn test_apply_ignores_fields_of_other_kinds() {
        let mut el = Element::new(
            "text-1",
            "Hello",
            Point::ZERO,
            ElementKind::Text(TextStyle::default()),
        );
        el.apply(&ElementPatch {
            background_color: Some("#FF0000".to_string()),
            graphic_kind: Some(GraphicKind::Heart),
            ..ElementPatch::default()
        });

        assert_eq!(el.kind(), &ElementKind::Text(TextStyle::default()));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let patch = ElementPatch {
            x: Some(42.5),
            color: Some("#123456".to_string()),
            ..ElementPatch::default()
        };
        let mut once = button();
        once.apply(&patch);
        let mut twice = once.clone();
        twice.apply(&patch);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(button()).unwrap();

        assert_eq!(value["type"], "button");
        assert_eq!(value["id"], "button-1");
        assert_eq!(value["backgroundColor"], "#2D3748");
        assert!(value.get("width").is_none());
        assert!(value.get("borderRadius").is_none());
    }

    #[test]
    fn test_reads_legacy_svg_elements() {
        let json = r##"{
            "id": "svg-1", "type": "svg", "content": "star",
            "x": 5, "y": 6, "color": "#FFD700", "svgType": "heart", "svgSize": 48
        }"##;
        let el: Element = serde_json::from_str(json).unwrap();

        assert_eq!(el.element_type(), ElementType::Graphic);
        assert_eq!(
            el.kind(),
            &ElementKind::Graphic(GraphicStyle {
                color: Some("#FFD700".to_string()),
                graphic_kind: Some(GraphicKind::Heart),
                size: Some(48.0),
            })
        );
    }

    #[test]
    fn test_position_patch() {
        let patch = ElementPatch::position(1.0, 2.0);
        assert_eq!(patch.x, Some(1.0));
        assert_eq!(patch.y, Some(2.0));
        assert!(patch.content.is_none());
        assert!(!patch.is_empty());
        assert!(ElementPatch::default().is_empty());
    }
}
