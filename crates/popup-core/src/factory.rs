//! Creation of new elements with type-appropriate defaults.

use crate::element::{
    BoxStyle, Element, ElementId, ElementKind, ElementType, GraphicKind, GraphicStyle, TextStyle,
};
use crate::geometry::{DEFAULT_FONT_SIZE, DEFAULT_GRAPHIC_SIZE, clamp};
use chrono::Utc;
use kurbo::{Point, Size};
use thiserror::Error;
use uuid::Uuid;

/// Minimum distance kept between a new element and the canvas edges.
pub const EDGE_MARGIN: f64 = 10.0;

/// Default width of buttons and other boxed elements.
const ELEMENT_WIDTH: f64 = 120.0;
/// Default height of buttons and inputs.
const ELEMENT_HEIGHT: f64 = 40.0;
/// Default width of text and input elements.
const TEXT_WIDTH: f64 = 200.0;
const TEXT_HEIGHT: f64 = 20.0;
const INPUT_FONT_SIZE: f64 = 14.0;

/// Factory errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FactoryError {
    #[error("Unknown element type: {0}")]
    UnknownElementType(String),
}

/// Footprint used to centre a new element of the given type.
pub fn default_dimensions(element_type: ElementType) -> Size {
    match element_type {
        ElementType::Text => Size::new(TEXT_WIDTH, TEXT_HEIGHT),
        ElementType::Button => Size::new(ELEMENT_WIDTH, ELEMENT_HEIGHT),
        ElementType::Input => Size::new(TEXT_WIDTH, ELEMENT_HEIGHT),
        ElementType::Graphic => Size::new(DEFAULT_GRAPHIC_SIZE, DEFAULT_GRAPHIC_SIZE),
    }
}

/// Initial content string for a new element.
pub fn default_content(element_type: ElementType) -> &'static str {
    match element_type {
        ElementType::Text => "New Text",
        ElementType::Button => "New Button",
        ElementType::Input => "Email",
        ElementType::Graphic => "star",
    }
}

/// Generate an identifier of the form `<type>-<millis>-<7 random chars>`.
pub fn generate_element_id(element_type: ElementType) -> ElementId {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        element_type,
        Utc::now().timestamp_millis(),
        &suffix[..7]
    )
}

/// Position that centres a box of `size` on the canvas, kept at least
/// [`EDGE_MARGIN`] away from every edge.
pub fn centered_position(size: Size, canvas_width: f64, canvas_height: f64) -> Point {
    Point::new(
        clamp(
            canvas_width / 2.0 - size.width / 2.0,
            EDGE_MARGIN,
            canvas_width - size.width - EDGE_MARGIN,
        ),
        clamp(
            canvas_height / 2.0 - size.height / 2.0,
            EDGE_MARGIN,
            canvas_height - size.height - EDGE_MARGIN,
        ),
    )
}

/// Create a new element of `element_type` centred on the canvas.
pub fn create_element(element_type: ElementType, canvas_width: f64, canvas_height: f64) -> Element {
    let id = generate_element_id(element_type);
    let position = centered_position(default_dimensions(element_type), canvas_width, canvas_height);
    let content = default_content(element_type);

    match element_type {
        ElementType::Text => Element::new(
            id,
            content,
            position,
            ElementKind::Text(TextStyle {
                font_size: Some(DEFAULT_FONT_SIZE),
                color: Some("#000000".to_string()),
            }),
        )
        .with_size(Some(TEXT_WIDTH), None),
        ElementType::Button => Element::new(
            id,
            content,
            position,
            ElementKind::Button(BoxStyle {
                font_size: Some(DEFAULT_FONT_SIZE),
                color: Some("#FFFFFF".to_string()),
                background_color: Some("#2D3748".to_string()),
                border_radius: None,
            }),
        )
        .with_size(None, Some(ELEMENT_HEIGHT)),
        ElementType::Input => Element::new(
            id,
            content,
            position,
            ElementKind::Input(BoxStyle {
                font_size: Some(INPUT_FONT_SIZE),
                color: Some("#000000".to_string()),
                background_color: Some("#FFFFFF".to_string()),
                border_radius: None,
            }),
        )
        .with_size(Some(TEXT_WIDTH), Some(ELEMENT_HEIGHT)),
        ElementType::Graphic => Element::new(
            id,
            content,
            position,
            ElementKind::Graphic(GraphicStyle {
                color: Some("#FFD700".to_string()),
                graphic_kind: Some(GraphicKind::Star),
                size: Some(DEFAULT_GRAPHIC_SIZE),
            }),
        ),
    }
}

/// Create a new element from a type name such as `"button"`.
pub fn create_element_by_name(
    type_name: &str,
    canvas_width: f64,
    canvas_height: f64,
) -> Result<Element, FactoryError> {
    let element_type: ElementType = type_name.parse()?;
    Ok(create_element(element_type, canvas_width, canvas_height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_is_centered() {
        let el = create_element(ElementType::Button, 500.0, 500.0);

        assert_eq!(el.position(), Point::new(190.0, 230.0));
        assert_eq!(el.element_type(), ElementType::Button);
        assert_eq!(el.content, "New Button");
        assert_eq!(el.height, Some(40.0));
        assert!(el.width.is_none());
    }

    #[test]
    fn test_defaults_per_type() {
        let text = create_element(ElementType::Text, 500.0, 500.0);
        assert_eq!(text.position(), Point::new(150.0, 240.0));
        assert_eq!(text.width, Some(200.0));

        let input = create_element(ElementType::Input, 500.0, 500.0);
        assert_eq!(input.content, "Email");
        assert!(matches!(
            input.kind(),
            ElementKind::Input(BoxStyle { font_size: Some(size), .. }) if *size == 14.0
        ));

        let graphic = create_element(ElementType::Graphic, 500.0, 500.0);
        assert_eq!(graphic.position(), Point::new(234.0, 234.0));
        assert!(matches!(
            graphic.kind(),
            ElementKind::Graphic(GraphicStyle { graphic_kind: Some(GraphicKind::Star), .. })
        ));
    }

    #[test]
    fn test_position_respects_margin_on_small_canvas() {
        // 150 wide: centring would put x at 15, max allowed is 150 - 120 - 10 = 20.
        let el = create_element(ElementType::Button, 150.0, 45.0);
        assert_eq!(el.x, 15.0);
        // 45 high: centring gives 2.5, margin pushes it to 10.
        assert_eq!(el.y, 10.0);
    }

    #[test]
    fn test_ids_are_unique_and_prefixed() {
        let a = create_element(ElementType::Text, 500.0, 500.0);
        let b = create_element(ElementType::Text, 500.0, 500.0);

        assert_ne!(a.id(), b.id());
        assert!(a.id().starts_with("text-"));
        assert_eq!(a.id().rsplit('-').next().map(str::len), Some(7));
    }

    #[test]
    fn test_create_by_name() {
        let el = create_element_by_name("graphic", 300.0, 300.0).unwrap();
        assert_eq!(el.element_type(), ElementType::Graphic);

        assert_eq!(
            create_element_by_name("carousel", 300.0, 300.0),
            Err(FactoryError::UnknownElementType("carousel".to_string()))
        );
    }
}
