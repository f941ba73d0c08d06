//! Popup Designer Core Library
//!
//! Design document model, state store and the interactive positioning
//! engine behind the popup designer's canvas.

pub mod config;
pub mod design;
pub mod drag;
pub mod element;
pub mod factory;
pub mod geometry;
pub mod notify;
pub mod storage;
pub mod store;

pub use config::{ConfigError, EditorConfig};
pub use design::Design;
pub use drag::{
    CanvasAnchor, Cursor, DragConfig, DragController, DragOutcome, DragPhase, FrameOutcome,
    MoveOutcome, VisualOverride,
};
pub use element::{Element, ElementId, ElementKind, ElementPatch, ElementType, GraphicKind};
pub use factory::{FactoryError, create_element, create_element_by_name};
pub use geometry::{ElementStyle, element_style};
pub use notify::{ConfirmPrompt, LogNotifier, Notifier, RecordingNotifier, Severity, report_error};
pub use storage::{
    DesignGateway, FileStorage, KeyValueStore, MemoryStorage, StorageError, StorageGateway,
};
pub use store::DesignStore;
