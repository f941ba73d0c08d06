//! Popup Designer - edit the stored popup design from the command line.
//!
//! Every invocation loads the saved design, applies one command through the
//! core store and saves again if anything changed.

mod console;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use console::{ConsoleNotifier, ConsolePrompt};
use kurbo::{Point, Rect};
use popup_core::notify::{report_info, report_warning};
use popup_core::storage::{FileStorage, StorageGateway};
use popup_core::{
    DesignStore, DragController, DragOutcome, EditorConfig, ElementPatch, ElementType, GraphicKind,
};
use std::path::PathBuf;

/// Popup Designer - position and style popup elements
#[derive(Parser)]
#[command(name = "popup-designer")]
#[command(about = "Command-line host for the popup designer")]
struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the design is stored in (overrides the config)
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current design
    Show {
        /// Print the stored JSON document
        #[arg(long)]
        json: bool,
    },

    /// Add a new element centred on the canvas
    Add {
        /// Element type: text, button, input or graphic
        kind: String,
    },

    /// Drag an element to a new logical position
    #[command(allow_negative_numbers = true)]
    Move {
        id: String,
        x: f64,
        y: f64,
        /// Display scale the drag happens at
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
    },

    /// Change element properties
    Update {
        id: String,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        background_color: Option<String>,
        #[arg(long)]
        font_size: Option<f64>,
        #[arg(long)]
        border_radius: Option<f64>,
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
        /// Graphic size
        #[arg(long)]
        size: Option<f64>,
        #[arg(long, value_enum)]
        graphic: Option<GraphicArg>,
    },

    /// Show an element and its rendered style
    Select {
        id: String,
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
    },

    /// Delete an element
    Delete { id: String },

    /// Set the canvas background colour
    Background { color: String },

    /// Resize the canvas (elements are not moved)
    Resize { width: f64, height: f64 },

    /// Restore the default design and clear saved state
    Reset {
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GraphicArg {
    Star,
    Heart,
}

impl From<GraphicArg> for GraphicKind {
    fn from(arg: GraphicArg) -> Self {
        match arg {
            GraphicArg::Star => GraphicKind::Star,
            GraphicArg::Heart => GraphicKind::Heart,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let storage = match cli.storage_dir.as_ref().or(config.storage_dir.as_ref()) {
        Some(dir) => FileStorage::new(dir),
        None => FileStorage::default_location(),
    }
    .context("Failed to open design storage")?;
    log::debug!("Using storage at {}", storage.base_path().display());

    let gateway = StorageGateway::new(storage)
        .with_key(config.storage_key.clone())
        .with_fallback(config.default_design());
    let mut store =
        DesignStore::load(gateway, ConsoleNotifier).with_default_design(config.default_design());
    let mut drag = DragController::new(config.drag.clone());

    let changed = run(cli.command, &mut store, &mut drag)?;
    if changed && !store.save() {
        bail!("Design was not saved");
    }
    Ok(())
}

/// Execute one command. Returns whether the design needs saving.
fn run(command: Commands, store: &mut DesignStore, drag: &mut DragController) -> Result<bool> {
    match command {
        Commands::Show { json } => {
            show(store, json)?;
            Ok(false)
        }
        Commands::Add { kind } => match store.add_element_of_type(&kind) {
            Some(id) => {
                println!("Added {id}");
                Ok(true)
            }
            None => bail!(
                "Could not add element of type '{kind}' (expected one of: {})",
                element_type_names()
            ),
        },
        Commands::Move { id, x, y, scale } => move_element(store, drag, &id, Point::new(x, y), scale),
        Commands::Update {
            id,
            content,
            color,
            background_color,
            font_size,
            border_radius,
            width,
            height,
            size,
            graphic,
        } => {
            let patch = ElementPatch {
                content,
                color,
                background_color,
                font_size,
                border_radius,
                width,
                height,
                size,
                graphic_kind: graphic.map(GraphicKind::from),
                ..ElementPatch::default()
            };
            if patch.is_empty() {
                bail!("Nothing to update");
            }
            require_element(store, &id)?;
            store.update_element(&id, &patch);
            Ok(true)
        }
        Commands::Select { id, scale } => {
            require_element(store, &id)?;
            store.select(Some(&id));
            if let Some(element) = store.selected_element() {
                println!("{}", serde_json::to_string_pretty(element)?);
            }
            if let Some(style) = drag.render_style(store, &id, scale) {
                println!("{}", style.to_css());
            }
            Ok(false)
        }
        Commands::Delete { id } => {
            require_element(store, &id)?;
            store.delete_element(&id);
            println!("Deleted {id}");
            Ok(true)
        }
        Commands::Background { color } => {
            store.set_background_color(color);
            Ok(true)
        }
        Commands::Resize { width, height } => {
            if !(width > 0.0 && height > 0.0) {
                bail!("Canvas size must be positive");
            }
            store.set_canvas_width(width);
            store.set_canvas_height(height);
            Ok(true)
        }
        // Reset clears storage itself; saving afterwards would undo that.
        Commands::Reset { yes } => {
            if !store.reset(&mut ConsolePrompt::new(yes)) {
                report_info(store.notifier(), "Reset cancelled");
            }
            Ok(false)
        }
    }
}

fn element_type_names() -> String {
    ElementType::ALL.map(ElementType::as_str).join(", ")
}

fn require_element(store: &DesignStore, id: &str) -> Result<()> {
    if store.element(id).is_none() {
        bail!("No element with id '{id}'");
    }
    Ok(())
}

/// Move an element by replaying a full pointer gesture over a canvas drawn
/// at `scale` with its top-left at the origin.
fn move_element(
    store: &mut DesignStore,
    drag: &mut DragController,
    id: &str,
    target: Point,
    scale: f64,
) -> Result<bool> {
    if !(scale.is_finite() && scale > 0.0) {
        bail!("Scale must be positive");
    }
    require_element(store, id)?;

    let canvas = store.design().canvas_size();
    let anchor = Rect::new(0.0, 0.0, canvas.width * scale, canvas.height * scale);
    let Some(press) = drag.render_position(store, id, scale) else {
        bail!("No element with id '{id}'");
    };

    drag.begin(store, id, press, &anchor, scale);
    drag.pointer_move(store, Point::new(target.x * scale, target.y * scale));
    drag.on_frame(store, &anchor, scale);

    match drag.end(store, scale) {
        DragOutcome::Moved { id, position } => {
            println!("Moved {id} to ({}, {})", position.x, position.y);
            Ok(true)
        }
        DragOutcome::Clicked(id) => {
            report_warning(
                store.notifier(),
                &format!("{id} moved less than the drag threshold; position unchanged"),
            );
            Ok(false)
        }
        DragOutcome::Idle | DragOutcome::Aborted => bail!("Drag on '{id}' did not complete"),
    }
}

fn show(store: &DesignStore, json: bool) -> Result<()> {
    let design = store.design();
    if json {
        println!("{}", serde_json::to_string_pretty(design)?);
        return Ok(());
    }

    println!("{} ({})", design.name, design.id);
    println!(
        "Canvas: {} x {}, background {}",
        design.canvas_width, design.canvas_height, design.background_color
    );
    if let Some(updated) = design.updated_at {
        println!("Last saved: {}", updated.to_rfc3339());
    }
    if design.elements.is_empty() {
        println!("No elements.");
        return Ok(());
    }
    println!("Elements:");
    for element in &design.elements {
        let size = match (element.width, element.height) {
            (Some(w), Some(h)) => format!(" {w} x {h}"),
            (Some(w), None) => format!(" {w} wide"),
            (None, Some(h)) => format!(" {h} high"),
            (None, None) => String::new(),
        };
        println!(
            "  {:<32} {:<8} at ({}, {}){}  {:?}",
            element.id(),
            element.element_type(),
            element.x,
            element.y,
            size,
            element.content
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use popup_core::storage::MemoryStorage;
    use popup_core::{Design, RecordingNotifier, Severity};
    use std::rc::Rc;

    fn store() -> DesignStore {
        DesignStore::with_design(
            Design::default(),
            StorageGateway::new(MemoryStorage::new()),
            RecordingNotifier::new(),
        )
    }

    #[test]
    fn test_cli_parses_move() {
        let cli = Cli::try_parse_from([
            "popup-designer",
            "move",
            "default-submit",
            "10",
            "20.5",
            "--scale",
            "2",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Commands::Move { ref id, x, y, scale } if id == "default-submit" && x == 10.0 && y == 20.5 && scale == 2.0
        ));
    }

    #[test]
    fn test_move_replays_drag() {
        let mut store = store();
        let mut drag = DragController::default();
        let revision = store.revision();

        let changed =
            move_element(&mut store, &mut drag, "default-submit", Point::new(40.0, 60.0), 2.0)
                .unwrap();

        assert!(changed);
        assert_eq!(store.element("default-submit").unwrap().position(), Point::new(40.0, 60.0));
        assert_eq!(store.revision(), revision + 1);
    }

    #[test]
    fn test_move_is_clamped() {
        let mut store = store();
        let mut drag = DragController::default();

        move_element(&mut store, &mut drag, "default-submit", Point::new(-50.0, 900.0), 1.0)
            .unwrap();

        // Button is 120 x 40 on a 500 x 500 canvas.
        assert_eq!(store.element("default-submit").unwrap().position(), Point::new(0.0, 460.0));
    }

    #[test]
    fn test_tiny_move_is_a_click() {
        let notifier = Rc::new(RecordingNotifier::new());
        let mut store = DesignStore::with_design(
            Design::default(),
            StorageGateway::new(MemoryStorage::new()),
            Rc::clone(&notifier),
        );
        let mut drag = DragController::default();
        let before = store.element("default-submit").unwrap().position();

        let changed = move_element(
            &mut store,
            &mut drag,
            "default-submit",
            before + kurbo::Vec2::new(1.0, 1.0),
            1.0,
        )
        .unwrap();

        assert!(!changed);
        assert_eq!(store.element("default-submit").unwrap().position(), before);
        assert!(matches!(notifier.last(), Some((Severity::Warning, _))));
    }

    #[test]
    fn test_update_requires_existing_element() {
        let mut store = store();
        let mut drag = DragController::default();
        let command = Commands::Update {
            id: "ghost".to_string(),
            content: Some("Hi".to_string()),
            color: None,
            background_color: None,
            font_size: None,
            border_radius: None,
            width: None,
            height: None,
            size: None,
            graphic: None,
        };

        assert!(run(command, &mut store, &mut drag).is_err());
    }

    #[test]
    fn test_add_unknown_kind_fails() {
        let mut store = store();
        let mut drag = DragController::default();
        let count = store.design().elements.len();

        let result = run(Commands::Add { kind: "slider".to_string() }, &mut store, &mut drag);

        let message = result.unwrap_err().to_string();
        assert!(message.contains("text, button, input, graphic"), "{message}");
        assert_eq!(store.design().elements.len(), count);
    }
}
