use std::time::Duration;

use eframe::egui;

use crate::command::{Command, CommandOutcome, DEFAULT_EXPORT_NAME};
use crate::event::SurfaceEvent;
use crate::input::InputHandler;
use crate::panels::{central_panel, tools_panel, TraceMode};
use crate::renderer::Renderer;
use crate::surface::DrawingSurface;
use crate::tool::{ToolKind, ToolSettings};

/// The tracing app. Tool settings and the tracing position are persisted
/// between runs; the drawing itself is not.
#[derive(serde::Deserialize, serde::Serialize, Debug)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct TraceApp {
    settings: ToolSettings,
    mode: TraceMode,
    guide_index: usize,
    show_guide: bool,

    #[serde(skip)]
    surface: DrawingSurface,
    #[serde(skip)]
    renderer: Renderer,
    #[serde(skip)]
    input: InputHandler,
    #[serde(skip)]
    background_input: String,
    #[serde(skip)]
    status: Option<String>,
}

impl Default for TraceApp {
    fn default() -> Self {
        Self {
            settings: ToolSettings::default(),
            mode: TraceMode::default(),
            guide_index: 0,
            show_guide: true,
            surface: DrawingSurface::new(),
            renderer: Renderer::new(),
            input: InputHandler::new(),
            background_input: String::new(),
            status: None,
        }
    }
}

impl TraceApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        if let Some(source) = app.settings.background.clone() {
            app.background_input = source.clone();
            app.surface.load_background(&source);
        }
        app
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    pub fn select_tool(&mut self, tool: ToolKind) {
        if self.settings.tool != tool {
            log::info!("Tool selected: {:?}", tool);
            self.settings.tool = tool;
        }
    }

    pub fn select_color(&mut self, color: &str) {
        self.settings.color = color.to_owned();
    }

    pub fn color_mut(&mut self) -> &mut String {
        &mut self.settings.color
    }

    pub fn brush_width_mut(&mut self) -> &mut u32 {
        &mut self.settings.brush_width
    }

    pub fn show_guide_mut(&mut self) -> &mut bool {
        &mut self.show_guide
    }

    pub fn background_input_mut(&mut self) -> &mut String {
        &mut self.background_input
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn undo(&mut self) {
        self.surface.execute(Command::Undo);
    }

    pub fn clear(&mut self) {
        self.surface.execute(Command::Clear);
    }

    /// Export the drawing as a PNG in the working directory.
    pub fn save_drawing(&mut self) {
        let command = Command::Export {
            file_name: DEFAULT_EXPORT_NAME.to_owned(),
        };
        let CommandOutcome::Exported(export) = self.surface.execute(command) else {
            self.status = Some("Nothing to save yet".to_owned());
            return;
        };

        let saved = std::env::current_dir()
            .map_err(Into::into)
            .and_then(|dir| export.save_to(&dir));
        self.status = Some(match saved {
            Ok(path) => format!("Saved {}", path.display()),
            Err(err) => {
                log::error!("Failed to save drawing: {}", err);
                format!("Could not save: {err}")
            }
        });
    }

    pub fn load_background(&mut self) {
        let source = self.background_input.trim().to_owned();
        if source.is_empty() {
            return;
        }
        self.settings.background = Some(source.clone());
        self.status = Some("Loading line art…".to_owned());
        self.surface.load_background(&source);
    }

    pub fn mode(&self) -> TraceMode {
        self.mode
    }

    /// Switch character set, restart from its first character and clear.
    pub fn set_mode(&mut self, mode: TraceMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.guide_index = 0;
        self.clear();
    }

    pub fn next_guide(&mut self) {
        self.guide_index = self.mode.next_index(self.guide_index);
        self.clear();
    }

    pub fn previous_guide(&mut self) {
        self.guide_index = self.mode.previous_index(self.guide_index);
        self.clear();
    }

    pub fn current_character(&self) -> char {
        self.mode.character(self.guide_index)
    }

    /// Size the surface to the canvas rect for this frame.
    pub fn layout_canvas(&mut self, rect: egui::Rect, pixels_per_point: f32) {
        self.surface.resize(rect.size(), pixels_per_point);
        self.surface.set_display_bounds(rect);
    }

    pub fn handle_canvas_input(&mut self, ctx: &egui::Context, rect: egui::Rect) {
        for event in self.input.process_input(ctx, rect) {
            self.surface.handle_input(&event, &self.settings);
        }
    }

    pub fn paint_canvas(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: egui::Rect) {
        self.renderer.sync(ctx, &self.surface);
        self.renderer.render(painter, rect);
        if self.show_guide {
            crate::panels::paint_guide(painter, rect, self.current_character());
        }
    }

    fn process_surface_events(&mut self, ctx: &egui::Context) {
        for event in self.surface.drain_events() {
            match event {
                SurfaceEvent::RedrawRequested => ctx.request_repaint(),
                SurfaceEvent::OverlayReady { ink_pixels } => {
                    self.status = Some(format!("Line art ready ({ink_pixels} ink pixels)"));
                }
                SurfaceEvent::BackgroundFailed { source, reason } => {
                    self.status = Some(format!("Could not load {source}: {reason}"));
                }
                SurfaceEvent::Initialized { .. }
                | SurfaceEvent::Resized { .. }
                | SurfaceEvent::HistoryChanged { .. } => {}
            }
        }
    }
}

impl eframe::App for TraceApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.surface.poll_background();

        let undo_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Z);
        if ctx.input_mut(|i| i.consume_shortcut(&undo_shortcut)) {
            self.undo();
        }

        tools_panel(self, ctx);
        central_panel(self, ctx);

        self.process_surface_events(ctx);
        if self.surface.is_loading_background() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
