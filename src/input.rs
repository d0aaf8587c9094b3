use egui::{Context, Pos2, Rect};

/// Pointer input in screen coordinates, reduced to the primary contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { position: Pos2 },
    PointerMove { position: Pos2 },
    PointerUp { position: Pos2 },
    /// The pointer left the canvas or the window
    PointerLeave { last_known_position: Pos2 },
}

/// Turns egui pointer state into [`InputEvent`]s for the canvas.
///
/// Only the primary button is tracked; egui already folds the first touch
/// contact into it, so additional fingers never reach the surface.
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    pressed_in_canvas: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_input(&mut self, ctx: &Context, canvas_rect: Rect) -> Vec<InputEvent> {
        ctx.input(|input| {
            self.translate(
                input.pointer.hover_pos(),
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                canvas_rect,
            )
        })
    }

    /// Core of [`Self::process_input`], separated from egui for testing.
    pub fn translate(
        &mut self,
        hover: Option<Pos2>,
        pressed: bool,
        released: bool,
        canvas_rect: Rect,
    ) -> Vec<InputEvent> {
        let mut events = Vec::new();

        match hover {
            Some(pos) => {
                if pressed && canvas_rect.contains(pos) {
                    self.pressed_in_canvas = true;
                    events.push(InputEvent::PointerDown { position: pos });
                } else if self.pressed_in_canvas && Some(pos) != self.last_pointer_pos {
                    if canvas_rect.contains(pos) {
                        events.push(InputEvent::PointerMove { position: pos });
                    } else {
                        self.pressed_in_canvas = false;
                        events.push(InputEvent::PointerLeave {
                            last_known_position: pos,
                        });
                    }
                }

                if released && self.pressed_in_canvas {
                    self.pressed_in_canvas = false;
                    events.push(InputEvent::PointerUp { position: pos });
                }
                self.last_pointer_pos = Some(pos);
            }
            None => {
                if let Some(last) = self.last_pointer_pos.take() {
                    if self.pressed_in_canvas {
                        self.pressed_in_canvas = false;
                        events.push(InputEvent::PointerLeave {
                            last_known_position: last,
                        });
                    }
                }
            }
        }

        events
    }
}
