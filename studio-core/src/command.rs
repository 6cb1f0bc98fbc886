//! Serializable editor commands.
//!
//! Every editor operation has a JSON form so a host (the WASM bridge, the
//! CLI's script replay) can drive the editor without linking against its
//! Rust API.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::event::{Point, PointerEvent};
use crate::layering::ZDirection;
use crate::timeline::ClipEdge;
use crate::transform::ResizeHandle;
use crate::{CanvasResult, Editor, Element, ElementId, ElementPatch, SelectionTarget};

/// One editor operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Insert an element.
    AddElement {
        /// The element to insert.
        element: Element,
        /// Target page; the current page when absent.
        #[serde(default)]
        page: Option<usize>,
        /// Explicit z-index; in front of everything when absent.
        #[serde(default)]
        z_index: Option<i32>,
    },
    /// Merge a partial update into an element.
    UpdateElement {
        /// Target element.
        id: ElementId,
        /// Fields to overwrite.
        patch: ElementPatch,
    },
    /// Delete an element.
    RemoveElement {
        /// Target element.
        id: ElementId,
    },
    /// Copy an element with an offset.
    DuplicateElement {
        /// Source element.
        id: ElementId,
    },
    /// Record the length of an element's media.
    SetMediaDuration {
        /// Target element.
        id: ElementId,
        /// Media length in seconds.
        seconds: f64,
    },
    /// Replace the selection.
    Select {
        /// What to select.
        target: SelectionTarget,
    },
    /// Start moving an element.
    BeginDrag {
        /// Target element.
        id: ElementId,
        /// Pointer position.
        pointer: Point,
    },
    /// Start resizing an element.
    BeginResize {
        /// Target element.
        id: ElementId,
        /// Dragged handle.
        handle: ResizeHandle,
        /// Pointer position.
        pointer: Point,
    },
    /// Start moving a clip.
    BeginClipDrag {
        /// Target element.
        id: ElementId,
        /// Pointer position in timeline pixels.
        pointer: Point,
    },
    /// Start trimming or extending a clip.
    BeginClipResize {
        /// Target element.
        id: ElementId,
        /// Dragged edge.
        edge: ClipEdge,
        /// Pointer position in timeline pixels.
        pointer: Point,
    },
    /// Feed the active session.
    PointerMove {
        /// Pointer position.
        pointer: Point,
    },
    /// End the active session.
    End,
    /// Route a raw pointer event.
    Pointer {
        /// The event.
        event: PointerEvent,
    },
    /// Swap an element with its z-order neighbor.
    NudgeZ {
        /// Target element.
        id: ElementId,
        /// Towards the front or the back.
        direction: ZDirection,
    },
    /// Renumber the current page from a front-to-back list.
    ReorderZ {
        /// Element ids, front first.
        order: Vec<ElementId>,
    },
    /// Append a page.
    AddPage,
    /// Copy a page.
    DuplicatePage {
        /// Source page.
        index: usize,
    },
    /// Delete a page.
    RemovePage {
        /// Target page.
        index: usize,
    },
    /// Switch the current page.
    SetCurrentPage {
        /// Target page.
        index: usize,
    },
    /// Resize the canvas.
    SetCanvasSize {
        /// New width.
        width: u32,
        /// New height.
        height: u32,
    },
    /// Change the canvas background.
    SetBackgroundColor {
        /// CSS color.
        color: String,
    },
    /// Start the playhead.
    Play,
    /// Stop the playhead.
    Pause,
    /// Move the playhead.
    Seek {
        /// Target time in seconds.
        seconds: f64,
    },
    /// Advance the playhead by wall-clock time.
    Tick {
        /// Elapsed milliseconds.
        millis: u64,
    },
}

/// What a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "value", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// The command took effect.
    Done,
    /// The command was valid but changed nothing.
    Ignored,
    /// A new element was created.
    Created(ElementId),
    /// A page was created or became current.
    PageIndex(usize),
}

impl CommandOutcome {
    fn from_flag(changed: bool) -> Self {
        if changed {
            Self::Done
        } else {
            Self::Ignored
        }
    }
}

impl Editor {
    /// Run one command.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying operation, e.g. starting a session
    /// on a locked element or addressing a page that does not exist.
    pub fn apply(&mut self, command: Command) -> CanvasResult<CommandOutcome> {
        tracing::trace!("Applying {command:?}");
        let outcome = match command {
            Command::AddElement {
                element,
                page,
                z_index,
            } => {
                let page = page.unwrap_or_else(|| self.store().current_page_index());
                let id = self.store_mut().insert_element(page, element, z_index)?;
                CommandOutcome::Created(id)
            }
            Command::UpdateElement { id, patch } => {
                CommandOutcome::from_flag(self.update_element(id, &patch))
            }
            Command::RemoveElement { id } => {
                CommandOutcome::from_flag(self.remove_element(id).is_some())
            }
            Command::DuplicateElement { id } => self
                .duplicate_element(id)
                .map_or(CommandOutcome::Ignored, CommandOutcome::Created),
            Command::SetMediaDuration { id, seconds } => {
                CommandOutcome::from_flag(self.set_media_duration(id, seconds))
            }
            Command::Select { target } => {
                self.set_selection(target);
                CommandOutcome::Done
            }
            Command::BeginDrag { id, pointer } => {
                self.begin_drag(id, pointer)?;
                CommandOutcome::Done
            }
            Command::BeginResize {
                id,
                handle,
                pointer,
            } => {
                self.begin_resize(id, handle, pointer)?;
                CommandOutcome::Done
            }
            Command::BeginClipDrag { id, pointer } => {
                self.begin_clip_drag(id, pointer)?;
                CommandOutcome::Done
            }
            Command::BeginClipResize { id, edge, pointer } => {
                self.begin_clip_resize(id, edge, pointer)?;
                CommandOutcome::Done
            }
            Command::PointerMove { pointer } => {
                CommandOutcome::from_flag(self.on_pointer_move(pointer))
            }
            Command::End => CommandOutcome::from_flag(self.end()),
            Command::Pointer { event } => {
                self.handle_pointer(event);
                CommandOutcome::Done
            }
            Command::NudgeZ { id, direction } => {
                CommandOutcome::from_flag(self.nudge_z(id, direction))
            }
            Command::ReorderZ { order } => CommandOutcome::from_flag(self.reorder_z(&order)),
            Command::AddPage => CommandOutcome::PageIndex(self.add_page()),
            Command::DuplicatePage { index } => {
                CommandOutcome::PageIndex(self.duplicate_page(index)?)
            }
            Command::RemovePage { index } => CommandOutcome::from_flag(self.remove_page(index)?),
            Command::SetCurrentPage { index } => {
                self.set_current_page(index)?;
                CommandOutcome::PageIndex(index)
            }
            Command::SetCanvasSize { width, height } => {
                self.set_canvas_size(width, height);
                CommandOutcome::Done
            }
            Command::SetBackgroundColor { color } => {
                self.set_background_color(color);
                CommandOutcome::Done
            }
            Command::Play => {
                self.playhead_mut().play();
                CommandOutcome::Done
            }
            Command::Pause => {
                self.playhead_mut().pause();
                CommandOutcome::Done
            }
            Command::Seek { seconds } => {
                self.playhead_mut().seek(seconds);
                CommandOutcome::Done
            }
            Command::Tick { millis } => {
                self.tick(Duration::from_millis(millis));
                CommandOutcome::Done
            }
        };
        Ok(outcome)
    }

    /// Run a sequence of commands, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the index of the failing command together with its error.
    pub fn apply_all<I>(&mut self, commands: I) -> Result<usize, (usize, crate::CanvasError)>
    where
        I: IntoIterator<Item = Command>,
    {
        let mut applied = 0;
        for command in commands {
            self.apply(command).map_err(|e| (applied, e))?;
            applied += 1;
        }
        Ok(applied)
    }
}
