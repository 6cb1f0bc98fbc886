//! WebAssembly bindings for studio-core.
//!
//! This module provides JavaScript-callable functions when compiled to WASM.
//! Everything crosses the boundary as JSON.

use wasm_bindgen::prelude::*;

use crate::event::{Point, PointerEvent, PointerPhase, PointerTarget};
use crate::render::DisplayList;
use crate::{CanvasState, Command, Editor, EditorConfig};

/// Initialize the studio WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();
}

/// Editor instance for WASM.
#[wasm_bindgen]
pub struct WasmEditor {
    editor: Editor,
}

impl Default for WasmEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor with the default configuration.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            editor: Editor::default(),
        }
    }

    /// Create an editor from a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns an error string if the JSON is malformed.
    #[wasm_bindgen(js_name = withConfigJson)]
    pub fn with_config_json(json: &str) -> Result<WasmEditor, String> {
        let config = EditorConfig::from_json(json).map_err(|e| e.to_string())?;
        Ok(Self {
            editor: Editor::new(config),
        })
    }

    /// Get the whole composition as JSON.
    #[wasm_bindgen(js_name = getSnapshotJson)]
    #[must_use]
    pub fn get_snapshot_json(&self) -> String {
        self.editor.snapshot().to_json().unwrap_or_default()
    }

    /// Replace the composition from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if JSON parsing fails.
    #[wasm_bindgen(js_name = loadSnapshotJson)]
    pub fn load_snapshot_json(&mut self, json: &str) -> Result<(), String> {
        let state = CanvasState::from_json(json).map_err(|e| e.to_string())?;
        self.editor.end();
        self.editor.store_mut().replace(state);
        Ok(())
    }

    /// Get the selection, including its element snapshot, as JSON.
    #[wasm_bindgen(js_name = getSelectionJson)]
    #[must_use]
    pub fn get_selection_json(&self) -> String {
        serde_json::to_string(self.editor.selection()).unwrap_or_default()
    }

    /// Get the current page's draw list as JSON, filtered to clips active at
    /// the playhead when `at_playhead` is set.
    #[wasm_bindgen(js_name = getDisplayListJson)]
    #[must_use]
    pub fn get_display_list_json(&self, at_playhead: bool) -> String {
        let at_time = at_playhead.then(|| self.editor.playhead().position());
        let page = self.editor.store().current_page_index();
        DisplayList::build(&self.editor.snapshot(), page, at_time)
            .and_then(|list| serde_json::to_string(&list).ok())
            .unwrap_or_default()
    }

    /// Apply one command serialized as JSON and return its outcome as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if parsing fails or the command is rejected.
    #[wasm_bindgen(js_name = applyCommandJson)]
    pub fn apply_command_json(&mut self, json: &str) -> Result<String, String> {
        let command: Command = serde_json::from_str(json).map_err(|e| e.to_string())?;
        let outcome = self.editor.apply(command).map_err(|e| e.to_string())?;
        serde_json::to_string(&outcome).map_err(|e| e.to_string())
    }

    /// Route a pointer event.
    ///
    /// `phase` is `down`, `move` or `up`. `target_json` optionally names what
    /// was pressed; an empty string hit-tests the current page.
    ///
    /// # Errors
    ///
    /// Returns an error string for an unknown phase or malformed target.
    pub fn pointer(
        &mut self,
        phase: &str,
        x: f32,
        y: f32,
        target_json: &str,
    ) -> Result<(), String> {
        let phase = match phase {
            "down" => PointerPhase::Down,
            "move" => PointerPhase::Move,
            "up" => PointerPhase::Up,
            other => return Err(format!("Unknown pointer phase: {other}")),
        };
        let target: Option<PointerTarget> = if target_json.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(target_json).map_err(|e| e.to_string())?)
        };
        self.editor.handle_pointer(PointerEvent {
            phase,
            position: Point::new(x, y),
            target,
        });
        Ok(())
    }

    /// Whether a pointer session is active.
    #[wasm_bindgen(js_name = isIdle)]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.editor.is_idle()
    }

    /// Advance the playhead by `millis` milliseconds. Negative, non-finite
    /// and out-of-range values are ignored.
    pub fn tick(&mut self, millis: f64) {
        self.editor.playhead_mut().tick_millis(millis);
    }

    /// Current playhead position in seconds.
    #[wasm_bindgen(js_name = playheadPosition)]
    #[must_use]
    pub fn playhead_position(&self) -> f64 {
        self.editor.playhead().position()
    }
}
