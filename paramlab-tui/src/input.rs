//! Input dispatch — overlays → global keys → focused-field keys, and mouse
//! events mapped onto selector pointer events.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use paramlab_core::{PointerEvent, PointerId, Preset, Thumb};

use crate::app::{AppState, EditTarget, Field, Overlay};
use crate::ui;

/// A terminal has a single mouse; every mouse event uses this pointer id.
pub const MOUSE_POINTER: PointerId = 1;

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match &app.overlay {
        Overlay::Alert { .. } => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::Edit(_) => {
            handle_edit_overlay(app, key);
            return;
        }
        Overlay::Grid => {
            handle_grid_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Tab => {
            app.focus = if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.focus.prev()
            } else {
                app.focus.next()
            };
            return;
        }
        KeyCode::BackTab => {
            app.focus = app.focus.prev();
            return;
        }
        KeyCode::Char('c') => {
            app.apply_preset(Preset::Creative);
            return;
        }
        KeyCode::Char('b') => {
            app.apply_preset(Preset::Balanced);
            return;
        }
        KeyCode::Char('p') => {
            app.apply_preset(Preset::Precise);
            return;
        }
        KeyCode::Char('v') => {
            app.cycle_provider();
            return;
        }
        KeyCode::Char('t') => {
            app.begin_edit(EditTarget::Title);
            return;
        }
        KeyCode::Char('e') => {
            app.begin_edit(EditTarget::Prompt);
            return;
        }
        KeyCode::Char('g') => {
            app.grid_scroll = 0;
            app.overlay = Overlay::Grid;
            return;
        }
        KeyCode::Enter => {
            app.submit();
            return;
        }
        KeyCode::Esc => {
            app.status_message = None;
            return;
        }
        _ => {}
    }

    // 3. Focused-field keys.
    match app.focus {
        Field::Temperature | Field::TopP => handle_selector_key(app, key),
        Field::Steps => match key.code {
            KeyCode::Char('h') | KeyCode::Left => app.adjust_steps(-1),
            KeyCode::Char('l') | KeyCode::Right => app.adjust_steps(1),
            _ => {}
        },
        Field::Provider => {
            if let KeyCode::Char('h' | 'l') | KeyCode::Left | KeyCode::Right = key.code {
                app.cycle_provider();
            }
        }
        Field::Title => {
            if let KeyCode::Char('i') = key.code {
                app.begin_edit(EditTarget::Title);
            }
        }
        Field::Prompt => {
            if let KeyCode::Char('i') = key.code {
                app.begin_edit(EditTarget::Prompt);
            }
        }
    }
}

fn handle_selector_key(app: &mut AppState, key: KeyEvent) {
    let Some(id) = app.focus.selector() else {
        return;
    };
    let big = if key.modifiers.contains(KeyModifiers::CONTROL) { 10 } else { 1 };
    let (thumb, steps) = match key.code {
        KeyCode::Char('h') | KeyCode::Left => (Thumb::Left, -big),
        KeyCode::Char('l') | KeyCode::Right => (Thumb::Left, big),
        KeyCode::Char('H') => (Thumb::Right, -big),
        KeyCode::Char('L') => (Thumb::Right, big),
        _ => return,
    };
    app.nudge(id, thumb, steps);
}

fn handle_edit_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.edit_buffer.clear();
            app.overlay = Overlay::None;
        }
        KeyCode::Enter => app.commit_edit(),
        KeyCode::Backspace => {
            app.edit_buffer.pop();
        }
        KeyCode::Char(c) => app.edit_buffer.push(c),
        _ => {}
    }
}

fn handle_grid_overlay(app: &mut AppState, key: KeyEvent) {
    let len = app.controller.combination_count();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('g') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.grid_scroll + 1 < len {
                app.grid_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.grid_scroll = app.grid_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

/// Map a left-button mouse event onto the selectors.
///
/// A press is routed to the selector under the cursor; drags and the release
/// go to whichever selector captured the pointer, wherever the cursor is.
pub fn handle_mouse(app: &mut AppState, mouse: MouseEvent) {
    let x = f64::from(mouse.column);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.overlay != Overlay::None || app.drag_owner.is_some() {
                return;
            }
            let layout = ui::form_layout(app.viewport);
            if let Some(id) = layout.hit_selector(mouse.column, mouse.row) {
                app.feed_pointer(
                    id,
                    &PointerEvent::Down {
                        pointer_id: MOUSE_POINTER,
                        x,
                    },
                );
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(id) = app.drag_owner {
                app.feed_pointer(
                    id,
                    &PointerEvent::Move {
                        pointer_id: MOUSE_POINTER,
                        x,
                    },
                );
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(id) = app.drag_owner {
                app.feed_pointer(
                    id,
                    &PointerEvent::Up {
                        pointer_id: MOUSE_POINTER,
                    },
                );
            }
        }
        _ => {}
    }
}

/// The terminal lost focus: any drag in progress is cancelled.
pub fn handle_focus_lost(app: &mut AppState) {
    app.cancel_drag();
}
