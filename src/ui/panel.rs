//! The editing panel
//!
//! Draws every [`FieldBinding`] grouped by folder. Values are read through
//! the bindings each frame and written back only when a widget changes.

use crate::{
    state::ViewerState,
    ui::bindings::{BindingValue, FieldBinding, PanelBindings, Widget},
};

/// Editing panel for the viewer state.
///
/// # Arguments
/// * `ui` - ImGui UI context
/// * `bindings` - Fields to show, in order
/// * `state` - State the bindings read and write
pub fn editing_panel(ui: &imgui::Ui, bindings: &PanelBindings, state: &mut ViewerState) {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }
    let panel_width = (display_size[0] * 0.3).clamp(320.0, 460.0);
    let panel_height = (display_size[1] * 0.9).max(400.0);

    ui.window("Scene Editor")
        .size([panel_width, panel_height], imgui::Condition::FirstUseEver)
        .position([10.0, 10.0], imgui::Condition::FirstUseEver)
        .resizable(true)
        .collapsible(true)
        .build(|| {
            render_help(ui, state);
            ui.separator();

            for folder in bindings.folders() {
                let flags = if folder == "options" {
                    imgui::TreeNodeFlags::DEFAULT_OPEN
                } else {
                    imgui::TreeNodeFlags::empty()
                };
                if ui.collapsing_header(folder, flags) {
                    for field in bindings.iter().filter(|f| f.folder == folder) {
                        render_field(ui, field, state);
                    }
                }
            }
        });
}

fn render_help(ui: &imgui::Ui, state: &mut ViewerState) {
    ui.text_disabled("W/A/S/D move, Up/Down rise and sink");
    ui.text_disabled("drag to orbit, R resets, Esc quits");
    if ui.button("Reset camera and material") {
        state.reset();
    }
}

fn render_field(ui: &imgui::Ui, field: &FieldBinding, state: &mut ViewerState) {
    // The path keeps ImGui ids unique across folders sharing a label.
    let id = format!("{}##{}", field.label, field.path);

    let changed = match (field.widget, field.get(state)) {
        (Widget::Checkbox, BindingValue::Bool(mut value)) => {
            ui.checkbox(&id, &mut value).then_some(BindingValue::Bool(value))
        }
        (Widget::Slider { min, max }, BindingValue::Float(mut value)) => {
            ui.slider(&id, min, max, &mut value).then_some(BindingValue::Float(value))
        }
        (Widget::Drag { speed }, BindingValue::Float(mut value)) => imgui::Drag::new(&id)
            .speed(speed)
            .display_format("%.2f")
            .build(ui, &mut value)
            .then_some(BindingValue::Float(value)),
        (Widget::Choice(options), BindingValue::Index(mut index)) => ui
            .combo_simple_string(&id, &mut index, options)
            .then_some(BindingValue::Index(index)),
        (widget, value) => {
            log::warn!("{}: {:?} cannot show {:?}", field.path, widget, value);
            None
        }
    };

    if let Some(value) = changed {
        if let Err(err) = field.set(state, value) {
            log::warn!("{err}");
        }
    }
}
