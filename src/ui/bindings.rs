//! Named two-way bindings between panel widgets and the viewer state.
//!
//! Every editable field is a [`FieldBinding`] with a dotted path
//! (`"lights.0.position.w"`), a widget description and a getter/setter pair.
//! The panel reads through the getter every frame, so edits made elsewhere
//! (a reset, navigation) show up without any refresh step.

use std::rc::Rc;

use crate::{
    gfx::{
        lighting::{LightKind, LightSpace},
        rendering::ShadingMode,
        resources::material::{SHININESS_MAX, SHININESS_MIN},
    },
    state::ViewerState,
};

const COLOR_MAX: f32 = 255.0;
const ANGLE_MAX: f32 = 180.0;
const DRAG_SPEED: f32 = 0.1;

const SHADING_CHOICES: &[&str] = &["Phong", "Gouraud"];
const LIGHT_SPACE_CHOICES: &[&str] = &["World", "Camera"];
const LIGHT_KIND_CHOICES: &[&str] = &["Point", "Directional", "Spotlight"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Widget {
    Checkbox,
    /// Values outside `min..=max` are clamped before reaching the setter.
    Slider { min: f32, max: f32 },
    Drag { speed: f32 },
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BindingValue {
    Bool(bool),
    Float(f32),
    Index(usize),
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BindingError {
    #[error("no editable field named '{0}'")]
    UnknownPath(String),

    #[error("field '{path}' expects a {expected} value")]
    TypeMismatch { path: String, expected: &'static str },

    #[error("choice {index} is out of range for '{path}'")]
    ChoiceOutOfRange { path: String, index: usize },

    #[error("field '{path}' cannot hold a non-finite value")]
    NotFinite { path: String },
}

type Getter = Box<dyn Fn(&ViewerState) -> BindingValue>;
type Setter = Box<dyn Fn(&mut ViewerState, BindingValue)>;

pub struct FieldBinding {
    pub path: String,
    pub folder: String,
    pub label: String,
    pub widget: Widget,
    getter: Getter,
    setter: Setter,
}

impl FieldBinding {
    pub fn get(&self, state: &ViewerState) -> BindingValue {
        (self.getter)(state)
    }

    /// Type-checks `value` against the widget, clamps sliders, then writes.
    /// NaN and infinities are rejected before any clamping.
    pub fn set(&self, state: &mut ViewerState, value: BindingValue) -> Result<(), BindingError> {
        if let BindingValue::Float(v) = value {
            if !v.is_finite() {
                return Err(BindingError::NotFinite {
                    path: self.path.clone(),
                });
            }
        }
        let value = match (self.widget, value) {
            (Widget::Checkbox, BindingValue::Bool(_)) => value,
            (Widget::Slider { min, max }, BindingValue::Float(v)) => BindingValue::Float(v.clamp(min, max)),
            (Widget::Drag { .. }, BindingValue::Float(_)) => value,
            (Widget::Choice(options), BindingValue::Index(index)) => {
                if index >= options.len() {
                    return Err(BindingError::ChoiceOutOfRange {
                        path: self.path.clone(),
                        index,
                    });
                }
                value
            }
            (widget, _) => {
                return Err(BindingError::TypeMismatch {
                    path: self.path.clone(),
                    expected: expected_kind(widget),
                })
            }
        };
        (self.setter)(state, value);
        Ok(())
    }
}

fn expected_kind(widget: Widget) -> &'static str {
    match widget {
        Widget::Checkbox => "bool",
        Widget::Slider { .. } | Widget::Drag { .. } => "float",
        Widget::Choice(_) => "choice index",
    }
}

/// Every editable field of the viewer, in panel order.
pub struct PanelBindings {
    fields: Vec<FieldBinding>,
}

impl PanelBindings {
    /// Bindings for the options, camera, editable material and `light_count`
    /// light slots.
    pub fn for_state(light_count: usize) -> Self {
        let mut builder = Builder::default();
        builder.options();
        builder.camera();
        builder.material();
        for i in 0..light_count {
            builder.light(i);
        }
        Self { fields: builder.fields }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldBinding> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn find(&self, path: &str) -> Option<&FieldBinding> {
        self.fields.iter().find(|f| f.path == path)
    }

    pub fn get(&self, path: &str, state: &ViewerState) -> Result<BindingValue, BindingError> {
        self.find(path)
            .map(|f| f.get(state))
            .ok_or_else(|| BindingError::UnknownPath(path.to_string()))
    }

    pub fn set(&self, path: &str, state: &mut ViewerState, value: BindingValue) -> Result<(), BindingError> {
        self.find(path)
            .ok_or_else(|| BindingError::UnknownPath(path.to_string()))?
            .set(state, value)
    }

    /// Folder names in first-appearance order.
    pub fn folders(&self) -> Vec<&str> {
        let mut folders: Vec<&str> = Vec::new();
        for field in &self.fields {
            if !folders.contains(&field.folder.as_str()) {
                folders.push(&field.folder);
            }
        }
        folders
    }
}

#[derive(Default)]
struct Builder {
    fields: Vec<FieldBinding>,
}

impl Builder {
    fn push(
        &mut self,
        path: String,
        folder: &str,
        label: String,
        widget: Widget,
        getter: Getter,
        setter: Setter,
    ) {
        self.fields.push(FieldBinding {
            path,
            folder: folder.to_string(),
            label,
            widget,
            getter,
            setter,
        });
    }

    fn checkbox(
        &mut self,
        path: String,
        folder: &str,
        label: &str,
        get: impl Fn(&ViewerState) -> bool + 'static,
        set: impl Fn(&mut ViewerState, bool) + 'static,
    ) {
        self.push(
            path,
            folder,
            label.to_string(),
            Widget::Checkbox,
            Box::new(move |s| BindingValue::Bool(get(s))),
            Box::new(move |s, v| {
                if let BindingValue::Bool(v) = v {
                    set(s, v)
                }
            }),
        );
    }

    fn float(
        &mut self,
        path: String,
        folder: &str,
        label: String,
        widget: Widget,
        get: impl Fn(&ViewerState) -> f32 + 'static,
        set: impl Fn(&mut ViewerState, f32) + 'static,
    ) {
        self.push(
            path,
            folder,
            label,
            widget,
            Box::new(move |s| BindingValue::Float(get(s))),
            Box::new(move |s, v| {
                if let BindingValue::Float(v) = v {
                    set(s, v)
                }
            }),
        );
    }

    fn choice(
        &mut self,
        path: String,
        folder: &str,
        label: &str,
        options: &'static [&'static str],
        get: impl Fn(&ViewerState) -> usize + 'static,
        set: impl Fn(&mut ViewerState, usize) + 'static,
    ) {
        self.push(
            path,
            folder,
            label.to_string(),
            Widget::Choice(options),
            Box::new(move |s| BindingValue::Index(get(s))),
            Box::new(move |s, v| {
                if let BindingValue::Index(v) = v {
                    set(s, v)
                }
            }),
        );
    }

    /// One binding per component of a vector field.
    #[allow(clippy::too_many_arguments)]
    fn components<const N: usize>(
        &mut self,
        path: &str,
        folder: &str,
        label: &str,
        names: [&str; N],
        widget: Widget,
        get: impl Fn(&ViewerState) -> [f32; N] + 'static,
        set: impl Fn(&mut ViewerState, usize, f32) + 'static,
    ) {
        let get = Rc::new(get);
        let set = Rc::new(set);
        for (c, name) in names.iter().enumerate() {
            let get = Rc::clone(&get);
            let set = Rc::clone(&set);
            self.float(
                format!("{path}.{name}"),
                folder,
                format!("{label} {name}"),
                widget,
                move |s| get(s)[c],
                move |s, v| set(s, c, v),
            );
        }
    }

    fn options(&mut self) {
        let folder = "options";
        self.checkbox(
            "options.backface_culling".into(),
            folder,
            "backface culling",
            |s| s.options.backface_culling,
            |s, v| s.options.backface_culling = v,
        );
        self.checkbox(
            "options.depth_test".into(),
            folder,
            "depth test",
            |s| s.options.depth_test,
            |s, v| s.options.depth_test = v,
        );
        self.checkbox(
            "options.wireframe".into(),
            folder,
            "wireframe",
            |s| s.options.wireframe,
            |s, v| s.options.wireframe = v,
        );
        self.choice(
            "options.shading_mode".into(),
            folder,
            "shading mode",
            SHADING_CHOICES,
            |s| ShadingMode::ALL.iter().position(|&m| m == s.options.shading_mode).unwrap_or(0),
            |s, i| {
                if let Some(&mode) = ShadingMode::ALL.get(i) {
                    s.options.shading_mode = mode;
                }
            },
        );
        self.choice(
            "options.light_space".into(),
            folder,
            "light space",
            LIGHT_SPACE_CHOICES,
            |s| LightSpace::ALL.iter().position(|&m| m == s.options.light_space).unwrap_or(0),
            |s, i| {
                if let Some(&space) = LightSpace::ALL.get(i) {
                    s.options.light_space = space;
                }
            },
        );
    }

    fn camera(&mut self) {
        let folder = "camera";
        self.float(
            "camera.fovy".into(),
            folder,
            "fovy".into(),
            Widget::Slider { min: 1.0, max: 100.0 },
            |s| s.camera.fovy(),
            |s, v| s.camera.set_fovy(v),
        );
        self.float(
            "camera.near".into(),
            folder,
            "near".into(),
            Widget::Slider { min: 0.1, max: 40.0 },
            |s| s.camera.near(),
            |s, v| s.camera.set_near(v),
        );
        self.float(
            "camera.far".into(),
            folder,
            "far".into(),
            Widget::Slider { min: 0.1, max: 40.0 },
            |s| s.camera.far(),
            |s, v| s.camera.set_far(v),
        );

        let drag = Widget::Drag { speed: DRAG_SPEED };
        self.components(
            "camera.eye",
            folder,
            "eye",
            ["x", "y", "z"],
            drag,
            |s| s.camera.eye.into(),
            |s, c, v| s.camera.eye[c] = v,
        );
        self.components(
            "camera.at",
            folder,
            "at",
            ["x", "y", "z"],
            drag,
            |s| s.camera.at.into(),
            |s, c, v| s.camera.at[c] = v,
        );
        self.components(
            "camera.up",
            folder,
            "up",
            ["x", "y", "z"],
            drag,
            |s| s.camera.up.into(),
            |s, c, v| s.camera.up[c] = v,
        );
    }

    fn material(&mut self) {
        let folder = "material";
        let color = Widget::Slider { min: 0.0, max: COLOR_MAX };
        let rgb = ["r", "g", "b"];
        self.components(
            "material.Ka",
            folder,
            "Ka",
            rgb,
            color,
            |s| s.material.ka,
            |s, c, v| s.material.ka[c] = v,
        );
        self.components(
            "material.Kd",
            folder,
            "Kd",
            rgb,
            color,
            |s| s.material.kd,
            |s, c, v| s.material.kd[c] = v,
        );
        self.components(
            "material.Ks",
            folder,
            "Ks",
            rgb,
            color,
            |s| s.material.ks,
            |s, c, v| s.material.ks[c] = v,
        );
        self.float(
            "material.shininess".into(),
            folder,
            "shininess".into(),
            Widget::Slider {
                min: SHININESS_MIN,
                max: SHININESS_MAX,
            },
            |s| s.material.shininess,
            |s, v| s.material.set_shininess(v),
        );
    }

    fn light(&mut self, i: usize) {
        let folder = format!("Light {}", i + 1);
        let folder = folder.as_str();
        let path = |member: &str| format!("lights.{i}.{member}");

        self.checkbox(
            path("enabled"),
            folder,
            "enabled",
            move |s| s.lights.get(i).is_some_and(|l| l.enabled),
            move |s, v| {
                if let Some(light) = s.lights.get_mut(i) {
                    light.enabled = v;
                }
            },
        );
        self.choice(
            path("type"),
            folder,
            "type",
            LIGHT_KIND_CHOICES,
            move |s| s.lights.get(i).map_or(0, |l| l.kind().index()),
            move |s, index| {
                if let (Some(light), Some(kind)) = (s.lights.get_mut(i), LightKind::from_index(index)) {
                    light.set_kind(kind);
                }
            },
        );

        let drag = Widget::Drag { speed: DRAG_SPEED };
        self.components(
            &path("position"),
            folder,
            "position",
            ["x", "y", "z", "w"],
            drag,
            move |s| s.lights.get(i).map_or([0.0; 4], |l| l.position.into()),
            move |s, c, v| {
                if let Some(light) = s.lights.get_mut(i) {
                    light.position[c] = v;
                }
            },
        );

        let color = Widget::Slider { min: 0.0, max: COLOR_MAX };
        let rgb = ["r", "g", "b"];
        self.components(
            &path("ambient"),
            folder,
            "ambient",
            rgb,
            color,
            move |s| s.lights.get(i).map_or([0.0; 3], |l| l.ambient),
            move |s, c, v| {
                if let Some(light) = s.lights.get_mut(i) {
                    light.ambient[c] = v;
                }
            },
        );
        self.components(
            &path("diffuse"),
            folder,
            "diffuse",
            rgb,
            color,
            move |s| s.lights.get(i).map_or([0.0; 3], |l| l.diffuse),
            move |s, c, v| {
                if let Some(light) = s.lights.get_mut(i) {
                    light.diffuse[c] = v;
                }
            },
        );
        self.components(
            &path("specular"),
            folder,
            "specular",
            rgb,
            color,
            move |s| s.lights.get(i).map_or([0.0; 3], |l| l.specular),
            move |s, c, v| {
                if let Some(light) = s.lights.get_mut(i) {
                    light.specular[c] = v;
                }
            },
        );
        self.components(
            &path("axis"),
            folder,
            "axis",
            ["x", "y", "z"],
            drag,
            move |s| s.lights.get(i).map_or([0.0; 3], |l| l.axis.into()),
            move |s, c, v| {
                if let Some(light) = s.lights.get_mut(i) {
                    light.axis[c] = v;
                }
            },
        );

        let angle = Widget::Slider { min: 0.0, max: ANGLE_MAX };
        self.float(
            path("aperture"),
            folder,
            "aperture".into(),
            angle,
            move |s| s.lights.get(i).map_or(0.0, |l| l.aperture),
            move |s, v| {
                if let Some(light) = s.lights.get_mut(i) {
                    light.set_aperture(v);
                }
            },
        );
        self.float(
            path("cutoff"),
            folder,
            "cutoff".into(),
            angle,
            move |s| s.lights.get(i).map_or(0.0, |l| l.cutoff),
            move |s, v| {
                if let Some(light) = s.lights.get_mut(i) {
                    light.set_cutoff(v);
                }
            },
        );
    }
}
