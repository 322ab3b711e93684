//! Keyboard-driven parameter panel for the ray-marched object
//!
//! The panel owns the live [`TransformParams`]. Keys pick a group
//! (translation, rotation, scale) and an axis, and nudge the selected value.
//! Every change is clamped to the group's range, so the renderer can use a
//! snapshot without checking it again.

use std::fmt::Write as _;
use std::ops::RangeInclusive;
use winit::keyboard::{Key, NamedKey};
use zarya_core::prelude::{TransformParams, Vec3};
use zarya_core::transform::{ROTATION_RANGE, SCALE_RANGE, TRANSLATION_RANGE};

/// Step applied per key press
pub const FINE_STEP: f32 = 0.1;
/// Step applied per key press while Shift is held
pub const COARSE_STEP: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Translation,
    Rotation,
    Scale,
}

impl Group {
    pub fn range(self) -> RangeInclusive<f32> {
        match self {
            Self::Translation => TRANSLATION_RANGE,
            Self::Rotation => ROTATION_RANGE,
            Self::Scale => SCALE_RANGE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Translation => "translation",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
        }
    }

    pub fn value(self, params: &TransformParams) -> Vec3 {
        match self {
            Self::Translation => params.translation,
            Self::Rotation => params.rotation,
            Self::Scale => params.scale,
        }
    }

    fn field(self, params: &mut TransformParams) -> &mut Vec3 {
        match self {
            Self::Translation => &mut params.translation,
            Self::Rotation => &mut params.rotation,
            Self::Scale => &mut params.scale,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Edit requested by a key press
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelCommand {
    Select(Group),
    SelectAxis(Axis),
    /// Add `delta` to the selected component
    Adjust(f32),
    /// Restore the selected group to its initial value
    Reset,
}

/// Map a pressed key to a panel edit. Unbound keys give `None`.
pub fn command_for_key(key: &Key, shift: bool) -> Option<PanelCommand> {
    let step = if shift { COARSE_STEP } else { FINE_STEP };
    match key {
        Key::Named(NamedKey::ArrowUp) => Some(PanelCommand::Adjust(step)),
        Key::Named(NamedKey::ArrowDown) => Some(PanelCommand::Adjust(-step)),
        Key::Named(NamedKey::Backspace) => Some(PanelCommand::Reset),
        Key::Character(c) => match c.as_str() {
            "t" | "T" => Some(PanelCommand::Select(Group::Translation)),
            "r" | "R" => Some(PanelCommand::Select(Group::Rotation)),
            "s" | "S" => Some(PanelCommand::Select(Group::Scale)),
            "x" | "X" => Some(PanelCommand::SelectAxis(Axis::X)),
            "y" | "Y" => Some(PanelCommand::SelectAxis(Axis::Y)),
            "z" | "Z" => Some(PanelCommand::SelectAxis(Axis::Z)),
            "+" | "=" => Some(PanelCommand::Adjust(step)),
            "-" | "_" => Some(PanelCommand::Adjust(-step)),
            _ => None,
        },
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct ParameterPanel {
    params: TransformParams,
    initial: TransformParams,
    group: Group,
    axis: Axis,
}

impl Default for ParameterPanel {
    fn default() -> Self {
        Self::new(TransformParams::default())
    }
}

impl ParameterPanel {
    /// Start from `initial`, clamped to the panel ranges
    pub fn new(initial: TransformParams) -> Self {
        let initial = initial.clamped();
        Self {
            params: initial,
            initial,
            group: Group::Translation,
            axis: Axis::X,
        }
    }

    /// Copy of the current values, taken once per frame
    pub fn snapshot(&self) -> TransformParams {
        self.params
    }

    pub fn selection(&self) -> (Group, Axis) {
        (self.group, self.axis)
    }

    pub fn apply(&mut self, command: PanelCommand) {
        match command {
            PanelCommand::Select(group) => self.group = group,
            PanelCommand::SelectAxis(axis) => self.axis = axis,
            PanelCommand::Adjust(delta) => self.adjust(delta),
            PanelCommand::Reset => {
                *self.group.field(&mut self.params) = self.group.value(&self.initial);
            }
        }
    }

    fn adjust(&mut self, delta: f32) {
        let range = self.group.range();
        let value = &mut self.group.field(&mut self.params)[self.axis.index()];
        *value = (*value + delta).clamp(*range.start(), *range.end());
    }

    /// Text shown by the overlay, selected component marked with `>`
    pub fn readout(&self) -> String {
        let mut text = String::new();
        for group in [Group::Translation, Group::Rotation, Group::Scale] {
            let v = group.value(&self.params);
            let marker = if group == self.group { '>' } else { ' ' };
            let _ = write!(text, "{marker} {:<11}", group.name());
            for (axis, value) in [Axis::X, Axis::Y, Axis::Z].into_iter().zip(v.to_array()) {
                let selected = group == self.group && axis == self.axis;
                let _ = if selected {
                    write!(text, " [{value:7.1}]")
                } else {
                    write!(text, "  {value:7.1} ")
                };
            }
            text.push('\n');
        }
        text
    }
}
