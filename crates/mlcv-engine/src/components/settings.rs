//! The emitter settings record, the unit that gets edited, exported and
//! restored. The molecule population is always derived from it.

use serde::{Deserialize, Serialize};

use crate::api::types::{Color, EmitterId};

pub const MAX_MOLECULE_AMOUNT: u32 = 150;
pub const MAX_SPAWN_RADIUS: f32 = 400.0;
pub const MAX_MOLECULE_SIZE: f32 = 500.0;
pub const MAX_POINT_RADIUS: f32 = 250.0;
pub const MAX_PERCENT: f32 = 100.0;

/// Declarative settings of one emitter.
///
/// Numbers are stored as `f32`. Documents written with double precision
/// (coordinates with more than about seven significant digits) are rounded
/// to the nearest `f32` on import; a value that has been through one import
/// exports and re-imports unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmitterSettings {
    /// Anchor X.
    pub x: f32,
    /// Anchor Y.
    pub y: f32,
    /// Fill color for every molecule.
    pub color: Color,
    /// Population before quality scaling, 0 - 150.
    pub molecule_amount: u32,
    /// Placement radius around the anchor, 0 - 400.
    pub spawn_radius: f32,
    /// Body width of each molecule, 0 - 500.
    pub molecule_size: f32,
    /// Circle radius, 0 - 250.
    pub molecule_point_radius: f32,
    /// Connecting line length in percent of the body width, 0 - 100.
    pub molecule_line_length_scale: f32,
    /// Line stroke width, 0 - 100.
    pub molecule_line_thickness: f32,
    /// Maximum opacity reduction per molecule in percent, 0 - 100.
    pub opacity_jitter: f32,
    /// Maximum size deviation per molecule in percent, 0 - 100.
    pub size_jitter: f32,
}

impl Default for EmitterSettings {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            color: Color::BLACK,
            molecule_amount: 20,
            spawn_radius: 100.0,
            molecule_size: 40.0,
            molecule_point_radius: 4.0,
            molecule_line_length_scale: 100.0,
            molecule_line_thickness: 1.0,
            opacity_jitter: 0.0,
            size_jitter: 0.0,
        }
    }
}

impl EmitterSettings {
    // -- Builder pattern --

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_molecule_amount(mut self, amount: u32) -> Self {
        self.molecule_amount = amount;
        self
    }

    pub fn with_spawn_radius(mut self, radius: f32) -> Self {
        self.spawn_radius = radius;
        self
    }

    pub fn with_molecule_size(mut self, size: f32) -> Self {
        self.molecule_size = size;
        self
    }

    pub fn with_point_radius(mut self, radius: f32) -> Self {
        self.molecule_point_radius = radius;
        self
    }

    pub fn with_size_jitter(mut self, jitter: f32) -> Self {
        self.size_jitter = jitter;
        self
    }

    pub fn with_opacity_jitter(mut self, jitter: f32) -> Self {
        self.opacity_jitter = jitter;
        self
    }

    /// Current value of an editable field.
    pub fn get(&self, field: SettingField) -> SettingValue {
        match field {
            SettingField::Color => SettingValue::Color(self.color),
            SettingField::MoleculeAmount => SettingValue::Number(self.molecule_amount as f32),
            SettingField::SpawnRadius => SettingValue::Number(self.spawn_radius),
            SettingField::MoleculeSize => SettingValue::Number(self.molecule_size),
            SettingField::MoleculePointRadius => SettingValue::Number(self.molecule_point_radius),
            SettingField::MoleculeLineLengthScale => {
                SettingValue::Number(self.molecule_line_length_scale)
            }
            SettingField::MoleculeLineThickness => SettingValue::Number(self.molecule_line_thickness),
            SettingField::OpacityJitter => SettingValue::Number(self.opacity_jitter),
            SettingField::SizeJitter => SettingValue::Number(self.size_jitter),
        }
    }

    /// Write a field, clamped to its range. Returns false (and leaves the
    /// record untouched) when the value kind does not fit the field or a
    /// number is not finite.
    pub fn set(&mut self, field: SettingField, value: SettingValue) -> bool {
        let Some(value) = field.normalize(value) else {
            return false;
        };
        match (field, value) {
            (SettingField::Color, SettingValue::Color(c)) => self.color = c,
            (SettingField::MoleculeAmount, SettingValue::Number(v)) => {
                self.molecule_amount = v as u32
            }
            (SettingField::SpawnRadius, SettingValue::Number(v)) => self.spawn_radius = v,
            (SettingField::MoleculeSize, SettingValue::Number(v)) => self.molecule_size = v,
            (SettingField::MoleculePointRadius, SettingValue::Number(v)) => {
                self.molecule_point_radius = v
            }
            (SettingField::MoleculeLineLengthScale, SettingValue::Number(v)) => {
                self.molecule_line_length_scale = v
            }
            (SettingField::MoleculeLineThickness, SettingValue::Number(v)) => {
                self.molecule_line_thickness = v
            }
            (SettingField::OpacityJitter, SettingValue::Number(v)) => self.opacity_jitter = v,
            (SettingField::SizeJitter, SettingValue::Number(v)) => self.size_jitter = v,
            _ => return false,
        }
        true
    }
}

impl EmitterSettings {
    /// Clamp every editable field into its range. Non-finite numbers fall
    /// back to the default. Returns the fields that changed.
    pub fn clamp_to_ranges(&mut self) -> Vec<SettingField> {
        let mut changed = Vec::new();
        for field in SettingField::ALL {
            let current = self.get(field);
            if !self.set(field, current) {
                self.set(field, EmitterSettings::default().get(field));
            }
            if self.get(field) != current {
                changed.push(field);
            }
        }
        changed
    }
}

/// Editable emitter fields, in control-panel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingField {
    Color,
    MoleculeAmount,
    SpawnRadius,
    MoleculeSize,
    MoleculePointRadius,
    MoleculeLineLengthScale,
    MoleculeLineThickness,
    OpacityJitter,
    SizeJitter,
}

impl SettingField {
    pub const ALL: [SettingField; 9] = [
        Self::Color,
        Self::MoleculeAmount,
        Self::SpawnRadius,
        Self::MoleculeSize,
        Self::MoleculePointRadius,
        Self::MoleculeLineLengthScale,
        Self::MoleculeLineThickness,
        Self::OpacityJitter,
        Self::SizeJitter,
    ];

    /// Field by control-panel index (used by the web bridge).
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Label shown next to the widget.
    pub fn label(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::MoleculeAmount => "Molecule amount",
            Self::SpawnRadius => "Spawn radius",
            Self::MoleculeSize => "Molecule Size",
            Self::MoleculePointRadius => "Point radius",
            Self::MoleculeLineLengthScale => "Line Length (%)",
            Self::MoleculeLineThickness => "Line thickness",
            Self::OpacityJitter => "Opacity Jitter",
            Self::SizeJitter => "Size Jitter",
        }
    }

    /// Numeric widget range and step. `None` for the color field.
    pub fn range(self) -> Option<(f32, f32, f32)> {
        match self {
            Self::Color => None,
            Self::MoleculeAmount => Some((0.0, MAX_MOLECULE_AMOUNT as f32, 1.0)),
            Self::SpawnRadius => Some((0.0, MAX_SPAWN_RADIUS, 1.0)),
            Self::MoleculeSize => Some((0.0, MAX_MOLECULE_SIZE, 1.0)),
            Self::MoleculePointRadius => Some((0.0, MAX_POINT_RADIUS, 0.1)),
            Self::MoleculeLineLengthScale => Some((0.0, MAX_PERCENT, 1.0)),
            Self::MoleculeLineThickness => Some((0.0, MAX_PERCENT, 0.1)),
            Self::OpacityJitter => Some((0.0, MAX_PERCENT, 1.0)),
            Self::SizeJitter => Some((0.0, MAX_PERCENT, 1.0)),
        }
    }

    /// Clamp a value into this field's range. `None` if the kind mismatches.
    pub fn normalize(self, value: SettingValue) -> Option<SettingValue> {
        match (self.range(), value) {
            (None, SettingValue::Color(c)) => Some(SettingValue::Color(c)),
            (Some((min, max, _)), SettingValue::Number(v)) if v.is_finite() => {
                let v = v.clamp(min, max);
                if self == Self::MoleculeAmount {
                    Some(SettingValue::Number(v.round()))
                } else {
                    Some(SettingValue::Number(v))
                }
            }
            _ => None,
        }
    }
}

/// A value coming from a control widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingValue {
    Number(f32),
    Color(Color),
}

impl SettingValue {
    pub fn as_number(self) -> Option<f32> {
        match self {
            SettingValue::Number(v) => Some(v),
            SettingValue::Color(_) => None,
        }
    }

    pub fn as_color(self) -> Option<Color> {
        match self {
            SettingValue::Color(c) => Some(c),
            SettingValue::Number(_) => None,
        }
    }
}

/// Exported state of one emitter: its id plus its settings, flattened into
/// a single JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmitterState {
    pub id: EmitterId,
    #[serde(flatten)]
    pub settings: EmitterSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_clamps_to_range() {
        let mut s = EmitterSettings::default();
        assert!(s.set(SettingField::SpawnRadius, SettingValue::Number(900.0)));
        assert_eq!(s.spawn_radius, MAX_SPAWN_RADIUS);
        assert!(s.set(SettingField::SizeJitter, SettingValue::Number(-5.0)));
        assert_eq!(s.size_jitter, 0.0);
        assert!(s.set(SettingField::MoleculeAmount, SettingValue::Number(12.6)));
        assert_eq!(s.molecule_amount, 13);
    }

    #[test]
    fn set_rejects_mismatched_kind() {
        let mut s = EmitterSettings::default();
        assert!(!s.set(SettingField::Color, SettingValue::Number(1.0)));
        assert!(!s.set(SettingField::MoleculeSize, SettingValue::Color(Color::WHITE)));
        assert!(!s.set(SettingField::MoleculeSize, SettingValue::Number(f32::NAN)));
        assert_eq!(s, EmitterSettings::default());
    }

    #[test]
    fn get_reflects_set() {
        let mut s = EmitterSettings::default();
        for field in SettingField::ALL {
            let value = match field {
                SettingField::Color => SettingValue::Color(Color(0x336699)),
                _ => SettingValue::Number(1.0),
            };
            assert!(s.set(field, value));
            assert_eq!(s.get(field), value);
        }
    }

    #[test]
    fn clamp_to_ranges_reports_changed_fields() {
        let mut s = EmitterSettings {
            molecule_amount: 5000,
            spawn_radius: -50.0,
            molecule_size: 9000.0,
            size_jitter: 900.0,
            molecule_line_thickness: f32::INFINITY,
            ..EmitterSettings::default()
        };
        let changed = s.clamp_to_ranges();
        assert_eq!(
            changed,
            vec![
                SettingField::MoleculeAmount,
                SettingField::SpawnRadius,
                SettingField::MoleculeSize,
                SettingField::MoleculeLineThickness,
                SettingField::SizeJitter,
            ]
        );
        assert_eq!(s.molecule_amount, MAX_MOLECULE_AMOUNT);
        assert_eq!(s.spawn_radius, 0.0);
        assert_eq!(s.molecule_size, MAX_MOLECULE_SIZE);
        assert_eq!(s.size_jitter, MAX_PERCENT);
        assert_eq!(s.molecule_line_thickness, 1.0);
    }

    #[test]
    fn clamp_to_ranges_keeps_valid_record() {
        let mut s = EmitterSettings::default().with_position(-3.5, 9999.0);
        assert!(s.clamp_to_ranges().is_empty());
        assert_eq!(s, EmitterSettings::default().with_position(-3.5, 9999.0));
    }

    #[test]
    fn double_precision_coordinates_settle_after_one_import() {
        let json = r#"{
            "id": "js", "x": 123.456789012345, "y": 0.1, "color": 0,
            "moleculeAmount": 20, "spawnRadius": 100, "moleculeSize": 40,
            "moleculePointRadius": 4, "moleculeLineLengthScale": 100,
            "moleculeLineThickness": 1, "opacityJitter": 0, "sizeJitter": 0
        }"#;
        let first: EmitterState = serde_json::from_str(json).unwrap();
        assert_eq!(first.settings.x, 123.456789012345_f64 as f32);
        let again: EmitterState =
            serde_json::from_str(&serde_json::to_string(&first).unwrap()).unwrap();
        assert_eq!(again, first);
    }

    #[test]
    fn field_index_lookup() {
        assert_eq!(SettingField::from_index(0), Some(SettingField::Color));
        assert_eq!(SettingField::from_index(8), Some(SettingField::SizeJitter));
        assert_eq!(SettingField::from_index(9), None);
    }

    #[test]
    fn state_serializes_flat_camel_case() {
        let state = EmitterState {
            id: EmitterId::new("abc"),
            settings: EmitterSettings::default().with_position(10.0, 20.0),
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["id"], "abc");
        assert_eq!(value["x"], 10.0);
        assert_eq!(value["moleculeAmount"], 20);
        assert_eq!(value["moleculeLineLengthScale"], 100.0);
        assert!(value.get("settings").is_none());
    }

    #[test]
    fn state_round_trips() {
        let state = EmitterState {
            id: EmitterId::new("xyz"),
            settings: EmitterSettings::default()
                .with_color(Color(0xABCDEF))
                .with_spawn_radius(123.4)
                .with_size_jitter(12.5),
        };
        let json = serde_json::to_string(&state).unwrap();
        let back: EmitterState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
