//! Export document text and the dialog that shows it.
//!
//! The text is a JavaScript module so it can be pasted straight back into
//! the page source:
//!
//! ```text
//! /* eslint-disable */
//! export default {
//!     "emitters": [ ... ],
//!     "globalSettings": { ... }
//! }
//! ```

use serde::Serialize;

use crate::api::error::EditorError;
use crate::core::visualization::ExportDocument;

const LINT_PRAGMA: &str = "/* eslint-disable */";
const EXPORT_PREFIX: &str = "export default";

impl ExportDocument {
    /// Pretty JSON with four-space indentation.
    pub fn to_json(&self) -> Result<String, EditorError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// The document wrapped as an importable module.
    pub fn to_module_text(&self) -> Result<String, EditorError> {
        Ok(format!("{LINT_PRAGMA}\n{EXPORT_PREFIX} {}", self.to_json()?))
    }

    /// Parse module text produced by [`ExportDocument::to_module_text`], or
    /// bare JSON.
    pub fn parse(text: &str) -> Result<Self, EditorError> {
        let mut body = text.trim();
        if let Some(rest) = body.strip_prefix(LINT_PRAGMA) {
            body = rest.trim_start();
        }
        if let Some(rest) = body.strip_prefix(EXPORT_PREFIX) {
            body = rest.trim_start();
        }
        let body = body.trim_end().trim_end_matches(';');
        if !body.starts_with('{') {
            return Err(EditorError::MissingPreamble);
        }
        Ok(serde_json::from_str(body)?)
    }
}

/// Dismissible overlay showing export text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDialog {
    /// Export name shown as the dialog title.
    pub title: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Color, EmitterId};
    use crate::components::settings::{EmitterSettings, EmitterState};
    use crate::core::visualization::GlobalSettings;

    fn document() -> ExportDocument {
        ExportDocument {
            emitters: vec![EmitterState {
                id: EmitterId::new("abc"),
                settings: EmitterSettings::default()
                    .with_position(50.0, 50.0)
                    .with_color(Color(0x00FF00)),
            }],
            global_settings: GlobalSettings {
                quality_level: 50,
                debug: false,
                show_gizmos: true,
            },
        }
    }

    #[test]
    fn module_text_layout() {
        let text = document().to_module_text().unwrap();
        assert!(text.starts_with("/* eslint-disable */\nexport default {\n    \"emitters\": ["));
        assert!(text.contains("\n        {\n            \"id\": \"abc\""));
        assert!(text.contains("\"qualityLevel\": 50"));
    }

    #[test]
    fn parse_module_and_bare_json() {
        let doc = document();
        let text = doc.to_module_text().unwrap();
        assert_eq!(ExportDocument::parse(&text).unwrap(), doc);
        let json = doc.to_json().unwrap();
        assert_eq!(ExportDocument::parse(&json).unwrap(), doc);
        let with_semicolon = format!("{};\n", text);
        assert_eq!(ExportDocument::parse(&with_semicolon).unwrap(), doc);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            ExportDocument::parse("export default [1, 2]"),
            Err(EditorError::MissingPreamble)
        ));
        assert!(matches!(
            ExportDocument::parse("{ \"emitters\": 3 }"),
            Err(EditorError::Document(_))
        ));
    }

    #[test]
    fn parse_accepts_hex_colors() {
        let json = r##"{
            "emitters": [{
                "id": "a", "x": 1, "y": 2, "color": "#ff0000",
                "moleculeAmount": 10, "spawnRadius": 50, "moleculeSize": 40,
                "moleculePointRadius": 4, "moleculeLineLengthScale": 100,
                "moleculeLineThickness": 1, "opacityJitter": 0, "sizeJitter": 0
            }],
            "globalSettings": { "qualityLevel": 100, "debug": false, "showGizmos": true }
        }"##;
        let doc = ExportDocument::parse(json).unwrap();
        assert_eq!(doc.emitters[0].settings.color, Color(0xFF0000));
        assert_eq!(doc.emitters[0].settings.x, 1.0);
    }
}
