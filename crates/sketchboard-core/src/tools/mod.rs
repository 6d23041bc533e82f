//! Tool selection and the settings applied to new elements.

use crate::error::{CoreError, CoreResult};
use crate::shapes::{ElementKind, ElementStyle, SerializableColor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Select,
    #[default]
    Pen,
    Line,
    Circle,
    Rectangle,
    Text,
    Pan,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Select,
        ToolKind::Pen,
        ToolKind::Line,
        ToolKind::Circle,
        ToolKind::Rectangle,
        ToolKind::Text,
        ToolKind::Pan,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Pen => "pen",
            ToolKind::Line => "line",
            ToolKind::Circle => "circle",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Text => "text",
            ToolKind::Pan => "pan",
        }
    }

    /// Element kind drawn by this tool. `None` for tools that do not draw
    /// with a pointer drag.
    pub fn element_kind(self) -> Option<ElementKind> {
        match self {
            ToolKind::Pen => Some(ElementKind::Freehand),
            ToolKind::Line => Some(ElementKind::Line),
            ToolKind::Circle => Some(ElementKind::Circle),
            ToolKind::Rectangle => Some(ElementKind::Rectangle),
            ToolKind::Select | ToolKind::Text | ToolKind::Pan => None,
        }
    }

    pub fn is_drawing_tool(self) -> bool {
        self.element_kind().is_some()
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|tool| tool.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownTool(s.to_string()))
    }
}

/// Current tool plus the settings the toolbar feeds into new elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Style applied to new elements.
    pub current_style: ElementStyle,
    /// Font size for new text elements.
    pub font_size: f64,
    /// Canvas background.
    pub background: SerializableColor,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self {
            current_tool: ToolKind::default(),
            current_style: ElementStyle::default(),
            font_size: 16.0,
            background: SerializableColor::white(),
        }
    }
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
    }

    /// Set the stroke color from a hex string.
    pub fn set_color_hex(&mut self, color: &str) -> CoreResult<()> {
        self.current_style.stroke_color = color.parse()?;
        Ok(())
    }

    /// Set the stroke weight. Must be positive and finite.
    pub fn set_stroke_weight(&mut self, weight: f64) -> CoreResult<()> {
        if !(weight > 0.0) || !weight.is_finite() {
            return Err(CoreError::InvalidConfig(format!(
                "stroke weight must be positive, got {weight}"
            )));
        }
        self.current_style.stroke_weight = weight;
        Ok(())
    }

    /// Set the font size for new text. Must be positive and finite.
    pub fn set_font_size(&mut self, size: f64) -> CoreResult<()> {
        if !(size > 0.0) || !size.is_finite() {
            return Err(CoreError::InvalidConfig(format!(
                "font size must be positive, got {size}"
            )));
        }
        self.font_size = size;
        Ok(())
    }

    pub fn set_background_hex(&mut self, color: &str) -> CoreResult<()> {
        self.background = color.parse()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_roundtrip() {
        for tool in ToolKind::ALL {
            assert_eq!(tool.as_str().parse::<ToolKind>().unwrap(), tool);
        }
        assert_eq!("Rectangle".parse::<ToolKind>().unwrap(), ToolKind::Rectangle);
        assert!(matches!(
            "eraser".parse::<ToolKind>(),
            Err(CoreError::UnknownTool(name)) if name == "eraser"
        ));
    }

    #[test]
    fn test_pen_draws_freehand() {
        assert_eq!(ToolKind::Pen.element_kind(), Some(ElementKind::Freehand));
        assert_eq!(ToolKind::Circle.element_kind(), Some(ElementKind::Circle));
        assert_eq!(ToolKind::Text.element_kind(), None);
        assert!(!ToolKind::Select.is_drawing_tool());
    }

    #[test]
    fn test_defaults() {
        let tools = ToolManager::new();
        assert_eq!(tools.current_tool, ToolKind::Pen);
        assert_eq!(tools.current_style.stroke_weight, 4.0);
        assert_eq!(tools.current_style.stroke_color, SerializableColor::black());
        assert_eq!(tools.font_size, 16.0);
        assert_eq!(tools.background, SerializableColor::white());
    }

    #[test]
    fn test_settings_validation() {
        let mut tools = ToolManager::new();
        assert!(tools.set_stroke_weight(0.0).is_err());
        assert!(tools.set_stroke_weight(f64::NAN).is_err());
        tools.set_stroke_weight(12.0).unwrap();
        assert_eq!(tools.current_style.stroke_weight, 12.0);

        tools.set_color_hex("#ff0000").unwrap();
        assert_eq!(tools.current_style.stroke_color, SerializableColor::new(255, 0, 0, 255));
        assert!(tools.set_color_hex("not-a-color").is_err());
    }
}
