use std::fmt;
use std::str::FromStr;

use crate::error::PixelError;

/// The active editing tool.  Exactly one is active at a time; it changes only
/// on explicit selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Tool {
    #[default]
    Brush,
    Eraser,
    /// Colour picker: samples a cell into the current colour.
    Dropper,
    Fill,
    Zoom,
}

impl Tool {
    pub fn all() -> &'static [Tool] {
        &[Tool::Brush, Tool::Eraser, Tool::Dropper, Tool::Fill, Tool::Zoom]
    }

    /// Lower-case name used by the toolbox and the log.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Brush => "brush",
            Tool::Eraser => "eraser",
            Tool::Dropper => "dropper",
            Tool::Fill => "fill",
            Tool::Zoom => "zoom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tool::Brush => "Brush",
            Tool::Eraser => "Eraser",
            Tool::Dropper => "Dropper",
            Tool::Fill => "Fill",
            Tool::Zoom => "Zoom",
        }
    }

    /// Tools that stamp the brush footprint (and react to size changes).
    pub fn uses_brush(&self) -> bool {
        matches!(self, Tool::Brush | Tool::Eraser)
    }

    /// Tools that keep acting while the pointer is dragged.
    pub fn paints_on_drag(&self) -> bool {
        self.uses_brush()
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = PixelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Tool::all()
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PixelError::UnknownTool(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for tool in Tool::all() {
            assert_eq!(tool.name().parse::<Tool>(), Ok(*tool));
        }
        assert_eq!(" Fill ".parse::<Tool>(), Ok(Tool::Fill));
        assert_eq!("ZOOM".parse::<Tool>(), Ok(Tool::Zoom));
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(
            "lasso".parse::<Tool>(),
            Err(PixelError::UnknownTool("lasso".to_string()))
        );
    }

    #[test]
    fn only_brush_and_eraser_paint_on_drag() {
        let painting: Vec<Tool> = Tool::all().iter().copied().filter(Tool::paints_on_drag).collect();
        assert_eq!(painting, vec![Tool::Brush, Tool::Eraser]);
        assert_eq!(Tool::default(), Tool::Brush);
    }
}
