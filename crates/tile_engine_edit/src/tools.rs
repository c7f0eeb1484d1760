//! Tool definitions for tile editing
//!
//! Pencil and eraser are session tools: they accumulate edits between a start
//! and an end command. Fill and the rectangles are area tools and only work
//! with unit-sized tiles.

/// Available editing tools
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Place the active tile under the cursor (freehand)
    #[default]
    Pencil,
    /// Remove tiles under the cursor (freehand)
    Eraser,
    /// Flood fill the region under the cursor
    Fill,
    /// Draw filled rectangle
    RectangleFilled,
    /// Draw rectangle outline
    RectangleHollow,
}

impl Tool {
    pub const ALL: [Tool; 5] = [Tool::Pencil, Tool::Eraser, Tool::Fill, Tool::RectangleFilled, Tool::RectangleHollow];

    /// Name used on the wire and in logs
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Pencil => "pencil",
            Tool::Eraser => "eraser",
            Tool::Fill => "fill",
            Tool::RectangleFilled => "rect_filled",
            Tool::RectangleHollow => "rect_hollow",
        }
    }

    pub fn from_name(name: &str) -> Option<Tool> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Tools that are disabled for tiles larger than 1x1
    pub fn is_area_tool(&self) -> bool {
        matches!(self, Tool::Fill | Tool::RectangleFilled | Tool::RectangleHollow)
    }

    /// Tools that commit once per gesture instead of streaming edits
    pub fn is_rectangle(&self) -> bool {
        matches!(self, Tool::RectangleFilled | Tool::RectangleHollow)
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
