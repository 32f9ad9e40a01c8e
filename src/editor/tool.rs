//! Editing tools and the tool selection state machine.

use std::fmt::Display;

/// An editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tool {
    /// Paints the selected color.
    #[default]
    Brush,
    /// Flood fills a region with the selected color.
    Bucket,
    /// Picks the color under the cursor, then returns to the previous tool.
    Eyedropper,
    /// Clears pixels to full transparency.
    Eraser,
}

impl Tool {
    /// Whether this tool keeps painting while the pointer moves during a stroke.
    #[must_use]
    pub const fn is_continuous(self) -> bool {
        matches!(self, Tool::Brush | Tool::Eraser)
    }
}

impl Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tool::Brush => write!(f, "brush"),
            Tool::Bucket => write!(f, "bucket"),
            Tool::Eyedropper => write!(f, "eyedropper"),
            Tool::Eraser => write!(f, "eraser"),
        }
    }
}

/// The active tool and the tool to return to after an eyedropper pick.
///
/// Transitions are pure: each returns the next state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolState {
    /// The active tool.
    tool: Tool,
    /// The tool that was active before switching to [`Tool::Eyedropper`].
    previous: Tool,
}

impl ToolState {
    /// The active tool.
    #[must_use]
    pub const fn tool(self) -> Tool {
        self.tool
    }

    /// The tool restored after the next eyedropper pick.
    #[must_use]
    pub const fn previous(self) -> Tool {
        self.previous
    }

    /// Switches to `tool`, remembering the current tool when switching into the eyedropper.
    #[must_use]
    pub const fn select(self, tool: Tool) -> Self {
        let previous = match (tool, self.tool) {
            (Tool::Eyedropper, Tool::Eyedropper) => self.previous,
            (Tool::Eyedropper, current) => current,
            _ => self.previous,
        };
        Self { tool, previous }
    }

    /// Returns to the remembered tool if the eyedropper is active.
    #[must_use]
    pub const fn after_pick(self) -> Self {
        match self.tool {
            Tool::Eyedropper => Self { tool: self.previous, previous: self.previous },
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eyedropper_returns_to_previous() {
        let state = ToolState::default();
        assert_eq!(state.tool(), Tool::Brush);

        let state = state.select(Tool::Bucket).select(Tool::Eyedropper);
        assert_eq!(state.tool(), Tool::Eyedropper);
        assert_eq!(state.previous(), Tool::Bucket);

        // selecting the eyedropper twice keeps the original tool
        let state = state.select(Tool::Eyedropper);
        assert_eq!(state.previous(), Tool::Bucket);

        assert_eq!(state.after_pick().tool(), Tool::Bucket);
    }

    #[test]
    fn pick_without_eyedropper_keeps_tool() {
        let state = ToolState::default().select(Tool::Eraser);
        assert_eq!(state.after_pick(), state);
    }
}
