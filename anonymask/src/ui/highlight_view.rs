//! Terminal rendering of the highlighted original.

use owo_colors::OwoColorize;

use anonymask_core::HighlightOutput;

use crate::ui::theme::mark_color;

/// Renders every marked segment in its stage's color, underlined so marks
/// stay visible on terminals with a similar background.
pub fn render_ansi(output: &HighlightOutput) -> String {
    let mut rendered = String::new();
    for segment in &output.segments {
        match &segment.marker {
            Some(marker) => {
                let styled = segment.text.color(mark_color(&marker.color)).underline().to_string();
                rendered.push_str(&styled);
            }
            None => rendered.push_str(&segment.text),
        }
    }
    rendered
}
