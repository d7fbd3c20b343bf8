//! Shared Canvas2D helpers (WASM only)
//!
//! Both games draw their milestone banner as word-wrapped text in a
//! fixed-width box; the measurement-driven wrapping lives here.

use web_sys::CanvasRenderingContext2d;

/// Split `text` into lines no wider than `max_width` using the context's
/// current font. A single over-long word gets its own line rather than
/// being broken mid-word.
pub fn wrap_lines(ctx: &CanvasRenderingContext2d, text: &str, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_owned()
        } else {
            format!("{line} {word}")
        };
        let width = ctx
            .measure_text(&candidate)
            .map(|m| m.width())
            .unwrap_or(0.0);
        if width > max_width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
            line = word.to_owned();
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Draw centered, wrapped text starting at `first_line_y`
pub fn fill_wrapped_text(
    ctx: &CanvasRenderingContext2d,
    text: &str,
    center_x: f64,
    first_line_y: f64,
    max_width: f64,
    line_height: f64,
) {
    for (i, line) in wrap_lines(ctx, text, max_width).iter().enumerate() {
        let _ = ctx.fill_text(line, center_x, first_line_y + i as f64 * line_height);
    }
}
