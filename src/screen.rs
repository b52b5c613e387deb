use raylib::prelude::*;
use crate::input::Key;
use crate::stage::contains;

/// Where the next frame should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Listing,
    Detail(String),
}

pub trait Screen {
    /// Handles input and offscreen work for one frame.
    fn update(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, keys: &[Key]) -> Option<Route>;
    fn draw(&self, d: &mut RaylibDrawHandle);
}

pub const MARGIN: f32 = 32.0;
pub const GAP: f32 = 20.0;
pub const TEXT: Color = Color::new(23, 23, 23, 255);
pub const MUTED: Color = Color::new(115, 115, 115, 255);
pub const BORDER: Color = Color::new(229, 229, 229, 255);
pub const SURFACE: Color = Color::new(250, 250, 250, 255);

/// Grid columns for a content width, following the page breakpoints.
pub fn columns_for(width: f32, max_columns: usize) -> usize {
    let columns = if width >= 1280.0 {
        4
    } else if width >= 1024.0 {
        3
    } else if width >= 640.0 {
        2
    } else {
        1
    };
    columns.min(max_columns).max(1)
}

/// Card rectangles laid out row by row. Each card is an image area of the
/// given aspect (height / width) plus `info_height` below it.
pub fn grid(
    origin: Vector2,
    width: f32,
    columns: usize,
    image_aspect: f32,
    info_height: f32,
    count: usize,
) -> Vec<Rectangle> {
    let columns = columns.max(1);
    let card_width = (width - GAP * (columns - 1) as f32) / columns as f32;
    let card_height = card_width * image_aspect + info_height;

    (0..count)
        .map(|i| {
            let (row, col) = (i / columns, i % columns);
            Rectangle::new(
                origin.x + col as f32 * (card_width + GAP),
                origin.y + row as f32 * (card_height + GAP),
                card_width,
                card_height,
            )
        })
        .collect()
}

/// Greedy word wrap on an approximate glyph width.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Index of the rectangle both the press and the release landed in. A drag
/// that starts elsewhere is not a click.
pub fn clicked(rects: &[Rectangle], press: Vector2, release: Vector2) -> Option<usize> {
    rects.iter().position(|r| contains(*r, press) && contains(*r, release))
}

/// Keeps the scroll offset between the content end and zero.
pub fn clamp_scroll(scroll: f32, content_height: f32, viewport_height: f32) -> f32 {
    scroll.clamp(-(content_height - viewport_height).max(0.0), 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoints() {
        assert_eq!(columns_for(1400.0, 4), 4);
        assert_eq!(columns_for(1100.0, 4), 3);
        assert_eq!(columns_for(700.0, 4), 2);
        assert_eq!(columns_for(500.0, 4), 1);
        assert_eq!(columns_for(1400.0, 2), 2);
    }

    #[test]
    fn grid_wraps_rows() {
        let rects = grid(Vector2::new(0.0, 0.0), 220.0, 2, 1.0, 20.0, 3);
        assert_eq!(rects.len(), 3);
        assert_eq!(rects[0].width, 100.0);
        assert_eq!(rects[1].x, 120.0);
        assert_eq!(rects[2].x, 0.0);
        assert_eq!(rects[2].y, 140.0);
    }

    #[test]
    fn wrap() {
        assert_eq!(wrap_text("one two three four", 9), ["one two", "three", "four"]);
        assert!(wrap_text("   ", 10).is_empty());
    }

    #[test]
    fn click_needs_press_and_release_on_the_same_card() {
        let rects = grid(Vector2::new(0.0, 0.0), 220.0, 2, 1.0, 20.0, 2);
        let first = Vector2::new(10.0, 10.0);
        let second = Vector2::new(130.0, 10.0);
        let gutter = Vector2::new(110.0, 10.0);

        assert_eq!(clicked(&rects, second, Vector2::new(150.0, 60.0)), Some(1));
        assert_eq!(clicked(&rects, first, second), None);
        assert_eq!(clicked(&rects, gutter, second), None);
    }

    #[test]
    fn scroll_bounds() {
        assert_eq!(clamp_scroll(10.0, 2000.0, 800.0), 0.0);
        assert_eq!(clamp_scroll(-5000.0, 2000.0, 800.0), -1200.0);
        assert_eq!(clamp_scroll(-50.0, 500.0, 800.0), 0.0);
    }
}
