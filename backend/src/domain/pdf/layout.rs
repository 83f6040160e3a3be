//! Page cursor used by the report builders.

use super::writer::{write_pdf, DrawOp, Font, Page, PdfImage, PAGE_HEIGHT, PAGE_WIDTH};

pub const MARGIN: f64 = 48.0;
pub const CONTENT_WIDTH: f64 = PAGE_WIDTH - MARGIN * 2.0;
/// Lowest y any element may reach
pub const BOTTOM: f64 = PAGE_HEIGHT - MARGIN;

pub const BLACK: f64 = 0.0;
pub const SECONDARY: f64 = 0.45;
pub const SEPARATOR: f64 = 0.78;

// Helvetica advance widths for ' '..='~', in 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // digits
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Approximate rendered width of `text` in points
pub fn text_width(text: &str, size: f64, font: Font) -> f64 {
    let units: f64 = text
        .chars()
        .map(|c| match c {
            ' '..='~' => HELVETICA_WIDTHS[(c as usize) - 32] as f64,
            _ => 556.0,
        })
        .sum();
    let weight = match font {
        Font::Regular => 1.0,
        Font::Bold => 1.06,
    };
    units * weight * size / 1000.0
}

/// Greedy word wrap; words wider than `width` are broken between characters
pub fn wrap_text(text: &str, width: f64, size: f64, font: Font) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            if text_width(&candidate, size, font) <= width {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            for c in word.chars() {
                line.push(c);
                if text_width(&line, size, font) > width && line.chars().count() > 1 {
                    line.pop();
                    lines.push(std::mem::take(&mut line));
                    line.push(c);
                }
            }
        }
        lines.push(line);
    }

    lines
}

/// Vertical cursor over a growing list of pages
///
/// `y` is measured from the top edge of the current page.
#[derive(Debug, Clone)]
pub struct PageLayout {
    pages: Vec<Page>,
    images: Vec<PdfImage>,
    y: f64,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl PageLayout {
    pub fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            images: Vec::new(),
            y: MARGIN,
        }
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn set_y(&mut self, y: f64) {
        self.y = y;
    }

    pub fn advance(&mut self, dy: f64) {
        self.y += dy;
    }

    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = MARGIN;
    }

    /// Start a new page unless `height` more points fit above the bottom margin.
    /// Returns true when a page was started.
    pub fn ensure_space(&mut self, height: f64) -> bool {
        if self.y + height > BOTTOM {
            self.new_page();
            return true;
        }
        false
    }

    pub fn text(&mut self, x: f64, y: f64, size: f64, font: Font, gray: f64, text: impl Into<String>) {
        self.push(DrawOp::Text {
            x,
            y,
            size,
            font,
            gray,
            text: text.into(),
        });
    }

    /// Horizontal rule across the content width
    pub fn rule(&mut self, y: f64) {
        self.push(DrawOp::Line {
            x1: MARGIN,
            y1: y,
            x2: MARGIN + CONTENT_WIDTH,
            y2: y,
            width: 0.5,
            gray: SEPARATOR,
        });
    }

    pub fn image(&mut self, image: PdfImage, x: f64, width: f64, height: f64) {
        self.images.push(image);
        let index = self.images.len() - 1;
        let y = self.y;
        self.push(DrawOp::Image {
            image: index,
            x,
            y,
            width,
            height,
        });
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn to_pdf(&self, title: &str) -> Vec<u8> {
        write_pdf(&self.pages, &self.images, title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_space_breaks_page_at_bottom_margin() {
        let mut layout = PageLayout::new();
        layout.set_y(700.0);
        assert!(!layout.ensure_space(44.0));
        assert!(layout.ensure_space(45.0));
        assert_eq!(layout.pages().len(), 2);
        assert_eq!(layout.y(), MARGIN);
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let small = text_width("Inventory", 10.0, Font::Regular);
        let large = text_width("Inventory", 20.0, Font::Regular);
        assert!((large - small * 2.0).abs() < 1e-9);
        assert!(text_width("Inventory", 10.0, Font::Bold) > small);
    }

    #[test]
    fn test_wrap_text_respects_width() {
        let text = "The quick brown fox jumps over the lazy dog ".repeat(8);
        let lines = wrap_text(&text, 200.0, 10.0, Font::Regular);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0, Font::Regular) <= 200.0, "line too wide: {}", line);
        }
        assert_eq!(lines.join(" ").split_whitespace().count(), text.split_whitespace().count());
    }

    #[test]
    fn test_wrap_text_keeps_paragraphs_and_breaks_long_words() {
        let lines = wrap_text("first\nsecond", 500.0, 10.0, Font::Regular);
        assert_eq!(lines, vec!["first", "second"]);

        let long = "x".repeat(200);
        let lines = wrap_text(&long, 100.0, 10.0, Font::Regular);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), long);
    }
}
