//! Minimal PDF 1.4 serializer.
//!
//! Supports what the reports need: text in the base-14 Helvetica faces with
//! WinAnsi encoding, stroked lines and JPEG images. Page coordinates handed to
//! this module have their origin at the top-left corner, y growing downwards.

use std::fmt::Write as _;

pub const PAGE_WIDTH: f64 = 612.0;
pub const PAGE_HEIGHT: f64 = 792.0;

/// Helvetica ascender in text space units
const ASCENT: f64 = 0.718;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// A JPEG image ready to embed (baseline, RGB)
#[derive(Debug, Clone, PartialEq)]
pub struct PdfImage {
    pub width: u32,
    pub height: u32,
    pub jpeg: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `y` is the top of the line box
    Text {
        x: f64,
        y: f64,
        size: f64,
        font: Font,
        gray: f64,
        text: String,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        gray: f64,
    },
    /// `image` indexes the document's image list; `y` is the top edge
    Image {
        image: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Text of every text operation on the page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = (&str, f64)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, y, .. } => Some((text.as_str(), *y)),
            _ => None,
        })
    }
}

/// Serialize pages into a complete PDF file
pub fn write_pdf(pages: &[Page], images: &[PdfImage], title: &str) -> Vec<u8> {
    let mut out = PdfBuffer::default();
    out.raw(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    // object layout: 1 catalog, 2 page tree, 3-4 fonts, 5 info, images, then page + content pairs
    let first_image = 6;
    let first_page = first_image + images.len();
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| first_page + i * 2).collect();

    out.object(1, b"<< /Type /Catalog /Pages 2 0 R >>");

    let kids: Vec<String> = page_ids.iter().map(|id| format!("{} 0 R", id)).collect();
    out.object(
        2,
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), pages.len()).as_bytes(),
    );
    out.object(
        3,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );
    out.object(
        4,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
    );

    let mut info = b"<< /Title ".to_vec();
    info.extend(literal_string(title));
    info.extend_from_slice(b" /Producer ");
    info.extend(literal_string(title));
    info.extend_from_slice(b" >>");
    out.object(5, &info);

    for (i, image) in images.iter().enumerate() {
        let dict = format!(
            "<< /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceRGB \
             /BitsPerComponent 8 /Filter /DCTDecode /Length {} >>",
            image.width,
            image.height,
            image.jpeg.len()
        );
        out.stream_object(first_image + i, dict.as_bytes(), &image.jpeg);
    }

    let xobjects: String = (0..images.len())
        .map(|i| format!("/Im{} {} 0 R ", i, first_image + i))
        .collect();

    for (page, &page_id) in pages.iter().zip(&page_ids) {
        let content = content_stream(page);
        let dict = format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R >> /XObject << {}>> >> /Contents {} 0 R >>",
            number(PAGE_WIDTH),
            number(PAGE_HEIGHT),
            xobjects,
            page_id + 1
        );
        out.object(page_id, dict.as_bytes());
        out.stream_object(page_id + 1, format!("<< /Length {} >>", content.len()).as_bytes(), &content);
    }

    out.finish(first_page + pages.len() * 2)
}

fn content_stream(page: &Page) -> Vec<u8> {
    let mut content = Vec::new();
    for op in &page.ops {
        match op {
            DrawOp::Text { x, y, size, font, gray, text } => {
                let baseline = PAGE_HEIGHT - (y + size * ASCENT);
                content.extend(
                    format!(
                        "BT {} g /{} {} Tf {} {} Td ",
                        number(*gray),
                        font.resource_name(),
                        number(*size),
                        number(*x),
                        number(baseline)
                    )
                    .as_bytes(),
                );
                content.extend(literal_string(text));
                content.extend_from_slice(b" Tj ET\n");
            }
            DrawOp::Line { x1, y1, x2, y2, width, gray } => {
                content.extend(
                    format!(
                        "{} G {} w {} {} m {} {} l S\n",
                        number(*gray),
                        number(*width),
                        number(*x1),
                        number(PAGE_HEIGHT - y1),
                        number(*x2),
                        number(PAGE_HEIGHT - y2)
                    )
                    .as_bytes(),
                );
            }
            DrawOp::Image { image, x, y, width, height } => {
                content.extend(
                    format!(
                        "q {} 0 0 {} {} {} cm /Im{} Do Q\n",
                        number(*width),
                        number(*height),
                        number(*x),
                        number(PAGE_HEIGHT - y - height),
                        image
                    )
                    .as_bytes(),
                );
            }
        }
    }
    content
}

/// PDF number literal with at most two decimals
fn number(value: f64) -> String {
    let text = format!("{:.2}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Byte in the WinAnsi code page for `c`, `?` when it has none
pub fn win_ansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        _ => b'?',
    }
}

/// `(...)` string with delimiters escaped and non-ASCII bytes written in octal
fn literal_string(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 2);
    out.push(b'(');
    for c in text.chars() {
        let byte = match c {
            '\n' | '\r' | '\t' => b' ',
            _ => win_ansi_byte(c),
        };
        match byte {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(byte);
            }
            0x20..=0x7E => out.push(byte),
            _ => out.extend(format!("\\{:03o}", byte).as_bytes()),
        }
    }
    out.push(b')');
    out
}

#[derive(Default)]
struct PdfBuffer {
    bytes: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl PdfBuffer {
    fn raw(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
    }

    fn object(&mut self, id: usize, body: &[u8]) {
        self.offsets.push((id, self.bytes.len()));
        self.raw(format!("{} 0 obj\n", id).as_bytes());
        self.raw(body);
        self.raw(b"\nendobj\n");
    }

    fn stream_object(&mut self, id: usize, dict: &[u8], data: &[u8]) {
        self.offsets.push((id, self.bytes.len()));
        self.raw(format!("{} 0 obj\n", id).as_bytes());
        self.raw(dict);
        self.raw(b"\nstream\n");
        self.raw(data);
        self.raw(b"\nendstream\nendobj\n");
    }

    fn finish(mut self, object_count: usize) -> Vec<u8> {
        self.offsets.sort_unstable();
        let xref_offset = self.bytes.len();

        let mut xref = String::new();
        let _ = write!(xref, "xref\n0 {}\n0000000000 65535 f \n", object_count);
        for (_, offset) in &self.offsets {
            let _ = write!(xref, "{:010} 00000 n \n", offset);
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R /Info 5 0 R >>\nstartxref\n{}\n%%EOF\n",
            object_count, xref_offset
        );
        self.raw(xref.as_bytes());
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_page(text: &str) -> Page {
        Page {
            ops: vec![DrawOp::Text {
                x: 48.0,
                y: 48.0,
                size: 10.0,
                font: Font::Regular,
                gray: 0.0,
                text: text.to_string(),
            }],
        }
    }

    #[test]
    fn test_document_structure() {
        let pdf = write_pdf(&[text_page("Hello"), text_page("World")], &[], "Report");
        let text = String::from_utf8_lossy(&pdf);

        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert!(text.trim_end().ends_with("%%EOF"));
        assert!(text.contains("/Count 2"));
        assert!(text.contains("(Hello) Tj"));
        assert_eq!(text.matches("/Type /Page ").count(), 2);
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let pdf = write_pdf(&[text_page("x")], &[], "Report");
        let text = String::from_utf8_lossy(&pdf).to_string();

        let xref_start = text.rfind("xref\n").unwrap();
        let entries: Vec<usize> = text[xref_start..]
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .map(|l| l[..10].parse().unwrap())
            .collect();

        assert_eq!(entries.len(), 7);
        for (i, offset) in entries.iter().enumerate() {
            assert!(pdf[*offset..].starts_with(format!("{} 0 obj", i + 1).as_bytes()));
        }
    }

    #[test]
    fn test_literal_string_escaping() {
        assert_eq!(literal_string("a(b)c\\"), b"(a\\(b\\)c\\\\)".to_vec());
        assert_eq!(literal_string("—"), b"(\\227)".to_vec());
        assert_eq!(literal_string("Caf\u{e9}"), b"(Caf\\351)".to_vec());
        assert_eq!(literal_string("日"), b"(?)".to_vec());
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(number(612.0), "612");
        assert_eq!(number(0.5), "0.5");
        assert_eq!(number(10.127), "10.13");
    }
}
