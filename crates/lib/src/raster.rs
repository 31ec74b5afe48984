use crate::render::{Cell, Preview};
use std::fmt::{self, Write};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("Preview references a cross-origin asset: {0}")]
    CrossOriginAsset(String),
    #[error("Rendering did not finish in time")]
    RenderTimeout,
    #[error("Rendering is not supported here: {0}")]
    UnsupportedEnvironment(String),
    #[error("Failed to write the sheet image")]
    Format(#[from] fmt::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub mime: &'static str,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Turns a rendered preview into an image.
pub trait Rasterizer {
    fn render(&self, preview: &Preview) -> Result<Image, RasterError>;
}

// sheet layout: columns A..I, rows 1..11
const COLUMNS: [char; 9] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I'];
const ROWS: u32 = 11;

const LABELS: [(&str, char, u32); 19] = [
    ("MILLER NAME", 'A', 1),
    ("PARTY NAME", 'A', 2),
    ("BILL NO", 'A', 3),
    ("ARRIVAL DT", 'A', 4),
    ("QTY", 'A', 5),
    ("RATE", 'C', 5),
    ("LORRY HIRE", 'A', 6),
    ("EXPENSES", 'D', 6),
    ("DISCOUNT", 'A', 7),
    ("NET AMOUNT", 'D', 7),
    ("SELLER COM", 'A', 8),
    ("CHQ AMOUNT", 'D', 8),
    ("SHORTAGE", 'D', 9),
    ("Q-DIFF", 'A', 10),
    ("TOTAL", 'A', 11),
    ("CHQ AM", 'H', 6),
    ("CHQ NO", 'H', 7),
    ("CHQ DT", 'H', 8),
    ("BANK", 'H', 9),
];

/// Draws the sheet as a vector grid (`image/svg+xml`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SvgRasterizer {
    pub width: u32,
    pub height: u32,
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

impl SvgRasterizer {
    fn origin(&self, column: char, row: u32) -> (f64, f64) {
        let col_idx = COLUMNS.iter().position(|c| *c == column).unwrap_or(0) as f64;
        let cell_w = f64::from(self.width) / COLUMNS.len() as f64;
        let cell_h = f64::from(self.height) / f64::from(ROWS + 1);
        (col_idx * cell_w + 4.0, f64::from(row) * cell_h + cell_h * 0.6)
    }

    fn text<W: Write>(
        &self,
        out: &mut W,
        column: char,
        row: u32,
        text: &str,
        class: Option<&str>,
    ) -> fmt::Result {
        let (x, y) = self.origin(column, row);
        let class = class.map(|c| format!(" class=\"{c}\"")).unwrap_or_default();
        write!(
            out,
            "<text x=\"{x:.1}\" y=\"{y:.1}\"{class}>{}</text>",
            escape_xml(text)
        )
    }

    fn draw<W: Write>(&self, preview: &Preview, out: &mut W) -> fmt::Result {
        write!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\
             <style>text{{font:14px sans-serif}}.pos{{fill:#15803d}}.neg{{fill:#b91c1c}}</style>\
             <rect width=\"100%\" height=\"100%\" fill=\"#fff\"/>",
            w = self.width,
            h = self.height
        )?;

        for (label, column, row) in LABELS {
            self.text(out, column, row, label, None)?;
        }
        for (cell, value) in &preview.cells {
            let (column, row) = cell_position(*cell);
            let class = match cell {
                Cell::E9 => preview.shortage_sign.map(|s| s.to_string()),
                _ => None,
            };
            self.text(out, column, row, value, class.as_deref())?;
        }
        self.text(out, 'D', 4, &preview.days_label, None)?;
        out.write_str("</svg>")
    }
}

fn cell_position(cell: Cell) -> (char, u32) {
    let name = cell.to_string();
    let mut chars = name.chars();
    let column = chars.next().unwrap_or('A');
    let row = chars.as_str().parse().unwrap_or(1);
    (column, row)
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

impl Rasterizer for SvgRasterizer {
    fn render(&self, preview: &Preview) -> Result<Image, RasterError> {
        if self.width == 0 || self.height == 0 {
            return Err(RasterError::UnsupportedEnvironment(format!(
                "cannot draw a {}x{} sheet",
                self.width, self.height
            )));
        }

        let mut svg = String::with_capacity(4096);
        self.draw(preview, &mut svg)?;

        Ok(Image {
            mime: "image/svg+xml",
            width: self.width,
            height: self.height,
            bytes: svg.into_bytes(),
        })
    }
}
