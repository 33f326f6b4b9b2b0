pub mod layout;
pub mod paint;
pub mod text;

use crate::error::RenderError;
use crate::models::Vote;
use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use log::info;
use std::io::Cursor;

pub use layout::ChartLayout;

// Text measurement and drawing; layout only ever measures through this
pub trait Typeface: Send + Sync {
    fn text_width(&self, text: &str, size: f32) -> f32;

    fn draw_text(&self, canvas: &mut RgbImage, text: &str, x: i32, y: i32, size: f32, color: Rgb<u8>);
}

pub struct FontFace {
    font: FontVec,
}

impl FontFace {
    pub fn load(path: &str) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path).map_err(|e| RenderError::Font {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| RenderError::Font {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { font })
    }
}

impl Typeface for FontFace {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        text_size(PxScale::from(size), &self.font, text).0 as f32
    }

    fn draw_text(&self, canvas: &mut RgbImage, text: &str, x: i32, y: i32, size: f32, color: Rgb<u8>) {
        draw_text_mut(canvas, color, x, y, PxScale::from(size), &self.font, text);
    }
}

#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub margin: u32,
    pub column_width: u32,
    pub header_height: u32,
    pub row_height: u32,
    pub bar_height: u32,
    // Distance from a row's labels down to its bar
    pub label_gap: u32,
    pub title_size: f32,
    pub label_size: f32,
    pub background: Rgb<u8>,
    pub bar_background: Rgb<u8>,
    pub text_color: Rgb<u8>,
    pub palette: Vec<Rgb<u8>>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            margin: 10,
            column_width: 250,
            header_height: 40,
            row_height: 30,
            bar_height: 5,
            label_gap: 16,
            title_size: 14.0,
            label_size: 12.0,
            background: Rgb([55, 57, 62]),
            bar_background: Rgb([15, 15, 15]),
            text_color: Rgb([255, 255, 255]),
            palette: vec![Rgb([0x5b, 0xbe, 0xae]), Rgb([0xdc, 0x7d, 0x39]), Rgb([0x7e, 0x7e, 0x86])],
        }
    }
}

// One finished render: the PNG plus the layout it was painted from
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub png: Vec<u8>,
    pub layout: ChartLayout,
}

pub struct ChartRenderer<T: Typeface> {
    face: T,
    style: ChartStyle,
}

impl<T: Typeface> ChartRenderer<T> {
    pub fn new(face: T) -> Self {
        Self {
            face,
            style: ChartStyle::default(),
        }
    }

    pub fn layout(&self, votes: &[Vote]) -> Result<ChartLayout, RenderError> {
        layout::compute(votes, &self.style, &self.face)
    }

    // Every call paints into its own buffer, nothing is shared between renders
    pub fn render(&self, votes: &[Vote]) -> Result<RenderedChart, RenderError> {
        let layout = self.layout(votes)?;
        let canvas = paint::paint(&layout, &self.style, &self.face);

        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(canvas).write_to(&mut cursor, ImageFormat::Png)?;
        info!("Rendered {} vote(s) into a {}x{} chart", votes.len(), layout.width, layout.height);

        Ok(RenderedChart {
            png: cursor.into_inner(),
            layout,
        })
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    // Every character measures the same and nothing is drawn, so only bars reach the canvas
    pub struct FixedWidth(pub f32);

    impl Typeface for FixedWidth {
        fn text_width(&self, text: &str, _size: f32) -> f32 {
            text.chars().count() as f32 * self.0
        }

        fn draw_text(&self, _canvas: &mut RgbImage, _text: &str, _x: i32, _y: i32, _size: f32, _color: Rgb<u8>) {}
    }

    pub fn renderer() -> ChartRenderer<FixedWidth> {
        ChartRenderer::new(FixedWidth(7.0))
    }
}
