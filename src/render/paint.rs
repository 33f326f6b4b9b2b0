use crate::render::{ChartLayout, ChartStyle, Typeface};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

pub fn paint<T: Typeface + ?Sized>(layout: &ChartLayout, style: &ChartStyle, face: &T) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(layout.width, layout.height, style.background);

    for column in &layout.columns {
        face.draw_text(&mut canvas, &column.heading, column.x, column.heading_y, style.title_size, style.text_color);
        face.draw_text(&mut canvas, &column.title, column.x, column.title_y, style.title_size, style.text_color);

        for row in &column.rows {
            face.draw_text(&mut canvas, &row.left_label, column.x, row.label_y, style.label_size, style.text_color);
            face.draw_text(
                &mut canvas,
                &row.right_label,
                row.right_label_x,
                row.label_y,
                style.label_size,
                style.text_color,
            );

            fill_rounded_bar(&mut canvas, column.x, row.bar_y, style.column_width, style.bar_height, style.bar_background);
            if row.fill_width > 0 {
                fill_rounded_bar(&mut canvas, column.x, row.bar_y, row.fill_width, style.bar_height, row.color);
            }
        }
    }

    canvas
}

// A bar with fully rounded ends: a rectangle capped by two circles.
// Bars no wider than they are tall are drawn square.
fn fill_rounded_bar(canvas: &mut RgbImage, x: i32, y: i32, width: u32, height: u32, color: Rgb<u8>) {
    if width == 0 || height == 0 {
        return;
    }

    let radius = (height / 2) as i32;
    if width <= height || radius == 0 {
        draw_filled_rect_mut(canvas, Rect::at(x, y).of_size(width, height), color);
        return;
    }

    let center_y = y + radius;
    draw_filled_rect_mut(canvas, Rect::at(x + radius, y).of_size(width - 2 * radius as u32, height), color);
    draw_filled_circle_mut(canvas, (x + radius, center_y), radius, color);
    draw_filled_circle_mut(canvas, (x + width as i32 - 1 - radius, center_y), radius, color);
}
