use crate::error::RenderError;
use crate::models::{InputFormat, Vote, VoteKind, VoteOption};
use crate::render::text::{fit_text, shortfall_label, support_label};
use crate::render::{ChartStyle, Typeface};
use image::Rgb;

// Minimum space between an executive's shortfall and support labels
const LABEL_GAP: f32 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    pub columns: Vec<ColumnLayout>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    pub x: i32,
    pub heading: String,
    pub heading_y: i32,
    pub title: String,
    pub title_y: i32,
    pub rows: Vec<BarRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarRow {
    pub label_y: i32,
    pub left_label: String,
    pub right_label: String,
    pub right_label_x: i32,
    pub bar_y: i32,
    // Full-precision fraction; the pixel width is derived from it
    pub fill: f64,
    pub fill_width: u32,
    pub color: Rgb<u8>,
}

pub fn compute<T: Typeface + ?Sized>(votes: &[Vote], style: &ChartStyle, face: &T) -> Result<ChartLayout, RenderError> {
    if votes.is_empty() {
        return Err(RenderError::NoVotes);
    }

    // Columns with no options still reserve one row
    let max_rows = votes.iter().map(|vote| vote.options.len()).max().unwrap_or(0).max(1) as u32;
    let width = style.margin + (style.column_width + style.margin) * votes.len() as u32;
    let height = style.margin * 2 + style.header_height + style.row_height * max_rows;

    let columns = votes
        .iter()
        .enumerate()
        .map(|(index, vote)| column(vote, index, style, face))
        .collect();

    Ok(ChartLayout { width, height, columns })
}

fn column<T: Typeface + ?Sized>(vote: &Vote, index: usize, style: &ChartStyle, face: &T) -> ColumnLayout {
    let x = (style.margin + (style.margin + style.column_width) * index as u32) as i32;
    let full_width = style.column_width as f32;
    let margin = style.margin as i32;

    let heading = fit_text(face, &format!("{}:", vote), style.title_size, full_width);
    let title = fit_text(face, &vote.title, style.title_size, full_width);

    let rows = match &vote.kind {
        VoteKind::Executive {
            support_amount,
            hat_amount,
            ..
        } => vec![executive_row(x, *support_amount, *hat_amount, vote.options.first(), style, face)],
        VoteKind::Poll { input_format, .. } => vote
            .options
            .iter()
            .enumerate()
            .map(|(row, option)| poll_row(x, row, option, input_format, style, face))
            .collect(),
    };

    ColumnLayout {
        x,
        heading,
        heading_y: margin,
        title,
        title_y: margin + 16,
        rows,
    }
}

fn row_top(row: usize, style: &ChartStyle) -> i32 {
    (style.margin + style.header_height + 5 + style.row_height * row as u32) as i32
}

fn poll_row<T: Typeface + ?Sized>(
    x: i32,
    row: usize,
    option: &VoteOption,
    input_format: &InputFormat,
    style: &ChartStyle,
    face: &T,
) -> BarRow {
    let color = match input_format {
        InputFormat::SingleChoice => style.palette[option.option_index % style.palette.len()],
        _ => style.palette[0],
    };
    let left_label = option.name.clone();
    let right_label = support_label(option.support_amount, option.percentage);
    bar_row(x, row, left_label, right_label, option.percentage, color, None, style, face)
}

fn executive_row<T: Typeface + ?Sized>(
    x: i32,
    support_amount: f64,
    hat_amount: f64,
    option: Option<&VoteOption>,
    style: &ChartStyle,
    face: &T,
) -> BarRow {
    let ratio = if hat_amount > 0.0 { support_amount / hat_amount } else { 0.0 };
    let fill = option.map(|o| o.percentage).unwrap_or(ratio);
    bar_row(
        x,
        0,
        shortfall_label(support_amount, hat_amount),
        support_label(support_amount, ratio),
        fill,
        style.palette[0],
        Some(LABEL_GAP),
        style,
        face,
    )
}

#[allow(clippy::too_many_arguments)]
fn bar_row<T: Typeface + ?Sized>(
    x: i32,
    row: usize,
    left_label: String,
    right_label: String,
    fill: f64,
    color: Rgb<u8>,
    // Some(gap): the left label may use whatever the right label leaves free
    share_width: Option<f32>,
    style: &ChartStyle,
    face: &T,
) -> BarRow {
    let half_width = style.column_width as f32 / 2.0;
    let label_y = row_top(row, style);
    let right_label = fit_text(face, &right_label, style.label_size, half_width);
    let right_width = face.text_width(&right_label, style.label_size);
    let left_width = match share_width {
        Some(gap) => style.column_width as f32 - right_width - gap,
        None => half_width,
    };
    let left_label = fit_text(face, &left_label, style.label_size, left_width);
    let right_label_x = x + style.column_width as i32 - right_width.round() as i32;

    BarRow {
        label_y,
        left_label,
        right_label,
        right_label_x,
        bar_y: label_y + style.label_gap as i32,
        fill,
        fill_width: (style.column_width as f64 * fill.clamp(0.0, 1.0)).round() as u32,
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;
    use crate::render::testing::FixedWidth;

    const SPELL: &str = "0x1234567890abcdef1234567890abcdef12345678";

    fn layout(votes: &[Vote]) -> ChartLayout {
        compute(votes, &ChartStyle::default(), &FixedWidth(7.0)).unwrap()
    }

    #[test]
    fn canvas_grows_with_columns_and_tallest_poll() {
        let votes = vec![
            fixtures::poll(1, InputFormat::SingleChoice, &[("Yes", 0.5), ("No", 0.5)]),
            fixtures::poll(2, InputFormat::MultiChoice, &[("A", 0.1), ("B", 0.2), ("C", 0.3), ("D", 0.4)]),
            fixtures::executive(SPELL, 1.0, 2.0),
        ];
        let chart = layout(&votes);

        assert_eq!(chart.width, 10 + (250 + 10) * 3);
        assert_eq!(chart.height, 10 * 2 + 40 + 30 * 4);
        assert_eq!(chart.columns[1].x, 10 + 260);
        assert_eq!(chart.columns[2].x, 10 + 520);
    }

    #[test]
    fn optionless_vote_still_reserves_a_row() {
        let chart = layout(&[fixtures::poll(3, InputFormat::SingleChoice, &[])]);
        assert_eq!(chart.height, 10 * 2 + 40 + 30);
        assert!(chart.columns[0].rows.is_empty());
    }

    #[test]
    fn single_choice_poll_bars_follow_percentages() {
        let chart = layout(&[fixtures::poll(1, InputFormat::SingleChoice, &[("Yes", 0.62), ("No", 0.38)])]);
        let rows = &chart.columns[0].rows;
        let palette = ChartStyle::default().palette;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fill_width, 155);
        assert_eq!(rows[1].fill_width, 95);
        assert_eq!(rows[0].color, palette[0]);
        assert_eq!(rows[1].color, palette[1]);
        assert_eq!(rows[0].left_label, "Yes");
        assert_eq!(rows[0].right_label, "620 MKR - 62%");
    }

    #[test]
    fn multi_choice_poll_shares_one_colour() {
        let chart = layout(&[fixtures::poll(1, InputFormat::RankFree, &[("A", 0.2), ("B", 0.3), ("C", 0.4)])]);
        let palette = ChartStyle::default().palette;
        assert!(chart.columns[0].rows.iter().all(|row| row.color == palette[0]));
    }

    #[test]
    fn palette_wraps_for_many_single_choice_options() {
        let options = [("A", 0.1), ("B", 0.1), ("C", 0.1), ("D", 0.1)];
        let chart = layout(&[fixtures::poll(1, InputFormat::SingleChoice, &options)]);
        let palette = ChartStyle::default().palette;
        assert_eq!(chart.columns[0].rows[3].color, palette[0]);
    }

    #[test]
    fn executive_bar_measures_support_against_the_hat() {
        let chart = layout(&[fixtures::executive(SPELL, 50000.0, 100000.0)]);
        let column = &chart.columns[0];
        let row = &column.rows[0];

        assert_eq!(column.heading, "Executive 0x1234...5678:");
        assert_eq!(column.rows.len(), 1);
        assert!((row.fill - 0.5).abs() < 1e-9);
        assert_eq!(row.fill_width, 125);
        assert_eq!(row.left_label, "50,000 more needed");
        assert_eq!(row.right_label, "50,000 MKR - 50%");
    }

    #[test]
    fn hat_itself_shows_no_shortfall() {
        let chart = layout(&[fixtures::executive(SPELL, 100000.0, 100000.0)]);
        let row = &chart.columns[0].rows[0];
        assert_eq!(row.left_label, "");
        assert_eq!(row.fill_width, 250);
    }

    #[test]
    fn long_titles_fit_the_column() {
        let mut vote = fixtures::poll(1, InputFormat::SingleChoice, &[("Yes", 1.0)]);
        vote.title = "A very long poll title that exceeds the column".to_string();
        let chart = layout(&[vote]);
        let title = &chart.columns[0].title;

        assert!(title.ends_with('…'));
        assert!(FixedWidth(7.0).text_width(title, 14.0) <= 250.0);
    }

    #[test]
    fn right_labels_end_at_the_column_edge() {
        let chart = layout(&[fixtures::poll(1, InputFormat::SingleChoice, &[("Yes", 0.62)])]);
        let row = &chart.columns[0].rows[0];
        let label_width = row.right_label.chars().count() as i32 * 7;
        assert_eq!(row.right_label_x + label_width, chart.columns[0].x + 250);
    }
}
