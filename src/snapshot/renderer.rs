//! Layout and drawing of the shareable leaderboard image.

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use chrono::Local;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut, text_size};

use crate::leaderboard::models::LeaderboardEntry;
use crate::shared::AppError;

/// Each column shows this many entries at most.
pub const TOP_N: usize = 10;

const GOLD: Rgb<u8> = Rgb([255, 215, 0]);
const SILVER: Rgb<u8> = Rgb([192, 192, 192]);
const BRONZE: Rgb<u8> = Rgb([205, 127, 50]);
const TEXT: Rgb<u8> = Rgb([255, 255, 255]);
const SEPARATOR: Rgb<u8> = Rgb([90, 90, 90]);

const TITLE: &str = "Cobblestats Leaderboards";

const TITLE_Y: i32 = 32;
const HEADER_Y: i32 = 150;
const FIRST_ROW_Y: i32 = 220;
const ROW_HEIGHT: i32 = 44;
const COLUMN_PADDING: i32 = 24;

/// Horizontal alignment of a column's rows. The three columns use one each;
/// the asymmetry is part of the layout, not an accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// One column of the snapshot: a header plus its top entries.
pub struct Column {
    pub header: &'static str,
    pub alignment: Alignment,
    pub entries: Vec<LeaderboardEntry>,
}

/// X origin for a line `text_width` pixels wide inside a column starting at
/// `column_x` and `column_width` wide.
fn aligned_x(alignment: Alignment, column_x: i32, column_width: i32, text_width: i32) -> i32 {
    match alignment {
        Alignment::Left => column_x + COLUMN_PADDING,
        Alignment::Center => column_x + (column_width - text_width) / 2,
        Alignment::Right => column_x + column_width - COLUMN_PADDING - text_width,
    }
}

/// Gold, silver and bronze for the podium; plain text color below it.
fn rank_color(rank: usize) -> Rgb<u8> {
    match rank {
        1 => GOLD,
        2 => SILVER,
        3 => BRONZE,
        _ => TEXT,
    }
}

/// Draws leaderboard columns onto a background image.
pub struct SnapshotRenderer {
    font: FontVec,
}

impl SnapshotRenderer {
    pub fn load(font_path: &Path) -> Result<Self, AppError> {
        let bytes = std::fs::read(font_path)?;
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| AppError::Render(format!("invalid font: {e}")))?;
        Ok(Self { font })
    }

    /// Draw the three columns onto the background. The background sets the
    /// canvas size; the columns split it into equal thirds.
    pub fn render(&self, background: RgbImage, columns: &[Column; 3]) -> RgbImage {
        let mut canvas = background;
        let width = canvas.width() as i32;
        let height = canvas.height() as i32;
        let column_width = width / 3;

        let title_scale = PxScale::from(64.0);
        let header_scale = PxScale::from(40.0);
        let row_scale = PxScale::from(32.0);
        let footer_scale = PxScale::from(24.0);

        let (title_width, _) = text_size(title_scale, &self.font, TITLE);
        draw_text_mut(
            &mut canvas,
            TEXT,
            (width - title_width as i32) / 2,
            TITLE_Y,
            title_scale,
            &self.font,
            TITLE,
        );

        for i in 1..3 {
            let x = (column_width * i) as f32;
            draw_line_segment_mut(
                &mut canvas,
                (x, HEADER_Y as f32),
                (x, (height - 80) as f32),
                SEPARATOR,
            );
        }

        for (index, column) in columns.iter().enumerate() {
            let column_x = column_width * index as i32;

            // Headers are always centered; only the rows follow the column alignment
            let (header_width, _) = text_size(header_scale, &self.font, column.header);
            draw_text_mut(
                &mut canvas,
                TEXT,
                column_x + (column_width - header_width as i32) / 2,
                HEADER_Y,
                header_scale,
                &self.font,
                column.header,
            );

            for (row, entry) in column.entries.iter().take(TOP_N).enumerate() {
                let rank = row + 1;
                let line = format!("{rank}. {} - {}", entry.user, entry.value);
                let (line_width, _) = text_size(row_scale, &self.font, &line);
                let x = aligned_x(
                    column.alignment,
                    column_x,
                    column_width,
                    line_width as i32,
                );
                let y = FIRST_ROW_Y + row as i32 * ROW_HEIGHT;
                draw_text_mut(
                    &mut canvas,
                    rank_color(rank),
                    x,
                    y,
                    row_scale,
                    &self.font,
                    &line,
                );
            }
        }

        let footer = format!(
            "cobblestats, generated {}",
            Local::now().format("%Y-%m-%d %H:%M")
        );
        let (footer_width, footer_height) = text_size(footer_scale, &self.font, &footer);
        draw_text_mut(
            &mut canvas,
            TEXT,
            (width - footer_width as i32) / 2,
            height - 16 - footer_height as i32,
            footer_scale,
            &self.font,
            &footer,
        );

        canvas
    }
}
