//! The boot splash: six colored bands across the panel, each with one line of large text.
//!
//! Text is drawn with the 8x8 font scaled 4x. Positions are worked out in the logical 1200 pixel
//! wide row, and each half draws only the glyph columns inside its own 600 pixel window, so a
//! glyph that straddles the seam at column 600 continues on the Slave half exactly where the
//! Master half cut it off.

use core::cmp;
use core::ops::Range;

use itertools::iproduct;

use crate::color::Color;
use crate::compositor::{HalfRow, Panel, RowSource};
use crate::consts::{HALF_WIDTH, HEIGHT};
use crate::font::{self, GLYPH_SIZE};

pub const BAND_COUNT: usize = 6;
/// Nominal band height. 6 * 266 = 1596, so the last band is four rows taller than the rest.
pub const BAND_HEIGHT: u16 = 266;
/// First row of the text zone, counted from the top of the band.
pub const TEXT_ZONE_TOP: u16 = 100;
/// Height of the text zone. Only the first `GLYPH_SIZE * TEXT_SCALE` rows of it carry ink.
pub const TEXT_ZONE_ROWS: u16 = 64;
pub const TEXT_SCALE: u32 = 4;
/// Horizontal distance between glyph origins: 32 columns of glyph and 8 of spacing.
pub const GLYPH_ADVANCE: u32 = 40;
/// Logical column of the first glyph.
pub const TEXT_LEFT: u32 = 20;

pub const BAND_COLORS: [Color; BAND_COUNT] = [
    Color::Black,
    Color::White,
    Color::Yellow,
    Color::Red,
    Color::Blue,
    Color::Green,
];

/// Fixed band messages; bands 1 and 2 are replaced by the status lines.
pub const DEFAULT_MESSAGES: [&str; BAND_COUNT] = [
    "E-INK FRAME (C) 2025",
    "",
    "",
    "WELCOME TO YOUR CANVAS",
    "13.3 INCH COLOR DISPLAY",
    "READY FOR YOUR IMAGES",
];

/// The band containing row `y`.
pub fn band_of_row(y: u16) -> usize {
    cmp::min((y / BAND_HEIGHT) as usize, BAND_COUNT - 1)
}

/// Row `y` counted from the top of its band.
pub fn row_in_band(y: u16) -> u16 {
    y - band_of_row(y) as u16 * BAND_HEIGHT
}

/// The text color that reads on `background`.
pub fn text_color_on(background: Color) -> Color {
    match background {
        Color::White | Color::Yellow => Color::Black,
        _ => Color::White,
    }
}

/// The font scanline drawn on band row `y_in_band`, if that row carries text.
pub fn font_row(y_in_band: u16) -> Option<u8> {
    if y_in_band < TEXT_ZONE_TOP || y_in_band >= TEXT_ZONE_TOP + TEXT_ZONE_ROWS {
        return None;
    }
    let scaled = (y_in_band - TEXT_ZONE_TOP) / TEXT_SCALE as u16;
    if scaled < GLYPH_SIZE as u16 {
        Some(scaled as u8)
    } else {
        None
    }
}

/// The drawable characters of `message` with the logical column of each one's left edge.
/// Characters without a glyph are dropped and do not advance the cursor.
pub fn glyph_positions(message: &str, start: u32) -> impl Iterator<Item = (char, u32)> + '_ {
    message
        .chars()
        .filter(|c| font::glyph(*c).is_some())
        .scan(start, |x, c| {
            let at = *x;
            *x += GLYPH_ADVANCE;
            Some((c, at))
        })
}

/// Where the text of a message would end if the row were unbounded.
pub fn theoretical_end(message: &str, start: u32) -> u32 {
    start + GLYPH_ADVANCE * glyph_positions(message, start).count() as u32
}

/// How a line of text divides between the two halves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeamSplit {
    /// Columns of the Master half covered by the text.
    pub left: Range<u32>,
    /// Columns of the Slave half covered by the continuation, in Slave-local coordinates. A
    /// glyph cut at the seam resumes at `right.start`, column for column.
    pub right: Range<u32>,
}

impl SeamSplit {
    pub fn compute(message: &str, start: u32, boundary: u32) -> Self {
        let end = theoretical_end(message, start);
        let continuation_end = cmp::min(end, 2 * boundary).saturating_sub(boundary);
        SeamSplit {
            left: cmp::min(start, boundary)..cmp::min(end, boundary),
            right: cmp::min(start.saturating_sub(boundary), continuation_end)..continuation_end,
        }
    }

    /// The logical columns `panel` draws.
    fn window(&self, panel: Panel) -> Range<u32> {
        match panel {
            Panel::Master => self.left.clone(),
            Panel::Slave => {
                let origin = panel.origin() as u32;
                (origin + self.right.start)..(origin + self.right.end)
            }
        }
    }
}

/// Draw scanline `font_row` of `message` into `row`, which is `panel`'s half of the logical row.
pub fn render_text_row(row: &mut HalfRow, panel: Panel, message: &str, font_row: u8, color: Color) {
    let window = SeamSplit::compute(message, TEXT_LEFT, HALF_WIDTH as u32).window(panel);
    for (ch, glyph_x) in glyph_positions(message, TEXT_LEFT) {
        if glyph_x >= window.end {
            break;
        }
        if glyph_x + GLYPH_ADVANCE <= window.start {
            continue;
        }
        for (col, dx) in iproduct!(0..GLYPH_SIZE, 0..TEXT_SCALE) {
            if !font::glyph_column_bit(ch, font_row, col) {
                continue;
            }
            let x = glyph_x + col as u32 * TEXT_SCALE + dx;
            if !window.contains(&x) {
                continue;
            }
            if let Some(local) = panel.local_column(x as u16) {
                row.set_pixel(local, color);
            }
        }
    }
}

/// The boot splash image, generated one half-row at a time.
#[derive(Clone, Debug)]
pub struct BootSplash<'a> {
    messages: [&'a str; BAND_COUNT],
}

impl<'a> BootSplash<'a> {
    /// The standard splash, with the two status lines in bands 1 and 2.
    pub fn new(status_line1: &'a str, status_line2: &'a str) -> Self {
        let mut messages = DEFAULT_MESSAGES;
        messages[1] = status_line1;
        messages[2] = status_line2;
        BootSplash { messages }
    }

    /// A splash with every band message chosen by the caller.
    pub fn with_messages(messages: [&'a str; BAND_COUNT]) -> Self {
        BootSplash { messages }
    }

    pub fn message(&self, band: usize) -> &'a str {
        self.messages[band]
    }
}

impl RowSource for BootSplash<'_> {
    fn fill_row(&self, panel: Panel, y: u16, row: &mut HalfRow) {
        debug_assert!((y as usize) < HEIGHT);
        let band = band_of_row(y);
        let background = BAND_COLORS[band];
        row.fill(background);
        if let Some(font_row) = font_row(row_in_band(y)) {
            render_text_row(
                row,
                panel,
                self.messages[band],
                font_row,
                text_color_on(background),
            );
        }
    }
}
