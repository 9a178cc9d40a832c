//! Splitting the logical 1200 pixel wide image between the two controllers.
//!
//! Each controller must receive its whole frame between its own `begin_frame` and `end`, so a
//! full image is streamed twice: every row of the Master half, then every row of the Slave half.
//! Nothing here holds more than one 300 byte half-row; pixel content is produced on demand by a
//! `RowSource`.

use crate::color::{self, Color};
use crate::consts::{HALF_ROW_BYTES, HALF_WIDTH};
pub use crate::interface::Panel;

/// One packed row of one half of the panel.
#[derive(Clone)]
pub struct HalfRow {
    buf: [u8; HALF_ROW_BYTES],
}

impl HalfRow {
    /// A row filled with `color`.
    pub fn new(color: Color) -> Self {
        HalfRow {
            buf: [color.packed(); HALF_ROW_BYTES],
        }
    }

    pub fn fill(&mut self, color: Color) {
        self.buf = [color.packed(); HALF_ROW_BYTES];
    }

    /// Paint the pixel at half-local column `x`. Columns past the half are ignored.
    pub fn set_pixel(&mut self, x: u16, color: Color) {
        let x = x as usize;
        if x >= HALF_WIDTH {
            return;
        }
        let byte = &mut self.buf[x / 2];
        *byte = color::with_pixel(*byte, x % 2 == 1, color);
    }

    /// The 4-bit code at half-local column `x`.
    pub fn pixel(&self, x: u16) -> Option<u8> {
        let x = x as usize;
        let (left, right) = color::unpack(*self.buf.get(x / 2)?);
        if x >= HALF_WIDTH {
            None
        } else if x % 2 == 0 {
            Some(left)
        } else {
            Some(right)
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Raw access for sources that produce already-packed bytes.
    pub fn bytes_mut(&mut self) -> &mut [u8; HALF_ROW_BYTES] {
        &mut self.buf
    }
}

impl Default for HalfRow {
    fn default() -> Self {
        HalfRow::new(Color::White)
    }
}

/// Produces the pixel content of the panel one half-row at a time.
///
/// `fill_row` is called once per row per half, in increasing `y`, all Master rows first. The row
/// passed in holds whatever the previous call left in it, so implementations must write every
/// byte.
pub trait RowSource {
    fn fill_row(&self, panel: Panel, y: u16, row: &mut HalfRow);
}

impl<F> RowSource for F
where
    F: Fn(Panel, u16, &mut HalfRow),
{
    fn fill_row(&self, panel: Panel, y: u16, row: &mut HalfRow) {
        self(panel, y, row)
    }
}

/// Split one packed logical row (600 bytes for 1200 pixels) into the Master and Slave halves.
/// A short row yields a short or empty Slave half.
pub fn split_logical_row(row: &[u8]) -> (&[u8], &[u8]) {
    row.split_at(row.len().min(HALF_ROW_BYTES))
}

/// A `RowSource` that slices rows out of full-width packed rows supplied by a closure, for
/// callers that already hold image data in the panel's packed format.
pub struct PackedRows<F> {
    rows: F,
}

impl<F> PackedRows<F>
where
    F: Fn(u16) -> [u8; crate::consts::ROW_BYTES],
{
    pub fn new(rows: F) -> Self {
        PackedRows { rows }
    }
}

impl<F> RowSource for PackedRows<F>
where
    F: Fn(u16) -> [u8; crate::consts::ROW_BYTES],
{
    fn fill_row(&self, panel: Panel, y: u16, row: &mut HalfRow) {
        let full = (self.rows)(y);
        let (master, slave) = split_logical_row(&full);
        let half = match panel {
            Panel::Master => master,
            Panel::Slave => slave,
        };
        row.bytes_mut().copy_from_slice(half);
    }
}
