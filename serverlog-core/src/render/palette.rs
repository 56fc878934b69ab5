use crate::net::ConnectionId;
use owo_colors::AnsiColors;

/// One of the eight background colors used to tell sources apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteEntry {
    Black,
    Blue,
    Cyan,
    Green,
    Magenta,
    Red,
    White,
    Yellow,
}

pub const PALETTE: [PaletteEntry; 8] = [
    PaletteEntry::Black,
    PaletteEntry::Blue,
    PaletteEntry::Cyan,
    PaletteEntry::Green,
    PaletteEntry::Magenta,
    PaletteEntry::Red,
    PaletteEntry::White,
    PaletteEntry::Yellow,
];

impl PaletteEntry {
    pub fn name(self) -> &'static str {
        match self {
            PaletteEntry::Black => "black",
            PaletteEntry::Blue => "blue",
            PaletteEntry::Cyan => "cyan",
            PaletteEntry::Green => "green",
            PaletteEntry::Magenta => "magenta",
            PaletteEntry::Red => "red",
            PaletteEntry::White => "white",
            PaletteEntry::Yellow => "yellow",
        }
    }

    pub fn ansi(self) -> AnsiColors {
        match self {
            PaletteEntry::Black => AnsiColors::Black,
            PaletteEntry::Blue => AnsiColors::Blue,
            PaletteEntry::Cyan => AnsiColors::Cyan,
            PaletteEntry::Green => AnsiColors::Green,
            PaletteEntry::Magenta => AnsiColors::Magenta,
            PaletteEntry::Red => AnsiColors::Red,
            PaletteEntry::White => AnsiColors::White,
            PaletteEntry::Yellow => AnsiColors::Yellow,
        }
    }
}

/// Periodic mapping: `color_of(id) == color_of(id + 8)`.
pub fn color_of(id: u64) -> PaletteEntry {
    PALETTE[(id % PALETTE.len() as u64) as usize]
}

/// The id a record is colored by.
///
/// A correlation id wins over the connection id so that every line of one
/// logical request shares a color, whichever connection delivered it. The
/// bytes are read as a big-endian integer; only its residue mod 8 matters,
/// which is carried entirely by the last byte. An empty id counts as zero.
pub fn effective_color_id(connection: ConnectionId, log_id: Option<&str>) -> u64 {
    match log_id {
        Some(id) => id.as_bytes().last().map_or(0, |b| u64::from(*b)),
        None => connection,
    }
}
