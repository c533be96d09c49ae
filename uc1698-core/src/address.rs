//! Framebuffer coordinate to display RAM address mapping
//!
//! The panel is 160x160 monochrome pixels. Rows map one-to-one to RAM rows.
//! Columns are packed three pixels per 16-bit word, so pixel `x` lands in
//! word column `37 + x/3` at sub-position `x mod 3`. The visible RAM window
//! starts at word column 37 and ends at 90 (54 words, 162 sub-pixels).
//!
//! Mirroring the COM (Y) scan direction shifts the word boundary by two
//! sub-pixels and reverses the order of the last two sub-pixels:
//!
//! ```text
//! not mirrored:  column = 37 + x/3        position = x mod 3
//! Y-mirrored:    column = 37 + (x+2)/3    position = [0, 2, 1][x mod 3]
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Panel width in pixels
pub const WIDTH: u16 = 160;

/// Panel height in pixels (= number of RAM rows)
pub const HEIGHT: u16 = 160;

/// Sub-pixels packed into one display word
pub const PIXELS_PER_WORD: u16 = 3;

/// First word column of the visible RAM window
pub const FIRST_COLUMN: u8 = 37;

/// Last word column of the visible RAM window (inclusive)
pub const LAST_COLUMN: u8 = 90;

/// Word columns per row in the visible window
pub const WORDS_PER_ROW: u8 = LAST_COLUMN - FIRST_COLUMN + 1;

/// Last RAM row (inclusive)
pub const LAST_ROW: u8 = (HEIGHT - 1) as u8;

/// Addressing errors, raised before any bus traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressError {
    /// Pixel x outside 0..WIDTH
    XOutOfRange(u16),
    /// Row outside 0..=159
    RowOutOfRange(u16),
    /// Word column outside 37..=90
    ColumnOutOfRange(u8),
}

/// SEG/COM mirroring set through the LCD mapping control command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MirrorMode {
    /// Mirror X (MX bit)
    pub mirror_x: bool,
    /// Mirror Y (MY bit), changes the column mapping
    pub mirror_y: bool,
}

impl MirrorMode {
    /// Create a mirror mode
    pub const fn new(mirror_x: bool, mirror_y: bool) -> Self {
        Self { mirror_x, mirror_y }
    }

    /// Parameter bits of the LCD mapping control command
    pub const fn mapping_bits(self) -> u8 {
        ((self.mirror_x as u8) << 2) | ((self.mirror_y as u8) << 1)
    }
}

/// Position of a sub-pixel inside a display word
///
/// Only three variants exist, so every mapping below is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SubPosition {
    /// Bits 15..11 (5 bits)
    High,
    /// Bits 10..5 (6 bits)
    Middle,
    /// Bits 4..0 (5 bits)
    Low,
}

impl SubPosition {
    /// All positions in word order
    pub const ALL: [SubPosition; 3] = [SubPosition::High, SubPosition::Middle, SubPosition::Low];

    /// Position for a raw index; indices wrap modulo 3
    pub const fn from_index(index: u16) -> Self {
        match index % PIXELS_PER_WORD {
            0 => SubPosition::High,
            1 => SubPosition::Middle,
            _ => SubPosition::Low,
        }
    }

    /// Index 0, 1 or 2
    pub const fn index(self) -> u8 {
        match self {
            SubPosition::High => 0,
            SubPosition::Middle => 1,
            SubPosition::Low => 2,
        }
    }

    /// Bit mask of this field inside a 16-bit word
    pub const fn mask(self) -> u16 {
        match self {
            SubPosition::High => 0b11111_000000_00000,
            SubPosition::Middle => 0b00000_111111_00000,
            SubPosition::Low => 0b00000_000000_11111,
        }
    }

    /// Swap middle and low, used when the COM direction is mirrored
    pub const fn mirrored(self) -> Self {
        match self {
            SubPosition::High => SubPosition::High,
            SubPosition::Middle => SubPosition::Low,
            SubPosition::Low => SubPosition::Middle,
        }
    }
}

/// A validated (row, word column) RAM address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WordAddress {
    row: u8,
    column: u8,
}

impl WordAddress {
    /// Validate a row and word column against the visible window
    pub fn new(row: u16, column: u8) -> Result<Self, AddressError> {
        let row = validate_row(row)?;
        let column = validate_column(column)?;
        Ok(Self { row, column })
    }

    /// RAM row (0..=159)
    pub const fn row(&self) -> u8 {
        self.row
    }

    /// Word column (37..=90)
    pub const fn column(&self) -> u8 {
        self.column
    }

    /// First visible word of every row
    pub fn row_starts() -> impl Iterator<Item = WordAddress> {
        (0..=LAST_ROW).map(|row| WordAddress {
            row,
            column: FIRST_COLUMN,
        })
    }

    /// Iterate every visible word, row by row
    pub fn all() -> impl Iterator<Item = WordAddress> {
        (0..=LAST_ROW).flat_map(|row| {
            (FIRST_COLUMN..=LAST_COLUMN).map(move |column| WordAddress { row, column })
        })
    }
}

/// Where a framebuffer pixel lives in display RAM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelLocation {
    /// Word holding the pixel
    pub address: WordAddress,
    /// Field inside that word
    pub position: SubPosition,
}

/// Check a row number
pub fn validate_row(row: u16) -> Result<u8, AddressError> {
    if row > LAST_ROW as u16 {
        return Err(AddressError::RowOutOfRange(row));
    }
    Ok(row as u8)
}

/// Check a word column number
pub fn validate_column(column: u8) -> Result<u8, AddressError> {
    if !(FIRST_COLUMN..=LAST_COLUMN).contains(&column) {
        return Err(AddressError::ColumnOutOfRange(column));
    }
    Ok(column)
}

/// Word column for pixel `x`
///
/// Total for `x < WIDTH`; the result is always within 37..=90.
pub const fn column_for(x: u16, mirror: MirrorMode) -> u8 {
    let offset = if mirror.mirror_y {
        (x + PIXELS_PER_WORD - 1) / PIXELS_PER_WORD
    } else {
        x / PIXELS_PER_WORD
    };
    FIRST_COLUMN + offset as u8
}

/// Sub-position of pixel `x` inside its word
pub const fn sub_position_for(x: u16, mirror: MirrorMode) -> SubPosition {
    let raw = SubPosition::from_index(x);
    if mirror.mirror_y {
        raw.mirrored()
    } else {
        raw
    }
}

/// Map a framebuffer coordinate to its RAM location
pub fn locate(x: u16, y: u16, mirror: MirrorMode) -> Result<PixelLocation, AddressError> {
    if x >= WIDTH {
        return Err(AddressError::XOutOfRange(x));
    }
    let address = WordAddress::new(y, column_for(x, mirror))?;
    Ok(PixelLocation {
        address,
        position: sub_position_for(x, mirror),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PLAIN: MirrorMode = MirrorMode::new(false, false);
    const MIRROR_Y: MirrorMode = MirrorMode::new(false, true);

    #[test]
    fn test_plain_mapping_x5() {
        let loc = locate(5, 0, PLAIN).unwrap();
        assert_eq!(loc.address.column(), 38);
        assert_eq!(loc.position, SubPosition::Low);
        assert_eq!(loc.position.index(), 2);
    }

    #[test]
    fn test_mirrored_mapping_x4() {
        let loc = locate(4, 10, MIRROR_Y).unwrap();
        assert_eq!(loc.address.column(), 39);
        assert_eq!(loc.address.row(), 10);
        // raw 4 mod 3 = 1, swapped to 2
        assert_eq!(loc.position, SubPosition::Low);
    }

    #[test]
    fn test_mirror_x_does_not_change_columns() {
        let mx = MirrorMode::new(true, false);
        for x in 0..WIDTH {
            assert_eq!(column_for(x, mx), column_for(x, PLAIN));
            assert_eq!(sub_position_for(x, mx), sub_position_for(x, PLAIN));
        }
    }

    #[test]
    fn test_words_per_row_cover_width() {
        // 54 words of 3 pixels, two spare slots in the last word
        assert_eq!(
            WORDS_PER_ROW as u16 * PIXELS_PER_WORD,
            WIDTH + PIXELS_PER_WORD - 1
        );
        assert_eq!(SubPosition::from_index(PIXELS_PER_WORD), SubPosition::High);
    }

    #[test]
    fn test_edges() {
        assert_eq!(column_for(0, PLAIN), FIRST_COLUMN);
        assert_eq!(column_for(WIDTH - 1, PLAIN), LAST_COLUMN);
        assert_eq!(column_for(0, MIRROR_Y), FIRST_COLUMN);
        assert_eq!(column_for(WIDTH - 1, MIRROR_Y), LAST_COLUMN);
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(locate(160, 0, PLAIN), Err(AddressError::XOutOfRange(160)));
        assert_eq!(locate(0, 160, PLAIN), Err(AddressError::RowOutOfRange(160)));
        assert_eq!(
            WordAddress::new(0, 36),
            Err(AddressError::ColumnOutOfRange(36))
        );
        assert_eq!(
            WordAddress::new(0, 91),
            Err(AddressError::ColumnOutOfRange(91))
        );
        assert!(WordAddress::new(159, 90).is_ok());
    }

    #[test]
    fn test_masks_partition_word() {
        let mut union = 0u16;
        for pos in SubPosition::ALL {
            assert_eq!(union & pos.mask(), 0);
            union |= pos.mask();
        }
        assert_eq!(union, 0xFFFF);
        assert_eq!(SubPosition::High.mask(), 0xF800);
        assert_eq!(SubPosition::Middle.mask(), 0x07E0);
        assert_eq!(SubPosition::Low.mask(), 0x001F);
    }

    #[test]
    fn test_all_addresses() {
        let count = WordAddress::all().count();
        assert_eq!(count, 160 * WORDS_PER_ROW as usize);
        assert_eq!(WORDS_PER_ROW, 54);

        let starts: usize = WordAddress::row_starts()
            .filter(|a| a.column() == FIRST_COLUMN)
            .count();
        assert_eq!(starts, HEIGHT as usize);
    }

    #[test]
    fn test_mapping_bits() {
        assert_eq!(MirrorMode::new(false, false).mapping_bits(), 0b000);
        assert_eq!(MirrorMode::new(true, false).mapping_bits(), 0b100);
        assert_eq!(MirrorMode::new(false, true).mapping_bits(), 0b010);
    }

    fn any_mirror() -> impl Strategy<Value = MirrorMode> {
        (any::<bool>(), any::<bool>()).prop_map(|(mx, my)| MirrorMode::new(mx, my))
    }

    proptest! {
        #[test]
        fn prop_mapping_is_total(x in 0u16..WIDTH, y in 0u16..HEIGHT, mirror in any_mirror()) {
            let loc = locate(x, y, mirror).unwrap();
            prop_assert!((FIRST_COLUMN..=LAST_COLUMN).contains(&loc.address.column()));
            prop_assert!(loc.position.index() <= 2);
            prop_assert_eq!(loc.address.row() as u16, y);
        }

        #[test]
        fn prop_three_apart_is_next_word(x in 0u16..(WIDTH - 3), mirror in any_mirror()) {
            prop_assert_eq!(column_for(x + 3, mirror), column_for(x, mirror) + 1);
            prop_assert_eq!(sub_position_for(x + 3, mirror), sub_position_for(x, mirror));
        }

        #[test]
        fn prop_no_two_pixels_share_a_field(a in 0u16..WIDTH, b in 0u16..WIDTH, mirror in any_mirror()) {
            prop_assume!(a != b);
            let la = locate(a, 0, mirror).unwrap();
            let lb = locate(b, 0, mirror).unwrap();
            prop_assert!(la != lb);
        }
    }
}
