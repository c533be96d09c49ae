//! Packed 3-pixel display words
//!
//! The controller runs in 64k color mode, so every RAM word is a 5/6/5
//! R-G-B triple. On a monochrome glass each color channel is one physical
//! pixel. This driver only ever writes a field fully set or fully clear.

use crate::address::SubPosition;

/// One 16-bit display word holding three sub-pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelWord(u16);

impl PixelWord {
    /// All three sub-pixels off
    pub const OFF: PixelWord = PixelWord(0x0000);

    /// All three sub-pixels on
    pub const ON: PixelWord = PixelWord(0xFFFF);

    /// Wrap a raw value read back from the controller
    ///
    /// Raw values may carry partial fields; the driver never produces them
    /// but will preserve them untouched in fields it does not modify.
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Raw 16-bit value
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Word with every field set to `on`
    pub const fn uniform(on: bool) -> Self {
        if on {
            Self::ON
        } else {
            Self::OFF
        }
    }

    /// Build a word from three independent sub-pixel states
    pub const fn from_triplet(high: bool, middle: bool, low: bool) -> Self {
        let mut raw = 0u16;
        if high {
            raw |= SubPosition::High.mask();
        }
        if middle {
            raw |= SubPosition::Middle.mask();
        }
        if low {
            raw |= SubPosition::Low.mask();
        }
        Self(raw)
    }

    /// Copy of this word with one field fully set or cleared
    ///
    /// The other two fields are preserved bit for bit.
    #[must_use]
    pub const fn with(self, position: SubPosition, on: bool) -> Self {
        let mask = position.mask();
        if on {
            Self(self.0 | mask)
        } else {
            Self(self.0 & !mask)
        }
    }

    /// True if the field is fully set
    ///
    /// A partial pattern (never written by this driver, but possible in
    /// uninitialised display RAM) reads as off.
    pub const fn is_on(self, position: SubPosition) -> bool {
        let mask = position.mask();
        self.0 & mask == mask
    }

    /// Big-endian bus bytes (high byte first)
    pub const fn to_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// Assemble from big-endian bus bytes
    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }
}

impl From<PixelWord> for u16 {
    fn from(word: PixelWord) -> Self {
        word.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_triplet_layout() {
        assert_eq!(PixelWord::from_triplet(true, false, false).raw(), 0xF800);
        assert_eq!(PixelWord::from_triplet(false, true, false).raw(), 0x07E0);
        assert_eq!(PixelWord::from_triplet(false, false, true).raw(), 0x001F);
        assert_eq!(PixelWord::from_triplet(true, true, true), PixelWord::ON);
        assert_eq!(PixelWord::from_triplet(false, false, false), PixelWord::OFF);
    }

    #[test]
    fn test_triplet_bytes_match_bus_order() {
        // high byte: 0xF8 * p1 + 0x07 * p2, low byte: 0xE0 * p2 + 0x1F * p3
        assert_eq!(PixelWord::from_triplet(true, false, true).to_bytes(), [0xF8, 0x1F]);
        assert_eq!(PixelWord::from_triplet(false, true, false).to_bytes(), [0x07, 0xE0]);
    }

    #[test]
    fn test_set_low_field_on_blank_word() {
        let word = PixelWord::OFF.with(SubPosition::Low, true);
        assert_eq!(word.raw(), 0x001F);
    }

    #[test]
    fn test_clear_field() {
        let word = PixelWord::ON.with(SubPosition::Middle, false);
        assert_eq!(word.raw(), 0xF81F);
        assert!(!word.is_on(SubPosition::Middle));
        assert!(word.is_on(SubPosition::High));
        assert!(word.is_on(SubPosition::Low));
    }

    #[test]
    fn test_partial_field_reads_off() {
        let word = PixelWord::from_raw(0x0400 | 0x0001);
        assert!(!word.is_on(SubPosition::Middle));
        assert!(!word.is_on(SubPosition::Low));
        assert!(word.with(SubPosition::Low, true).is_on(SubPosition::Low));
    }

    #[test]
    fn test_uniform() {
        assert_eq!(PixelWord::uniform(true).raw(), 0xFFFF);
        assert_eq!(PixelWord::uniform(false).raw(), 0x0000);
    }

    proptest! {
        #[test]
        fn prop_update_isolates_other_fields(raw in any::<u16>(), idx in 0u16..3, on in any::<bool>()) {
            let position = SubPosition::from_index(idx);
            let before = PixelWord::from_raw(raw);
            let after = before.with(position, on);
            let others = !position.mask();

            prop_assert_eq!(after.raw() & others, raw & others);
            let field = after.raw() & position.mask();
            prop_assert_eq!(field, if on { position.mask() } else { 0 });
        }

        #[test]
        fn prop_update_is_idempotent(raw in any::<u16>(), idx in 0u16..3, on in any::<bool>()) {
            let position = SubPosition::from_index(idx);
            let once = PixelWord::from_raw(raw).with(position, on);
            prop_assert_eq!(once.with(position, on), once);
        }
    }
}
