//! Integer representations backing flag enumerations.
//!
//! Every flag type stores its bits in one of the primitive integers listed
//! here. Before any algebra runs, the bits are widened into a `NumericView`:
//! a 64-bit lane chosen once per representation type through the `LANE`
//! associated constant. `u64` and `usize` need the full unsigned range and use
//! the unsigned lane; every narrower width (and `i64`, `isize`) fits the signed
//! lane via sign or zero extension.
//!
//! Both operands of an operation come from the same flag type, so they always
//! share a lane. The lane only matters when the result is narrowed back into
//! the representation type (`FlagRepr::from_view`).

use std::fmt;

// ---------------------------------------------------------------------------
// Lane and normalized view
// ---------------------------------------------------------------------------

/// The 64-bit lane a representation type is normalized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    /// Sign- or zero-extended into an `i64`.
    Signed,
    /// Widened into a `u64`. Used only by 64-bit unsigned representations.
    Unsigned,
}

/// A flag value widened to 64 bits for the duration of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericView {
    Signed(i64),
    Unsigned(u64),
}

impl NumericView {
    pub fn lane(self) -> Lane {
        match self {
            NumericView::Signed(_) => Lane::Signed,
            NumericView::Unsigned(_) => Lane::Unsigned,
        }
    }

    /// Raw two's-complement bit pattern, regardless of lane.
    pub fn bits(self) -> u64 {
        match self {
            NumericView::Signed(v) => v as u64,
            NumericView::Unsigned(v) => v,
        }
    }

    /// Rebuilds a view in this view's lane from a raw bit pattern.
    fn with_bits(self, bits: u64) -> Self {
        match self {
            NumericView::Signed(_) => NumericView::Signed(bits as i64),
            NumericView::Unsigned(_) => NumericView::Unsigned(bits),
        }
    }

    pub fn and(self, rhs: Self) -> Self {
        self.with_bits(self.bits() & rhs.bits())
    }

    pub fn or(self, rhs: Self) -> Self {
        self.with_bits(self.bits() | rhs.bits())
    }

    /// `self & !rhs`.
    pub fn and_not(self, rhs: Self) -> Self {
        self.with_bits(self.bits() & !rhs.bits())
    }

    /// True iff every bit set in `probe` is also set in `self`.
    pub fn contains(self, probe: Self) -> bool {
        self.and(probe).bits() == probe.bits()
    }
}

impl fmt::LowerHex for NumericView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.bits(), f)
    }
}

// ---------------------------------------------------------------------------
// Representation trait
// ---------------------------------------------------------------------------

/// A primitive integer that can back a flag enumeration.
pub trait FlagRepr: Copy + Eq + fmt::Debug + 'static {
    /// Lane this type normalizes into. Fixed per type.
    const LANE: Lane;

    fn to_view(self) -> NumericView;

    /// Narrows a view back into this type.
    ///
    /// Returns `None` if the value does not fit, which cannot happen for views
    /// produced by the algebra from operands of this same type.
    fn from_view(view: NumericView) -> Option<Self>;
}

macro_rules! signed_lane {
    ($($ty:ty),+) => {$(
        impl FlagRepr for $ty {
            const LANE: Lane = Lane::Signed;

            fn to_view(self) -> NumericView {
                NumericView::Signed(self as i64)
            }

            fn from_view(view: NumericView) -> Option<Self> {
                match view {
                    NumericView::Signed(v) => <$ty>::try_from(v).ok(),
                    NumericView::Unsigned(v) => <$ty>::try_from(v).ok(),
                }
            }
        }
    )+};
}

macro_rules! unsigned_lane {
    ($($ty:ty),+) => {$(
        impl FlagRepr for $ty {
            const LANE: Lane = Lane::Unsigned;

            fn to_view(self) -> NumericView {
                NumericView::Unsigned(self as u64)
            }

            fn from_view(view: NumericView) -> Option<Self> {
                match view {
                    NumericView::Signed(v) => <$ty>::try_from(v).ok(),
                    NumericView::Unsigned(v) => <$ty>::try_from(v).ok(),
                }
            }
        }
    )+};
}

signed_lane!(i8, i16, i32, i64, isize, u8, u16, u32);
unsigned_lane!(u64, usize);

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_are_fixed_per_type() {
        assert_eq!(<i8 as FlagRepr>::LANE, Lane::Signed);
        assert_eq!(<u32 as FlagRepr>::LANE, Lane::Signed);
        assert_eq!(<i64 as FlagRepr>::LANE, Lane::Signed);
        assert_eq!(<isize as FlagRepr>::LANE, Lane::Signed);
        assert_eq!(<u64 as FlagRepr>::LANE, Lane::Unsigned);
        assert_eq!(<usize as FlagRepr>::LANE, Lane::Unsigned);
    }

    #[test]
    fn negative_narrow_values_sign_extend() {
        let view = (-1i32).to_view();
        assert_eq!(view, NumericView::Signed(-1));
        assert_eq!(view.bits(), u64::MAX);
        assert_eq!(i32::from_view(view), Some(-1));
    }

    #[test]
    fn isize_sign_bit_survives_narrowing() {
        let view = isize::MIN.to_view().or(1isize.to_view());
        let cleared = view.and_not(1isize.to_view());
        assert_eq!(isize::from_view(cleared), Some(isize::MIN));
        assert_eq!(isize::from_view((-1isize).to_view()), Some(-1));
    }

    #[test]
    fn high_bit_u32_zero_extends() {
        let view = 0x8000_0000u32.to_view();
        assert_eq!(view, NumericView::Signed(0x8000_0000));
        assert_eq!(u32::from_view(view), Some(0x8000_0000));
    }

    #[test]
    fn top_bit_u64_stays_unsigned() {
        let view = 0x8000_0000_0000_0000u64.to_view();
        assert_eq!(view.lane(), Lane::Unsigned);
        assert_eq!(u64::from_view(view), Some(0x8000_0000_0000_0000));
    }

    /// Removing bits from a sign-extended value keeps it in range of the
    /// original width.
    #[test]
    fn and_not_preserves_narrow_range() {
        let value = i16::MIN.to_view().or(1i16.to_view());
        let cleared = value.and_not(1i16.to_view());
        assert_eq!(i16::from_view(cleared), Some(i16::MIN));

        let value = 0xFFu8.to_view();
        let cleared = value.and_not(0x0Fu8.to_view());
        assert_eq!(u8::from_view(cleared), Some(0xF0));
    }

    #[test]
    fn out_of_range_view_does_not_narrow() {
        assert_eq!(u8::from_view(NumericView::Signed(0x100)), None);
        assert_eq!(u64::from_view(NumericView::Signed(-1)), None);
    }

    #[test]
    fn contains_checks_every_probe_bit() {
        let value = 0b0110u16.to_view();
        assert!(value.contains(0b0100u16.to_view()));
        assert!(value.contains(0u16.to_view()));
        assert!(!value.contains(0b1100u16.to_view()));
    }
}
