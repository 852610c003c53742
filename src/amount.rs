//! Converts the dollar and cent parts of an amount into integer cents.
//!
//! Amounts are stored in minor units (cents) to avoid floating point rounding.

use crate::Error;

/// An amount of money in cents.
pub type Cents = i64;

/// The largest number of whole dollars an entry can hold.
pub const MAX_DOLLARS: u32 = 999_999;

/// The largest cent component of an amount.
pub const MAX_CENTS: u32 = 99;

/// Combine `dollars` and `cents` into a single amount in cents.
///
/// # Errors
///
/// Returns an [Error::AmountOutOfRange] if `dollars` is greater than
/// [MAX_DOLLARS] or `cents` is greater than [MAX_CENTS].
pub fn to_cents(dollars: u32, cents: u32) -> Result<Cents, Error> {
    if dollars > MAX_DOLLARS || cents > MAX_CENTS {
        return Err(Error::AmountOutOfRange { dollars, cents });
    }

    Ok(Cents::from(dollars) * 100 + Cents::from(cents))
}

/// Whether the amount made from `dollars` and `cents` is not zero.
pub fn is_non_zero(dollars: u32, cents: u32) -> bool {
    dollars != 0 || cents != 0
}

/// Split an amount in cents into its dollar and cent parts.
///
/// The sign is dropped, e.g. `-1234` gives `(12, 34)`.
pub fn split_cents(amount: Cents) -> (u64, u64) {
    let amount = amount.unsigned_abs();

    (amount / 100, amount % 100)
}
