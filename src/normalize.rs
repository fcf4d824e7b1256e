//! Field normalizers for the supplier feed.
//!
//! The feed encodes quantities and prices in its own way; these functions
//! turn the raw cell text into the values the marketplaces expect.

use log::debug;

use crate::error::{Result, SyncError};

/// Quantity the feed writes as `">10"`, pushed as 100
pub const MANY_IN_STOCK: &str = ">10";
/// Quantity the feed writes as `"1"`, pushed as 0
pub const LAST_ITEM: &str = "1";

/// Converts a feed quantity cell into a stock count.
///
/// `">10"` becomes 100 and `"1"` becomes 0 (a single remaining item is
/// held back from the marketplaces). Every other value must be an integer.
///
/// # Examples
/// - ">10" -> 100
/// - "1" -> 0
/// - "42" -> 42
pub fn normalize_quantity(quantity: &str) -> Result<i64> {
    let stock = match quantity {
        MANY_IN_STOCK => 100,
        LAST_ITEM => 0,
        other => other
            .trim()
            .parse::<i64>()
            .map_err(|_| SyncError::InvalidQuantity(other.to_string()))?,
    };
    debug!("Normalized quantity '{quantity}' to {stock}");
    Ok(stock)
}

/// Reduces a feed price cell to its whole-unit digits.
///
/// Everything from the first `.` on is dropped, then every non-digit is
/// stripped from what remains. An input without digits before the first
/// `.` yields an empty string.
///
/// # Examples
/// - "5'990.00 руб." -> "5990"
/// - "12,890.50" -> "12890"
pub fn normalize_price(price: &str) -> String {
    let whole = price.split('.').next().unwrap_or_default();
    whole.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
