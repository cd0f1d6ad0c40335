//! Common regex patterns for report date extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Full Japanese date: 2025年10月1日
    pub static ref DATE_JP_FULL: Regex = Regex::new(
        r"(\d{4})年(\d{1,2})月(\d{1,2})日"
    ).unwrap();

    // Dotted date: 2024.05.16
    pub static ref DATE_DOTTED: Regex = Regex::new(
        r"(\d{4})\.(\d{1,2})\.(\d{1,2})"
    ).unwrap();

    // Slashed date: 2024/05/16
    pub static ref DATE_SLASHED: Regex = Regex::new(
        r"(\d{4})/(\d{1,2})/(\d{1,2})"
    ).unwrap();

    // Month and day without a year: 10月3日
    pub static ref DATE_JP_MONTH_DAY: Regex = Regex::new(
        r"(\d{1,2})月(\d{1,2})日"
    ).unwrap();
}
