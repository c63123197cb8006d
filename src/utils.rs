use chrono::Month;

use crate::{Error, Res};

pub fn month_from_number(month: u32) -> Res<Month> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(|| Error::InvalidMonth(format!("month number {} is outside 1-12", month)))
}

pub fn month_name(month: u32) -> Res<&'static str> {
    Ok(month_from_number(month)?.name())
}

/// Three-letter upper-case month code used on cover images, e.g. `FEB`.
pub fn month_code(month: u32) -> Res<String> {
    Ok(month_name(month)?[..3].to_uppercase())
}

/// Display name of a monthly playlist, e.g. `February 2024`.
pub fn playlist_name(year: &str, month: u32) -> Res<String> {
    Ok(format!("{} {}", month_name(month)?, year))
}

/// Reverses [`playlist_name`]: `"February 2024"` gives `(2, 2024)`.
pub fn parse_playlist_name(name: &str) -> Option<(u32, i32)> {
    let (month, year) = name.trim().rsplit_once(' ')?;
    let month = month.trim().parse::<Month>().ok()?;
    let year = year.parse::<i32>().ok().filter(|y| (1000..=9999).contains(y))?;
    Some((month.number_from_month(), year))
}
