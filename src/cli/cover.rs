use std::path::PathBuf;

use crate::{
    cover::{self, CoverFormat},
    error, success,
};

/// Renders a PNG cover, by default to `<MON>-<YEAR>.png` in the working
/// directory.
pub async fn cover(month: String, year: String, out: Option<PathBuf>) {
    let (month_code, year) = match cover::validate_request(&month, &year) {
        Ok(parts) => parts,
        Err(e) => error!("{}", e),
    };

    let png = match cover::render(&month_code, year, CoverFormat::Png) {
        Ok(png) => png,
        Err(e) => error!("{}", e),
    };

    let out = out.unwrap_or_else(|| PathBuf::from(format!("{}-{}.png", month_code, year)));
    if let Err(e) = async_fs::write(&out, &png).await {
        error!("Failed to write {}. Err: {}", out.display(), e);
    }

    success!("Cover written to {}", out.display());
}
