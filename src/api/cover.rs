use axum::{
    extract::Path,
    http::header,
    response::IntoResponse,
};

use crate::{
    Res,
    cover::{self, CoverFormat},
};

/// Renders a PNG cover for `/api/images/cover/{month}/{year}`, e.g.
/// `/api/images/cover/feb/2024`.
pub async fn cover(Path((month, year)): Path<(String, String)>) -> Res<impl IntoResponse> {
    let (month_code, year) = cover::validate_request(&month, &year)?;
    let png = cover::render(&month_code, year, CoverFormat::Png)?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        png,
    ))
}
