use std::future::Future;

use crate::{Res, types::Page};

/// Drains a cursor-paginated collection into a single vector.
///
/// Starts with `first_url`, then keeps following the `next` link of each
/// page until it is `null` or empty. Items keep the order in which the
/// pages delivered them.
///
/// # Arguments
///
/// * `first_url` - Request URL of the first page
/// * `fetch` - Fetches and decodes one page for the given URL
///
/// # Errors
///
/// The first failing page aborts the whole drain and its error is
/// returned; items gathered from earlier pages are dropped.
///
/// # Example
///
/// ```ignore
/// let items: Vec<SavedItem> =
///     paginate::drain(first_url, |url| client.get_json::<Page<SavedItem>>(url)).await?;
/// ```
pub async fn drain<T, F, Fut>(first_url: String, mut fetch: F) -> Res<Vec<T>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Res<Page<T>>>,
{
    let mut items = Vec::new();
    let mut next = Some(first_url);

    while let Some(url) = next.take().filter(|u| !u.is_empty()) {
        let page = fetch(url).await?;
        items.extend(page.items);
        next = page.next;
    }

    Ok(items)
}
