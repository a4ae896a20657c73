//! Row-level tenant scoping.

/// Center a query is restricted to. `None` sees every center.
pub type CenterFilter = Option<i64>;

/// Whether a row belonging to `row_center` is visible under `filter`.
///
/// # Examples
///
/// ```
/// use welfare_core::storage::is_visible_to;
///
/// assert!(is_visible_to(None, Some(4)));
/// assert!(is_visible_to(Some(4), Some(4)));
/// assert!(!is_visible_to(Some(4), Some(5)));
/// assert!(!is_visible_to(Some(4), None));
/// ```
pub fn is_visible_to(filter: CenterFilter, row_center: Option<i64>) -> bool {
    filter.is_none_or(|center| row_center == Some(center))
}

/// Center a new row is stored under.
///
/// A caller bound to a center always writes into it; otherwise the center
/// from the request body is kept.
pub fn inject_center(caller_center: Option<i64>, requested: Option<i64>) -> Option<i64> {
    caller_center.or(requested)
}
