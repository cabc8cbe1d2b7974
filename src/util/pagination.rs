/**
 * Pagination
 *
 * Translates (page, itemsPerPage) query parameters into the (offset, limit)
 * pair SQL expects. Page numbers start at 0. The skip count is computed
 * with checked multiplication; clients asking for page i32::MAX of
 * i32::MAX-sized pages get a rejection, not a silently wrapped offset.
 */

use crate::error::ApiError;

/// Compute `(offset, limit)` for a paginated query.
///
/// # Errors
///
/// `InvalidInput` when `page` is negative, `items_per_page` is not
/// positive, or `page * items_per_page` overflows `i32`.
pub fn paginate(page: i32, items_per_page: i32) -> Result<(i64, i64), ApiError> {
    if page < 0 {
        return Err(ApiError::invalid_input("page must not be negative"));
    }
    if items_per_page <= 0 {
        return Err(ApiError::invalid_input("itemsPerPage must be positive"));
    }

    let skipped = page
        .checked_mul(items_per_page)
        .ok_or_else(|| ApiError::invalid_input("pagination out of range"))?;

    Ok((i64::from(skipped), i64::from(items_per_page)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_offset_is_page_times_size() {
        assert_eq!(paginate(0, 20).unwrap(), (0, 20));
        assert_eq!(paginate(3, 20).unwrap(), (60, 20));
        assert_eq!(paginate(7, 1).unwrap(), (7, 1));
    }

    #[test]
    fn test_negative_page_rejected() {
        assert_matches!(paginate(-1, 20), Err(ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_non_positive_size_rejected() {
        assert_matches!(paginate(0, 0), Err(ApiError::InvalidInput(_)));
        assert_matches!(paginate(0, -5), Err(ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_overflow_rejected() {
        assert_matches!(
            paginate(i32::MAX, i32::MAX),
            Err(ApiError::InvalidInput(_))
        );
        // The largest representable skip still works.
        assert_eq!(paginate(1, i32::MAX).unwrap(), (i64::from(i32::MAX), i64::from(i32::MAX)));
    }
}
