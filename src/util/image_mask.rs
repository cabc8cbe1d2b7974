/**
 * Image Slot Mask
 *
 * A mask is a compact digit string mapping upload (or deletion) order to
 * slot positions in a post's nine-slot image array: the Nth character is
 * the destination slot of the Nth file. `"351"` with files [a, b, c] puts
 * a in slot 3, b in slot 5 and c in slot 1.
 *
 * Validation is purely syntactic: length at most 9, digits only, digit 9
 * never appears (slots are 0-8), no digit repeats. Whether a referenced
 * slot currently holds an image is the content-update path's concern, not
 * the codec's.
 */

use thiserror::Error;

use crate::error::ApiError;

/// Number of image slots on a post.
pub const SLOT_COUNT: usize = 9;

/// Rejection raised by mask parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidImageMask {
    #[error("image mask longer than {SLOT_COUNT} characters")]
    TooLong,
    #[error("image mask contains a non-digit character")]
    NonDigit,
    #[error("image mask references slot 9; slots are 0-8")]
    ReservedDigit,
    #[error("image mask repeats a slot")]
    RepeatedSlot,
    #[error("image mask length does not match the number of files")]
    CountMismatch,
}

impl From<InvalidImageMask> for ApiError {
    fn from(err: InvalidImageMask) -> Self {
        ApiError::invalid_input(err.to_string())
    }
}

/// Validate a mask without consuming it.
pub fn validate_mask(mask: &str) -> Result<(), InvalidImageMask> {
    if mask.len() > SLOT_COUNT {
        return Err(InvalidImageMask::TooLong);
    }

    let mut seen = [false; SLOT_COUNT];
    for ch in mask.chars() {
        let digit = ch.to_digit(10).ok_or(InvalidImageMask::NonDigit)? as usize;
        if digit == 9 {
            return Err(InvalidImageMask::ReservedDigit);
        }
        if seen[digit] {
            return Err(InvalidImageMask::RepeatedSlot);
        }
        seen[digit] = true;
    }

    Ok(())
}

/// Pair each file with the slot the mask assigns it.
///
/// The number of files must equal the mask length. Returns (slot, file)
/// pairs in mask order.
pub fn zip_with_files<F>(mask: &str, files: Vec<F>) -> Result<Vec<(usize, F)>, InvalidImageMask> {
    validate_mask(mask)?;
    if files.len() != mask.len() {
        return Err(InvalidImageMask::CountMismatch);
    }

    Ok(mask
        .chars()
        .map(|ch| ch.to_digit(10).expect("validated digit") as usize)
        .zip(files)
        .collect())
}

/// Parse a mask into the ordered list of slots it references.
///
/// Used by image removal, where there is no file payload.
pub fn extract_slots(mask: &str) -> Result<Vec<usize>, InvalidImageMask> {
    validate_mask(mask)?;
    Ok(mask
        .chars()
        .map(|ch| ch.to_digit(10).expect("validated digit") as usize)
        .collect())
}
