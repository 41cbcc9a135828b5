use crate::DatasetError;

/// Longest label the drawing app lets a user type.
pub const MAX_LABEL_CHARS: usize = 20;

/// Check a label against the input rules: non-empty, at most
/// [`MAX_LABEL_CHARS`] characters.
///
/// The accumulator itself only rejects empty labels.
pub fn validate_label(label: &str) -> Result<(), DatasetError> {
    if label.is_empty() {
        return Err(DatasetError::EmptyLabel);
    }
    let len = label.chars().count();
    if len > MAX_LABEL_CHARS {
        return Err(DatasetError::LabelTooLong {
            len,
            max: MAX_LABEL_CHARS,
        });
    }
    Ok(())
}
