use crate::services::matching::MatchError;

/// Length of a document id in characters (12 bytes, hex encoded)
pub const ID_LEN: usize = 24;

/// Check whether a string is a well-formed document id
///
/// Ids are exactly 24 ASCII hex digits. Case is not significant.
#[inline]
pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LEN && id.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Canonical (lowercase) form of a well-formed id, `None` when malformed
///
/// Stores only ever see canonical ids, so ids differing in letter case
/// resolve to the same document.
pub fn normalize_id(id: &str) -> Option<String> {
    is_valid_id(id).then(|| id.to_ascii_lowercase())
}

/// Validate an id before any store query is issued
///
/// `field` names what the id refers to ("event", "volunteer") and ends up
/// in the error so callers can tell which input was rejected. Returns the
/// canonical id.
pub fn validate_id(field: &'static str, id: &str) -> Result<String, MatchError> {
    normalize_id(id).ok_or_else(|| MatchError::InvalidId {
        field,
        id: id.to_string(),
    })
}

/// Generate a fresh document id
pub fn new_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(ID_LEN);
    id
}
