//! Header names used by the Swift API, and helpers for upload headers

/// Account user sent to the auth endpoint
pub const AUTH_USER: &str = "X-Auth-User";
/// Account key sent to the auth endpoint
pub const AUTH_KEY: &str = "X-Auth-Key";
/// Session token carried by every storage request
pub const AUTH_TOKEN: &str = "X-Auth-Token";
/// Storage endpoint returned by the auth endpoint
pub const STORAGE_URL: &str = "x-storage-url";
/// Session token returned by the auth endpoint
pub const STORAGE_TOKEN: &str = "x-storage-token";
/// Container access type: private, public or gallery
pub const CONTAINER_META_TYPE: &str = "X-Container-Meta-Type";
/// Unix timestamp at which the object is removed
pub const DELETE_AT: &str = "X-Delete-At";
/// Seconds after which the object is removed
pub const DELETE_AFTER: &str = "X-Delete-After";
/// Target of a server-side copy
pub const DESTINATION: &str = "Destination";
/// MD5 of the uploaded body, checked by the service
pub const ETAG: &str = "ETag";
pub const CONTENT_TYPE: &str = "Content-Type";

/// Content type of a virtual directory marker
pub const DIRECTORY_CONTENT_TYPE: &str = "application/directory";

/// Remove the object at the given Unix timestamp
pub fn delete_at(timestamp: u64) -> (String, String) {
    (DELETE_AT.to_string(), timestamp.to_string())
}

/// Remove the object after the given number of seconds
pub fn delete_after(seconds: u64) -> (String, String) {
    (DELETE_AFTER.to_string(), seconds.to_string())
}

/// Ask the service to verify the body against an MD5 hex digest
pub fn etag(md5_hex: impl Into<String>) -> (String, String) {
    (ETAG.to_string(), md5_hex.into())
}

pub fn content_type(value: impl Into<String>) -> (String, String) {
    (CONTENT_TYPE.to_string(), value.into())
}

/// Whether a header list names the given header (case-insensitive)
pub fn contains(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_header_helpers() {
        assert_eq!(
            delete_after(3600),
            ("X-Delete-After".to_string(), "3600".to_string())
        );
        assert_eq!(delete_at(1700000000).1, "1700000000");
        assert_eq!(etag("abc").0, "ETag");
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let headers = vec![("etag".to_string(), "abc".to_string())];
        assert!(contains(&headers, ETAG));
        assert!(!contains(&headers, DELETE_AT));
    }
}
