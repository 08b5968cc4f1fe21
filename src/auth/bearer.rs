/// Parses an `Authorization` header value of the form `Bearer <token>`.
///
/// The scheme match is case-insensitive. Absent, malformed, non-bearer, and
/// empty-token values all yield `None`.
pub fn bearer_token(header_value: Option<&str>) -> Option<&str> {
    let header_value = header_value?;
    let mut parts = header_value.split(' ');
    let scheme = parts.next()?;
    let token = parts.next()?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}
