/// Sanitization of caller-supplied names used inside object keys
use crate::constants::MAX_CONTENT_NAME_LENGTH;

/// Placeholder used when a name sanitizes down to nothing
const EMPTY_NAME_PLACEHOLDER: &str = "unnamed";

/// Sanitizes a filename for use as the last component of an object key
///
/// - Removes path separators (/, \) and control characters
/// - Collapses runs of dots and trims leading/trailing dots
/// - Limits length
///
/// # Examples
/// ```
/// use maildrop_core::utils::sanitization::sanitize_content_name;
///
/// assert_eq!(sanitize_content_name("../../etc/passwd"), "etcpasswd");
/// assert_eq!(sanitize_content_name("report 2024.pdf"), "report 2024.pdf");
/// ```
pub fn sanitize_content_name(input: &str) -> String {
    let filtered: String = input
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\'))
        .take(MAX_CONTENT_NAME_LENGTH)
        .collect();

    let mut result = String::with_capacity(filtered.len());
    let mut last_was_dot = false;
    for c in filtered.chars() {
        if c == '.' {
            if !last_was_dot {
                result.push(c);
            }
            last_was_dot = true;
        } else {
            result.push(c);
            last_was_dot = false;
        }
    }

    let trimmed = result.trim().trim_matches('.');
    if trimmed.is_empty() {
        EMPTY_NAME_PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// True when a name can be placed in a key without changing its folder
pub fn is_safe_key_component(component: &str) -> bool {
    !component.contains(['/', '\\']) && component != ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_content_name() {
        assert_eq!(sanitize_content_name("logo.png"), "logo.png");
        assert_eq!(sanitize_content_name("../../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_content_name("a/b\\c.txt"), "abc.txt");
        assert_eq!(sanitize_content_name("bad\u{0}name.txt"), "badname.txt");
        assert_eq!(sanitize_content_name("archive...tar"), "archive.tar");
        assert_eq!(sanitize_content_name("..."), "unnamed");
        assert_eq!(sanitize_content_name(""), "unnamed");
        assert_eq!(sanitize_content_name(&"a".repeat(400)).len(), 255);
    }

    #[test]
    fn test_is_safe_key_component() {
        assert!(is_safe_key_component("invoice.pdf"));
        assert!(!is_safe_key_component("../invoice.pdf"));
        assert!(!is_safe_key_component("nested/invoice.pdf"));
        assert!(!is_safe_key_component("nested\\invoice.pdf"));
        assert!(!is_safe_key_component(".."));
        assert!(is_safe_key_component("report..v2.pdf"));
    }
}
