/// Logging setup and PII redaction
///
/// Recipient addresses are never logged verbatim: the local part is masked
/// and only the domain is kept for debugging.
use regex::Regex;
use tracing_subscriber::EnvFilter;

lazy_static::lazy_static! {
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
}

/// Installs a global `tracing` subscriber filtered by `RUST_LOG` (default `info`)
///
/// Returns `false` if a subscriber was already installed.
pub fn init_tracing(json: bool) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}

/// Redacts email addresses from text, preserving domain for debugging
///
/// # Examples
/// ```
/// use maildrop_core::utils::logging::redact_email;
///
/// assert_eq!(redact_email("user@example.com"), "***@example.com");
/// ```
pub fn redact_email(text: &str) -> String {
    EMAIL_PATTERN
        .replace_all(text, |caps: &regex::Captures| {
            let email = &caps[0];
            match email.find('@') {
                Some(at_pos) => format!("***{}", &email[at_pos..]),
                None => "***@***".to_string(),
            }
        })
        .to_string()
}

/// Redacts a list of addresses into a single log-friendly string
pub fn redact_recipients<'a>(addresses: impl IntoIterator<Item = &'a String>) -> String {
    let redacted: Vec<String> = addresses.into_iter().map(|a| redact_email(a)).collect();
    format!("[{}]", redacted.join(", "))
}

/// Redacts subject line for logging (truncates and masks)
pub fn redact_subject(subject: &str) -> String {
    const MAX_VISIBLE_CHARS: usize = 3;
    const MIN_LENGTH_TO_REDACT: usize = 6;

    let length = subject.chars().count();
    if length < MIN_LENGTH_TO_REDACT {
        subject.to_string()
    } else {
        let visible: String = subject.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{}...[{} chars]", visible, length)
    }
}
