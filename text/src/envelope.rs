//! The `[stgy:...]` token envelope.

use crate::error::{EnvelopeFault, TextError, TextResult};

/// Opening marker of every strategy token.
pub const PREFIX: &str = "[stgy:";

/// Closing marker of every strategy token.
pub const SUFFIX: &str = "]";

/// Wraps a payload string in the token envelope.
#[must_use]
pub fn wrap(payload: &str) -> String {
    let mut token = String::with_capacity(PREFIX.len() + payload.len() + SUFFIX.len());
    token.push_str(PREFIX);
    token.push_str(payload);
    token.push_str(SUFFIX);
    token
}

/// Strips the envelope and returns the payload.
///
/// Surrounding whitespace is not tolerated; callers reading from files or
/// terminals should trim first.
///
/// # Errors
///
/// Returns [`TextError::MalformedEnvelope`] if the prefix or suffix is
/// missing or the payload is empty.
pub fn unwrap(token: &str) -> TextResult<&str> {
    let rest = token.strip_prefix(PREFIX).ok_or(TextError::MalformedEnvelope {
        fault: EnvelopeFault::MissingPrefix,
    })?;
    let payload = rest.strip_suffix(SUFFIX).ok_or(TextError::MalformedEnvelope {
        fault: EnvelopeFault::MissingSuffix,
    })?;
    if payload.is_empty() {
        return Err(TextError::MalformedEnvelope {
            fault: EnvelopeFault::EmptyPayload,
        });
    }
    Ok(payload)
}

/// Finds every well-formed envelope in free text, in order of appearance.
///
/// Only the envelope shape is checked; payloads are not validated.
pub fn find_tokens(text: &str) -> impl Iterator<Item = &str> + '_ {
    let mut rest = text;
    std::iter::from_fn(move || loop {
        let start = rest.find(PREFIX)?;
        let candidate = &rest[start..];
        let Some(end) = candidate.find(SUFFIX) else {
            rest = "";
            return None;
        };
        let token = &candidate[..=end];
        rest = &candidate[end + SUFFIX.len()..];
        if token.len() > PREFIX.len() + SUFFIX.len() {
            return Some(token);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fault(token: &str) -> EnvelopeFault {
        match unwrap(token) {
            Err(TextError::MalformedEnvelope { fault }) => fault,
            other => panic!("expected malformed envelope, got {other:?}"),
        }
    }

    #[test]
    fn wrap_then_unwrap() {
        let token = wrap("auyiM");
        assert_eq!(token, "[stgy:auyiM]");
        assert_eq!(unwrap(&token).unwrap(), "auyiM");
    }

    #[test]
    fn rejects_missing_prefix() {
        assert_eq!(fault("auyiM]"), EnvelopeFault::MissingPrefix);
        assert_eq!(fault("[STGY:auyiM]"), EnvelopeFault::MissingPrefix);
        assert_eq!(fault(" [stgy:auyiM]"), EnvelopeFault::MissingPrefix);
    }

    #[test]
    fn rejects_missing_suffix() {
        assert_eq!(fault("[stgy:auyiM"), EnvelopeFault::MissingSuffix);
        assert_eq!(fault("[stgy:auyiM] "), EnvelopeFault::MissingSuffix);
    }

    #[test]
    fn rejects_empty_payload() {
        assert_eq!(fault("[stgy:]"), EnvelopeFault::EmptyPayload);
    }

    #[test]
    fn rejects_empty_string() {
        assert_eq!(fault(""), EnvelopeFault::MissingPrefix);
    }

    #[test]
    fn payload_characters_are_not_checked_here() {
        assert_eq!(unwrap("[stgy:a b]").unwrap(), "a b");
    }

    #[test]
    fn find_tokens_in_chat_log() {
        let log = "tank LB here [stgy:auyiM] then [stgy:] and [stgy:aus] end [stgy:open";
        let found: Vec<_> = find_tokens(log).collect();
        assert_eq!(found, vec!["[stgy:auyiM]", "[stgy:aus]"]);
    }

    #[test]
    fn find_tokens_without_any() {
        assert_eq!(find_tokens("nothing to see").count(), 0);
    }
}
