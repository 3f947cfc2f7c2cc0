//! Sender identity normalization.
//!
//! Raw sender identifiers arrive as JIDs ("5511999998888@s.whatsapp.net"),
//! sometimes as device-scoped aliases ("1234:56@lid") with the real phone in
//! a secondary field. Normalization produces the digits-only dialable number
//! used as the contact key, or rejects the identifier outright.

/// Accepted dialable-number length, inclusive.
const MIN_DIGITS: usize = 10;
const MAX_DIGITS: usize = 15;

/// Canonicalize a raw sender identifier into a digits-only phone number.
///
/// `sender_pn` is the linked-device secondary field; when present it wins
/// over `remote_jid`. Everything after the first `@` is discarded, then all
/// non-digits. Numbers outside 10-15 digits are rejected with `None`.
pub fn normalize_sender(remote_jid: &str, sender_pn: Option<&str>) -> Option<String> {
    let raw = match sender_pn {
        Some(pn) if !pn.trim().is_empty() => pn,
        _ => remote_jid,
    };

    let local = raw.split('@').next().unwrap_or(raw);
    let digits: String = local.chars().filter(|c| c.is_ascii_digit()).collect();

    if (MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
        Some(digits)
    } else {
        None
    }
}
