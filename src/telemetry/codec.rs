use super::ParamSet;
use itertools::Itertools;

/// Field separator on the wire.
const DELIMITER: char = ',';

/// Decodes one frame of comma-separated integers into a [`ParamSet`].
///
/// Token 0 is the orbital speed, token 1 the altitude, anything after that is
/// ignored. Empty tokens (`"5,,120"`) are skipped. Returns `None` when fewer
/// than two tokens are present so the caller can keep its previous parameters.
pub fn decode(raw: &[u8]) -> Option<ParamSet> {
    let text = String::from_utf8_lossy(raw);
    text.split(DELIMITER)
        .filter(|tok| !tok.is_empty())
        .map(lenient_int)
        .next_tuple::<(i32, i32)>()
        .map(ParamSet::from)
}

/// Encodes a [`ParamSet`] the way the feed puts it on the wire.
pub fn encode(params: ParamSet) -> String {
    format!("{}{DELIMITER} {}", params.orbital_speed(), params.altitude())
}

/// Best-effort integer conversion.
///
/// Skips leading whitespace, accepts one optional sign and then the longest run
/// of ASCII digits. Anything without digits is `0`; out-of-range values
/// saturate at the `i32` bounds.
pub fn lenient_int(token: &str) -> i32 {
    let trimmed = token.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let magnitude = unsigned
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            (acc * 10 + i64::from(d - b'0')).min(i64::from(i32::MAX) + 1)
        });
    let signed = if negative { -magnitude } else { magnitude };
    i32::try_from(signed).unwrap_or(if negative { i32::MIN } else { i32::MAX })
}
