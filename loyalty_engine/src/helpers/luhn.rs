//! Luhn (mod 10) checksum validation for order numbers.

/// Returns true if `number` is a string of at least two ASCII digits whose Luhn checksum is zero.
///
/// Anything other than digits, including spaces and separators, fails validation.
pub fn is_valid(number: &str) -> bool {
    if number.len() < 2 || !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let sum: u32 = number
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| match (i % 2 == 1, d * 2) {
            (true, doubled) if doubled > 9 => doubled - 9,
            (true, doubled) => doubled,
            (false, _) => d,
        })
        .fold(0u32, |acc, d| (acc + d) % 10);
    sum == 0
}
