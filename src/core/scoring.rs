// Filename quality heuristic used to pick the file kept from a duplicate group.

pub const NOT_WHATSAPP_BONUS: i32 = 10;
pub const NOT_COPY_BONUS: i32 = 5;
pub const NOT_TIMESTAMPED_BONUS: i32 = 3;
pub const UNDERSCORE_BONUS: i32 = 1;

/// True when `name` begins with `YYYY-MM-DD` (digits only, no calendar check).
fn starts_with_date(name: &str) -> bool {
    let bytes = name.as_bytes();
    if bytes.len() < 10 {
        return false;
    }
    bytes[..10].iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    })
}

/// Score a filename, higher is better.
pub fn quality_score(name: &str) -> i32 {
    let lower = name.to_lowercase();
    let mut score = 0;
    if !lower.contains("whatsapp") {
        score += NOT_WHATSAPP_BONUS;
    }
    if !lower.contains("copy") {
        score += NOT_COPY_BONUS;
    }
    if !starts_with_date(name) {
        score += NOT_TIMESTAMPED_BONUS;
    }
    if name.contains('_') {
        score += UNDERSCORE_BONUS;
    }
    score
}
