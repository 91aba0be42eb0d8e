//! Small shared utilities: timestamps and ID generation.

/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a snowflake-style i64 resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER so IDs
/// survive a round trip through JSON clients):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at store scale)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Normalize a Brazilian phone number to its 11 significant digits.
///
/// Strips formatting characters and a leading country code ("55") when the
/// remainder still holds a full DDD + number. Returns `None` when fewer than
/// 11 digits remain — the caller decides whether that is a validation error.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let digits = match digits.strip_prefix("55") {
        Some(rest) if rest.len() >= 11 => rest,
        _ => digits.as_str(),
    };
    if digits.len() < 11 {
        return None;
    }
    // Keep the last 11 digits: DDD (2) + 9-digit mobile number
    Some(digits[digits.len() - 11..].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_ids_are_js_safe() {
        let id = snowflake_id();
        assert!(id > 0);
        assert!(id <= (1_i64 << 53), "ID must fit in 53 bits");
    }

    #[test]
    fn normalize_phone_strips_formatting() {
        assert_eq!(
            normalize_phone("(85) 99123-4567").as_deref(),
            Some("85991234567")
        );
    }

    #[test]
    fn normalize_phone_strips_country_code() {
        assert_eq!(
            normalize_phone("+55 85 99123-4567").as_deref(),
            Some("85991234567")
        );
    }

    #[test]
    fn normalize_phone_rejects_short_numbers() {
        assert_eq!(normalize_phone("9123-4567"), None);
        assert_eq!(normalize_phone(""), None);
    }
}
