/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at shop scale)
///
/// Orders, products and variants all draw from the same generator.
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Unix millis → RFC 3339 UTC string (`2024-05-01T12:30:00.000Z`).
///
/// Order views render timestamps in this format; storage stays `i64` millis.
pub fn millis_to_rfc3339(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .unwrap_or_default()
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_id_positive_and_ordered() {
        let a = snowflake_id();
        assert!(a > 0);
        // IDs generated a few ms apart must be strictly increasing in the
        // timestamp bits
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = snowflake_id();
        assert!(b >> 12 > a >> 12);
    }

    #[test]
    fn test_snowflake_id_fits_in_53_bits() {
        let id = snowflake_id();
        assert!(id < (1i64 << 53));
    }

    #[test]
    fn test_millis_to_rfc3339() {
        // 2024-01-01 00:00:00 UTC
        assert_eq!(millis_to_rfc3339(1_704_067_200_000), "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_millis_to_rfc3339_zero() {
        assert_eq!(millis_to_rfc3339(0), "1970-01-01T00:00:00.000Z");
    }
}
