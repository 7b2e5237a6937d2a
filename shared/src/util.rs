use rand::Rng;

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms)
pub fn snowflake_id() -> i64 {
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Uppercase base-36 rendering of a non-negative integer
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Generate a stock-keeping code: `PV-<base36 millis>-<3 random chars>`.
///
/// Uniqueness is probabilistic; collisions are not checked.
pub fn generate_sku(now_ms: i64) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..3)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("PV-{}-{}", to_base36(now_ms.max(0) as u64), suffix)
}

/// Round to the nearest integer, ties toward +∞ (`-2.5` becomes `-2`)
///
/// Stored figures were produced with this rule, so every derived value
/// uses it instead of `f64::round`.
pub fn js_round(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to 2 decimal places, ties toward +∞
pub fn round2(value: f64) -> f64 {
    js_round(value * 100.0) / 100.0
}

/// Render an amount the way a JS number prints: no trailing `.0` for whole values
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_generate_sku_shape() {
        let sku = generate_sku(1_760_000_000_000);
        let parts: Vec<&str> = sku.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "PV");
        assert_eq!(parts[1], to_base36(1_760_000_000_000));
        assert_eq!(parts[2].len(), 3);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(-20.0), -20.0);
        assert_eq!(round2(66.666), 66.67);
    }

    #[test]
    fn test_ties_round_toward_positive() {
        assert_eq!(js_round(2.5), 3.0);
        assert_eq!(js_round(-2.5), -2.0);
        assert_eq!(js_round(-2.6), -3.0);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.12);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(499.0), "499");
        assert_eq!(format_amount(99.5), "99.5");
    }

    #[test]
    fn test_snowflake_positive() {
        assert!(snowflake_id() > 0);
    }
}
