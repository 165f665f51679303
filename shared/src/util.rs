/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// 生成订单号: ORD + 毫秒时间戳 + 6 位随机大写字母数字
///
/// 数据库层有 UNIQUE 约束兜底，调用方在撞号时重新生成。
pub fn order_no() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    format!("ORD{}{}", now_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_no_shape() {
        let no = order_no();
        assert!(no.starts_with("ORD"));
        // ORD + 13 位毫秒 + 6 位后缀
        assert_eq!(no.len(), 3 + 13 + 6);
        assert!(no[3..16].chars().all(|c| c.is_ascii_digit()));
        assert!(
            no[16..]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn snowflake_ids_are_positive_and_distinct() {
        let a = snowflake_id();
        let b = snowflake_id();
        assert!(a > 0);
        assert!(b > 0);
        // Same-millisecond collisions are possible but vanishingly rare with 12 random bits
        let ids: Vec<i64> = (0..64).map(|_| snowflake_id()).collect();
        let unique: std::collections::HashSet<i64> = ids.iter().copied().collect();
        assert!(unique.len() >= 60);
    }
}
