/// A simple deterministic hash that maps any string to a bucket in [0, 100).
/// Non-cryptographic by design: the only requirements are stability across
/// process runs and a reasonably uniform spread over distinct inputs.
///
/// The rolling step is `h = (h << 5) - h + unit` folded into 32-bit signed
/// arithmetic. Hashing UTF-16 code units keeps the buckets identical to
/// implementations that iterate `charCodeAt`, for non-ASCII input too.
pub fn bucket(input: &str) -> u32 {
    let mut h: i32 = 0;
    for unit in input.encode_utf16() {
        h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit));
    }
    h.unsigned_abs() % 100
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_string_is_valid() {
        assert_eq!(bucket(""), 0);
    }

    #[test]
    fn repeated_calls_agree() {
        let inputs = ["user-1beta", "user-2beta", "a", "日本語flag"];
        for input in inputs {
            assert_eq!(bucket(input), bucket(input));
        }
    }

    #[test]
    fn all_buckets_in_range() {
        for i in 0..10_000 {
            let b = bucket(&format!("user-{i}rollout-flag"));
            assert!(b < 100, "bucket {b} out of range for user-{i}");
        }
    }

    #[test]
    fn spread_is_roughly_uniform() {
        // 10k distinct user ids against one flag name; every bucket should
        // see some traffic and none should dominate.
        let mut counts = [0u32; 100];
        for i in 0..10_000 {
            counts[bucket(&format!("user-{i}spread-check")) as usize] += 1;
        }
        for (b, &n) in counts.iter().enumerate() {
            assert!(n > 10, "bucket {b} nearly empty: {n}");
            assert!(n < 500, "bucket {b} overloaded: {n}");
        }
    }
}
