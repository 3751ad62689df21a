// Referral code generation
// Short tokens drawn from the UUIDv4 space; uniqueness is enforced by the
// database constraint and practically guaranteed by the identifier space

use uuid::Uuid;

/// Length of a referral code in characters
pub const REFERRAL_CODE_LENGTH: usize = 8;

/// Generate a fresh 8-character referral code
pub fn generate_referral_code() -> String {
    Uuid::new_v4()
        .as_simple()
        .to_string()
        .chars()
        .take(REFERRAL_CODE_LENGTH)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_code_shape() {
        let code = generate_referral_code();
        assert_eq!(code.len(), REFERRAL_CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_codes_do_not_repeat_in_practice() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_referral_code()).collect();
        assert_eq!(codes.len(), 1000);
    }
}
