// SMS collaborators: verification codes, gateway delivery, daily usage limits.
// ProfileService only talks to these through their traits.

pub mod rate_limit;
pub mod sender;
pub mod verification;

pub use rate_limit::{RedisRateLimiter, SmsRateLimiter};
pub use sender::{HttpSmsSender, SmsSender};
pub use verification::{CodeCheck, MetadataVerificationCodes, VerificationCodes};

/// Hides all but the last four digits for log output.
pub fn mask_phone(phone_number: &str) -> String {
    let digits: Vec<char> = phone_number.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() <= 4 {
        return "*".repeat(digits.len());
    }
    let tail: String = digits[digits.len() - 4..].iter().collect();
    format!("***{tail}")
}
