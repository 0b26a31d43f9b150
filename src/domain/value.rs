use crate::domain::validation::ValidationError;

use phonenumber::country;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Destination number in one of the shapes the gateway routes.
///
/// Invariant: ASCII digits only, matching exactly one of `07` + 8 digits
/// (national), `407` + 8 digits (country-prefixed), or `7` + 8 digits
/// (short national). A single leading `+` on the input is stripped before
/// validation.
pub struct Recipient(String);

impl Recipient {
    /// Validate a destination number.
    ///
    /// The rejection message carries the number after `+`-stripping, which is
    /// what the gateway contract reports.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let number = value.trim();
        let number = number.strip_prefix('+').unwrap_or(number);
        if !Self::routable(number) {
            return Err(ValidationError::RecipientFormat {
                number: number.to_owned(),
            });
        }
        Ok(Self(number.to_owned()))
    }

    fn routable(number: &str) -> bool {
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        (number.starts_with("07") && number.len() == 10)
            || (number.starts_with("407") && number.len() == 11)
            || (number.starts_with('7') && number.len() == 9)
    }

    /// The normalized number as sent to the gateway (no `+`).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<PhoneNumber> for Recipient {
    type Error = ValidationError;

    /// Convert a parsed phone number via its E.164 form. Fails when the
    /// number is valid E.164 but not one of the shapes the gateway routes.
    fn try_from(value: PhoneNumber) -> Result<Self, Self::Error> {
        Self::new(value.e164)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Opt-in convenience for callers holding formatted input such as
/// `+40 712 345 678`; convert into [`Recipient`] with `try_into()`.
/// Equality and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
}

impl PhoneNumber {
    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit
    /// country prefix; for this gateway that is usually
    /// [`country::Id::RO`].
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: "phone" });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164 })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS text to be delivered.
///
/// Invariant: non-empty and at most [`MessageBody::MAX_CHARS`] characters,
/// or [`MessageBody::MAX_CHARS_UNICODE`] when the message is sent with
/// unicode encoding.
pub struct MessageBody(String);

impl MessageBody {
    /// Maximum length of a plain (GSM-7) message.
    pub const MAX_CHARS: usize = 160;
    /// Maximum length when unicode encoding is requested.
    pub const MAX_CHARS_UNICODE: usize = 70;

    /// Validate message text against the length limit for the given encoding.
    pub fn new(value: impl Into<String>, unicode: bool) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        let limit = if unicode {
            Self::MAX_CHARS_UNICODE
        } else {
            Self::MAX_CHARS
        };
        if value.chars().count() > limit {
            return Err(ValidationError::MessageTooLong { limit });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Tracking id returned by the gateway for an accepted message.
///
/// Invariant: `32..=60` bytes. Anything the gateway returns outside that
/// range is an error message, not an id, so the constructor doubles as the
/// success classifier.
pub struct SmsId(String);

impl SmsId {
    /// Shortest id the gateway issues.
    pub const MIN_LEN: usize = 32;
    /// Longest id the gateway issues.
    pub const MAX_LEN: usize = 60;

    /// Create a validated [`SmsId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let actual = value.len();
        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&actual) {
            return Err(ValidationError::SmsIdLength { actual });
        }
        Ok(Self(value))
    }

    /// Borrow the validated id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Opaque token identifying a standing authenticated session.
///
/// Invariant: non-empty after trimming. The gateway occasionally answers an
/// open call with an empty payload; that is treated as "no token issued"
/// rather than an empty token.
pub struct SessionToken(String);

impl SessionToken {
    /// Create a validated [`SessionToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "session" });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Public URL where the gateway posts delivery reports.
pub struct CallbackUrl(Url);

impl CallbackUrl {
    /// Create a validated [`CallbackUrl`].
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let input = value.as_ref().trim();
        let url = Url::parse(input).map_err(|_| ValidationError::InvalidUrl {
            field: "callback",
            input: input.to_owned(),
        })?;
        Ok(Self(url))
    }

    /// The URL as sent to the gateway.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Target URL carried by a WAP-push message.
pub struct PushUrl(Url);

impl PushUrl {
    /// Create a validated [`PushUrl`].
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let input = value.as_ref().trim();
        let url = Url::parse(input).map_err(|_| ValidationError::InvalidUrl {
            field: "wap push",
            input: input.to_owned(),
        })?;
        Ok(Self(url))
    }

    /// The URL as sent to the gateway.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_accepts_the_three_routable_shapes() {
        assert_eq!(Recipient::new("0712345678").unwrap().as_str(), "0712345678");
        assert_eq!(
            Recipient::new("40712345678").unwrap().as_str(),
            "40712345678"
        );
        assert_eq!(Recipient::new("712345678").unwrap().as_str(), "712345678");
    }

    #[test]
    fn recipient_strips_a_leading_plus() {
        let r = Recipient::new("+40712345678").unwrap();
        assert_eq!(r.as_str(), "40712345678");
    }

    #[test]
    fn recipient_rejects_off_shape_numbers() {
        for input in [
            "12345",
            "0812345678",  // wrong prefix
            "071234567",   // 07 but 9 digits
            "07123456789", // 07 but 11 digits
            "4071234567",  // 407 but 10 digits
            "71234567",    // 7 but 8 digits
            "07123a5678",  // non-digit
            "",
            "+",
        ] {
            assert!(Recipient::new(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn recipient_rejection_reports_the_stripped_number() {
        let err = Recipient::new("+12345").unwrap_err();
        assert_eq!(err.to_string(), "Incorrect format for phone number: 12345");
    }

    #[test]
    fn phone_number_parses_and_converts_to_recipient() {
        let pn = PhoneNumber::parse(None, "+40 712 345 678").unwrap();
        assert_eq!(pn.e164(), "+40712345678");
        assert_eq!(pn.raw(), "+40 712 345 678");

        let recipient: Recipient = pn.try_into().unwrap();
        assert_eq!(recipient.as_str(), "40712345678");

        assert!(PhoneNumber::parse(None, "not-a-number").is_err());
        assert!(PhoneNumber::parse(None, "  ").is_err());
    }

    #[test]
    fn phone_number_equality_uses_e164() {
        let p1 = PhoneNumber::parse(Some(country::Id::RO), "0712345678").unwrap();
        let p2 = PhoneNumber::parse(None, "+40712345678").unwrap();
        assert_eq!(p1, p2);
    }

    #[test]
    fn message_body_rejects_empty_and_over_length() {
        assert!(matches!(
            MessageBody::new("", false),
            Err(ValidationError::EmptyMessage)
        ));

        let at_limit = "x".repeat(MessageBody::MAX_CHARS);
        assert!(MessageBody::new(at_limit, false).is_ok());

        let over = "x".repeat(MessageBody::MAX_CHARS + 1);
        assert!(matches!(
            MessageBody::new(over, false),
            Err(ValidationError::MessageTooLong { limit: 160 })
        ));
    }

    #[test]
    fn message_body_unicode_limit_is_70_chars() {
        let at_limit = "ă".repeat(MessageBody::MAX_CHARS_UNICODE);
        assert!(MessageBody::new(at_limit, true).is_ok());

        let over = "ă".repeat(MessageBody::MAX_CHARS_UNICODE + 1);
        assert!(matches!(
            MessageBody::new(over, true),
            Err(ValidationError::MessageTooLong { limit: 70 })
        ));

        // 71 plain chars are fine without unicode encoding.
        assert!(MessageBody::new("x".repeat(71), false).is_ok());
    }

    #[test]
    fn sms_id_length_bounds_are_inclusive() {
        assert!(SmsId::new("a".repeat(SmsId::MIN_LEN - 1)).is_err());
        assert!(SmsId::new("a".repeat(SmsId::MIN_LEN)).is_ok());
        assert!(SmsId::new("a".repeat(SmsId::MAX_LEN)).is_ok());
        assert!(SmsId::new("a".repeat(SmsId::MAX_LEN + 1)).is_err());
    }

    #[test]
    fn session_token_rejects_empty() {
        let token = SessionToken::new(" abc ").unwrap();
        assert_eq!(token.as_str(), "abc");
        assert!(matches!(
            SessionToken::new("   "),
            Err(ValidationError::Empty { field: "session" })
        ));
    }

    #[test]
    fn urls_are_validated_at_construction() {
        let cb = CallbackUrl::new("https://example.com/dlr?id=1").unwrap();
        assert_eq!(cb.as_str(), "https://example.com/dlr?id=1");
        assert!(CallbackUrl::new("not a url").is_err());

        let push = PushUrl::new("https://example.com/promo").unwrap();
        assert_eq!(push.as_str(), "https://example.com/promo");
        assert!(PushUrl::new("::::").is_err());
    }
}
