//! Macro for implementing Display and FromStr for option enums
//!
//! Configuration values such as the removal policy or the job task names are
//! read from environment variables and files. This macro gives those enums a
//! single case-insensitive string mapping for both directions.
//!
//! # Example
//!
//! ```rust
//! use mailcal_domain::impl_domain_option_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Verbosity {
//!     Quiet,
//!     Loud,
//! }
//!
//! impl_domain_option_conversions!(Verbosity {
//!     Quiet => "quiet",
//!     Loud => "loud",
//! });
//!
//! assert_eq!("LOUD".parse::<Verbosity>(), Ok(Verbosity::Loud));
//! ```

/// Implements Display and FromStr traits for option enums
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase string
///   representations
///
/// Parsing trims surrounding whitespace and ignores case; unknown values
/// produce a descriptive error naming the enum.
#[macro_export]
macro_rules! impl_domain_option_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Channel {
        Inbox,
        Calendar,
    }

    impl_domain_option_conversions!(Channel {
        Inbox => "inbox",
        Calendar => "calendar",
    });

    #[test]
    fn display_uses_lowercase_name() {
        assert_eq!(Channel::Inbox.to_string(), "inbox");
        assert_eq!(Channel::Calendar.to_string(), "calendar");
    }

    #[test]
    fn parse_ignores_case_and_padding() {
        assert_eq!(Channel::from_str("CALENDAR").unwrap(), Channel::Calendar);
        assert_eq!(Channel::from_str("  Inbox ").unwrap(), Channel::Inbox);
    }

    #[test]
    fn parse_rejects_unknown_value() {
        let err = Channel::from_str("outbox").unwrap_err();
        assert_eq!(err, "Invalid Channel: outbox");
    }
}
