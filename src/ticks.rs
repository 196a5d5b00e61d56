//! Tick label formatting.
//!
//! [`TickFormat`] is the closed set of formatter kinds accepted for an
//! axis or colorbar: a reusable formatter object, a pattern string, or a
//! plain closure. The kind is chosen explicitly by the caller; the only
//! failure mode left is an unparseable pattern string at construction.

use std::fmt;

use crate::error::{Result, TufteError};

/// A reusable tick formatter object.
pub trait TickFormatter: Send + Sync {
    /// Produce the label for a tick value.
    fn format(&self, value: f64) -> String;
}

/// Tick label format, dispatched by explicit kind.
pub enum TickFormat {
    /// A formatter object implementing [`TickFormatter`]
    Formatter(Box<dyn TickFormatter>),
    /// A validated pattern string such as `"{:.2}"` or `"$ {:.1} V$"`
    Pattern(Pattern),
    /// A unary closure mapping tick value to label
    Func(Box<dyn Fn(f64) -> String + Send + Sync>),
}

impl TickFormat {
    /// Build a pattern format, validating the placeholder.
    ///
    /// The pattern holds exactly one `{}` or `{:.N}` placeholder with
    /// optional literal text around it.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(TickFormat::Pattern(Pattern::parse(pattern)?))
    }

    /// Wrap a unary label closure.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(f64) -> String + Send + Sync + 'static,
    {
        TickFormat::Func(Box::new(f))
    }

    /// Wrap a formatter object.
    pub fn formatter<F: TickFormatter + 'static>(f: F) -> Self {
        TickFormat::Formatter(Box::new(f))
    }

    /// Produce the label for a tick value.
    pub fn label(&self, value: f64) -> String {
        match self {
            TickFormat::Formatter(f) => f.format(value),
            TickFormat::Pattern(p) => p.apply(value),
            TickFormat::Func(f) => f(value),
        }
    }
}

impl fmt::Debug for TickFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickFormat::Formatter(_) => f.write_str("TickFormat::Formatter(..)"),
            TickFormat::Pattern(p) => write!(f, "TickFormat::Pattern({:?})", p),
            TickFormat::Func(_) => f.write_str("TickFormat::Func(..)"),
        }
    }
}

/// A parsed pattern string: literal text around one numeric placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    prefix: String,
    suffix: String,
    precision: Option<usize>,
}

impl Pattern {
    /// Parse a pattern of the form `prefix{:.N}suffix` or `prefix{}suffix`.
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |message: String| TufteError::InvalidParameter {
            param: "pattern".to_string(),
            message,
        };

        let open = pattern
            .find('{')
            .ok_or_else(|| invalid(format!("no placeholder in tick pattern: {:?}", pattern)))?;
        let close = pattern[open..]
            .find('}')
            .map(|i| open + i)
            .ok_or_else(|| invalid(format!("unclosed placeholder in tick pattern: {:?}", pattern)))?;

        let suffix = &pattern[close + 1..];
        if suffix.contains('{') || suffix.contains('}') {
            return Err(invalid(format!(
                "tick pattern holds more than one placeholder: {:?}",
                pattern
            )));
        }

        let spec = &pattern[open + 1..close];
        let precision = match spec {
            "" => None,
            _ => {
                let digits = spec.strip_prefix(":.").ok_or_else(|| {
                    invalid(format!("unsupported placeholder spec: {:?}", spec))
                })?;
                let precision = digits.parse::<usize>().map_err(|_| {
                    invalid(format!("invalid precision in placeholder: {:?}", spec))
                })?;
                Some(precision)
            }
        };

        Ok(Self {
            prefix: pattern[..open].to_string(),
            suffix: suffix.to_string(),
            precision,
        })
    }

    /// Format a tick value through the pattern.
    pub fn apply(&self, value: f64) -> String {
        match self.precision {
            Some(precision) => format!("{}{:.*}{}", self.prefix, precision, value, self.suffix),
            None => format!("{}{}{}", self.prefix, value, self.suffix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Percent;

    impl TickFormatter for Percent {
        fn format(&self, value: f64) -> String {
            format!("{:.0}%", value * 100.0)
        }
    }

    #[test]
    fn test_pattern_with_precision() {
        let fmt = TickFormat::pattern("${:.2}$").unwrap();
        assert_eq!(fmt.label(1.234), "$1.23$");
        assert_eq!(fmt.label(-0.5), "$-0.50$");
    }

    #[test]
    fn test_pattern_without_precision() {
        let fmt = TickFormat::pattern("{} V").unwrap();
        assert_eq!(fmt.label(2.5), "2.5 V");
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(TickFormat::pattern("no placeholder").is_err());
        assert!(TickFormat::pattern("{:.2").is_err());
        assert!(TickFormat::pattern("{:x}").is_err());
        assert!(TickFormat::pattern("{:.ab}").is_err());
        assert!(TickFormat::pattern("{}{}").is_err());
    }

    #[test]
    fn test_func_format() {
        let fmt = TickFormat::func(|v| format!("10^{:.0}", v.log10()));
        assert_eq!(fmt.label(1e5), "10^5");
    }

    #[test]
    fn test_formatter_object() {
        let fmt = TickFormat::formatter(Percent);
        assert_eq!(fmt.label(0.25), "25%");
    }
}
