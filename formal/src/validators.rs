//! Built-in validation rules.
//!
//! Every rule here is built with [`make_rule`], so a passing value yields an
//! empty message. The format checks reject the empty string; pair them with
//! [`is_required`] when a field must also be filled in.

use std::borrow::Cow;
use std::str::FromStr;
use std::sync::LazyLock;

use email_address::EmailAddress;
use regex::Regex;
use url::{Host, Url};

use crate::rule::{Rule, RuleSpec, make_rule};

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9(][0-9 ().-]*[0-9]$").expect("phone pattern is valid")
});

/// Require a non-empty value.
pub fn is_required() -> Rule {
    make_rule(RuleSpec::new(str::is_empty, "Field is required.").inverted())
}

/// Require a valid email address with a dotted domain.
pub fn is_valid_email() -> Rule {
    make_rule(RuleSpec::new(is_email, "Must be a valid email address."))
}

/// Require an http, https or ftp URL. The scheme may be omitted.
pub fn is_valid_url() -> Rule {
    make_rule(RuleSpec::new(is_url, "Must be a valid URL."))
}

/// Require a phone number of 7 to 15 digits.
pub fn is_phone_number() -> Rule {
    make_rule(RuleSpec::new(is_phone, "Must be a valid phone number."))
}

/// Require minimum length (in characters).
pub fn min_length(min: usize, msg: impl Into<String>) -> Rule {
    make_rule(RuleSpec::new(move |v: &str| v.chars().count() >= min, msg))
}

/// Require maximum length (in characters).
pub fn max_length(max: usize, msg: impl Into<String>) -> Rule {
    make_rule(RuleSpec::new(move |v: &str| v.chars().count() <= max, msg))
}

/// Require the value to match a regex pattern.
pub fn pattern(pattern: &str, msg: impl Into<String>) -> Result<Rule, regex::Error> {
    let re = Regex::new(pattern)?;
    Ok(make_rule(RuleSpec::new(move |v: &str| re.is_match(v), msg)))
}

/// Require the value to contain a substring.
pub fn contains(substr: impl Into<String>, msg: impl Into<String>) -> Rule {
    let substr = substr.into();
    make_rule(RuleSpec::new(move |v: &str| v.contains(&substr), msg))
}

/// Require the value to equal another value.
pub fn equals(other: impl Into<String>, msg: impl Into<String>) -> Rule {
    let other = other.into();
    make_rule(RuleSpec::new(move |v: &str| v == other, msg))
}

fn is_email(value: &str) -> bool {
    EmailAddress::from_str(value).is_ok_and(|address| has_tld(address.domain()))
}

fn is_url(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }

    let candidate = if value.contains("://") {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("http://{value}"))
    };

    let Ok(url) = Url::parse(&candidate) else {
        return false;
    };

    if !matches!(url.scheme(), "http" | "https" | "ftp") {
        return false;
    }

    match url.host() {
        Some(Host::Domain(domain)) => has_tld(domain),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        None => false,
    }
}

fn is_phone(value: &str) -> bool {
    if !PHONE_RE.is_match(value) {
        return false;
    }
    let digits = value.chars().filter(char::is_ascii_digit).count();
    (7..=15).contains(&digits)
}

/// A host needs a non-empty label followed by an alphabetic TLD.
fn has_tld(host: &str) -> bool {
    match host.rsplit_once('.') {
        Some((name, tld)) => {
            !name.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
        }
        None => false,
    }
}
