//! Mapping month names from query parameters to month numbers.

use serde::Deserialize;

use crate::Error;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Get the month number (1-12) for the English name of a month, e.g. "March" -> 3.
///
/// Names are matched exactly, so "march" and "Mar" are not recognised.
pub fn get_month_number(month: &str) -> Option<u8> {
    MONTH_NAMES
        .iter()
        .position(|&name| name == month)
        .map(|index| index as u8 + 1)
}

/// Whether requests must name a month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonthPolicy {
    /// Requests without a month are rejected with [Error::InvalidMonth].
    #[default]
    Required,
    /// Requests without a month are not filtered by month.
    Optional,
}

/// The month query parameter shared by the analytics endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// The English name of the month, e.g. "March".
    pub month: Option<String>,
}

/// Turn the month query parameter into a month number to filter on.
///
/// Returns `Ok(None)` when no month was given and `policy` is [MonthPolicy::Optional].
///
/// # Errors
/// Returns [Error::InvalidMonth] if `month` is not a month name, or if it is
/// missing or empty and `policy` is [MonthPolicy::Required].
pub(crate) fn resolve_month_filter(
    month: Option<&str>,
    policy: MonthPolicy,
) -> Result<Option<u8>, Error> {
    match (month, policy) {
        (None | Some(""), MonthPolicy::Optional) => Ok(None),
        (None, MonthPolicy::Required) => Err(Error::InvalidMonth(String::new())),
        (Some(month), _) => get_month_number(month)
            .map(Some)
            .ok_or_else(|| Error::InvalidMonth(month.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{MONTH_NAMES, MonthPolicy, get_month_number, resolve_month_filter};

    #[test]
    fn maps_every_month_name() {
        for (index, name) in MONTH_NAMES.iter().enumerate() {
            assert_eq!(get_month_number(name), Some(index as u8 + 1), "{name}");
        }

        assert_eq!(get_month_number("January"), Some(1));
        assert_eq!(get_month_number("March"), Some(3));
        assert_eq!(get_month_number("December"), Some(12));
    }

    #[test]
    fn rejects_other_strings() {
        for month in ["", "Marchh", "march", "MARCH", "Mar", "3", " March", "Smarch"] {
            assert_eq!(get_month_number(month), None, "{month:?}");
        }
    }

    #[test]
    fn required_month_rejects_missing_month() {
        assert_eq!(
            resolve_month_filter(None, MonthPolicy::Required),
            Err(Error::InvalidMonth(String::new()))
        );
        assert_eq!(
            resolve_month_filter(Some(""), MonthPolicy::Required),
            Err(Error::InvalidMonth(String::new()))
        );
    }

    #[test]
    fn optional_month_allows_missing_month() {
        assert_eq!(resolve_month_filter(None, MonthPolicy::Optional), Ok(None));
        assert_eq!(resolve_month_filter(Some(""), MonthPolicy::Optional), Ok(None));
    }

    #[test]
    fn unrecognised_month_is_rejected_under_either_policy() {
        for policy in [MonthPolicy::Required, MonthPolicy::Optional] {
            assert_eq!(
                resolve_month_filter(Some("Marchh"), policy),
                Err(Error::InvalidMonth("Marchh".to_owned()))
            );
        }
    }

    #[test]
    fn valid_month_resolves_to_number() {
        assert_eq!(
            resolve_month_filter(Some("November"), MonthPolicy::Required),
            Ok(Some(11))
        );
        assert_eq!(
            resolve_month_filter(Some("November"), MonthPolicy::Optional),
            Ok(Some(11))
        );
    }
}
