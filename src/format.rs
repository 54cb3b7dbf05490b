use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::model::{FormattedIssue, Issue};

#[derive(Debug, thiserror::Error)]
#[error("unrecognized date '{0}'")]
pub struct DateError(pub String);

/// Formats a timestamp as `MM/DD/YYYY`.
///
/// The calendar date is taken as written in the input; an explicit offset is
/// honoured but the value is never shifted into the host's time zone.
pub fn format_date(s: &str) -> Result<String, DateError> {
    let s = s.trim();
    let date = if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        dt.date_naive()
    } else if let Ok(dt) = s.parse::<NaiveDateTime>() {
        dt.date()
    } else if let Ok(d) = s.parse::<NaiveDate>() {
        d
    } else {
        return Err(DateError(s.to_string()));
    };
    Ok(date.format("%m/%d/%Y").to_string())
}

pub fn format_issue(issue: Issue) -> FormattedIssue {
    let display_date = match format_date(&issue.created_at) {
        Ok(date) => date,
        Err(err) => {
            tracing::warn!(title = issue.title().unwrap_or_default(), "{}", err);
            issue.created_at.clone()
        }
    };
    FormattedIssue {
        issue,
        display_date,
    }
}
