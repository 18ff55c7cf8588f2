//! Parameterised report queries: audit evidence and cash reports.
//!
//! Both screens are filtered GETs. The portal checks the date range before
//! sending it and translates the form into backend query parameters.

use chrono::NaiveDate;
use pagination::{ListQuery, PageLimit};
use serde::Deserialize;

use super::forms::{FormError, FormErrorCode};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_date(field: &'static str, raw: Option<&str>) -> Result<Option<NaiveDate>, FormError> {
    let Some(text) = raw.map(str::trim).filter(|text| !text.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map(Some)
        .map_err(|_| {
            FormError::new(
                field,
                FormErrorCode::InvalidFormat,
                format!("{field} must be a date in YYYY-MM-DD form"),
            )
        })
}

/// Inclusive date range; either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl DateRange {
    /// Parse `YYYY-MM-DD` bounds and check `from <= to`.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::reports::DateRange;
    ///
    /// assert!(DateRange::parse(Some("2026-01-01"), Some("2026-01-31")).is_ok());
    /// assert!(DateRange::parse(Some("2026-02-01"), Some("2026-01-31")).is_err());
    /// assert!(DateRange::parse(Some("01/02/2026"), None).is_err());
    /// ```
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, FormError> {
        let from = parse_date("from", from)?;
        let to = parse_date("to", to)?;
        if let (Some(start), Some(end)) = (from, to) {
            if start > end {
                return Err(FormError::new(
                    "from",
                    FormErrorCode::OutOfRange,
                    "from must not be after to",
                ));
            }
        }
        Ok(Self { from, to })
    }

    /// Lower bound.
    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    /// Upper bound.
    pub fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    fn apply(&self, query: ListQuery) -> ListQuery {
        query
            .with_optional_filter("from", self.from.map(|d| d.format(DATE_FORMAT).to_string()))
            .with_optional_filter("to", self.to.map(|d| d.format(DATE_FORMAT).to_string()))
    }
}

/// Raw audit evidence filter form (query string).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditEvidenceParams {
    /// Start date.
    #[serde(default)]
    pub from: Option<String>,
    /// End date.
    #[serde(default)]
    pub to: Option<String>,
    /// Audit action code.
    #[serde(default)]
    pub action: Option<String>,
    /// Actor email.
    #[serde(default)]
    pub actor: Option<String>,
    /// Entity type, e.g. `sale`.
    #[serde(default)]
    pub entity: Option<String>,
}

/// Validated audit evidence query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvidenceQuery {
    range: DateRange,
    action: Option<String>,
    actor: Option<String>,
    entity: Option<String>,
}

impl AuditEvidenceQuery {
    /// Validate the filter form.
    pub fn try_from_params(params: &AuditEvidenceParams) -> Result<Self, FormError> {
        Ok(Self {
            range: DateRange::parse(params.from.as_deref(), params.to.as_deref())?,
            action: params.action.clone(),
            actor: params.actor.clone(),
            entity: params.entity.clone(),
        })
    }

    /// Date range.
    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Backend list query.
    pub fn to_list_query(&self, limit: PageLimit) -> ListQuery {
        self.range
            .apply(ListQuery::new(limit))
            .with_optional_filter("action", self.action.clone())
            .with_optional_filter("actor", self.actor.clone())
            .with_optional_filter("entity", self.entity.clone())
    }
}

/// Raw cash report filter form (query string).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashReportParams {
    /// Start date.
    #[serde(default)]
    pub from: Option<String>,
    /// End date.
    #[serde(default)]
    pub to: Option<String>,
    /// Cashier email.
    #[serde(default)]
    pub cashier: Option<String>,
    /// Store location.
    #[serde(default)]
    pub location_id: Option<String>,
}

/// Validated cash report query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashReportQuery {
    range: DateRange,
    cashier: Option<String>,
    location_id: Option<String>,
}

impl CashReportQuery {
    /// Validate the filter form.
    pub fn try_from_params(params: &CashReportParams) -> Result<Self, FormError> {
        Ok(Self {
            range: DateRange::parse(params.from.as_deref(), params.to.as_deref())?,
            cashier: params.cashier.clone(),
            location_id: params.location_id.clone(),
        })
    }

    /// Backend list query.
    pub fn to_list_query(&self, limit: PageLimit) -> ListQuery {
        self.range
            .apply(ListQuery::new(limit))
            .with_optional_filter("cashier", self.cashier.clone())
            .with_optional_filter("locationId", self.location_id.clone())
    }
}
