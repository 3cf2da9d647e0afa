//! Client for the remote time-tracking service.
//!
//! Fetches the signed-in user's project codes, logged work months and
//! required hours, and turns them into the same ledger and registry types
//! the local hour logs produce.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use hs_core::{HourLedger, ParseError, ProjectEntry, ProjectRegistry, RequiredHours, parse_year_month};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const API_PREFIX: &str = "api/v0";
const SESSION_COOKIE: &str = "__Secure-x-reaktor-session-id";

/// API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No session cookie was configured.
    #[error("missing session cookie")]
    MissingSession,
    /// No server was configured.
    #[error("missing server url")]
    MissingServer,
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with something other than 200.
    #[error("failed to get {path}: {status} / {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },
    /// Failed to parse response.
    #[error("invalid response from {path}: {message}")]
    InvalidResponse { path: String, message: String },
    /// A month key in a response did not parse.
    #[error(transparent)]
    Month(#[from] ParseError),
}

/// Time-tracking API client.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    session: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("session", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for `server`, which may carry a URL scheme.
    ///
    /// # Errors
    ///
    /// Returns an error if the server or session is empty or
    /// whitespace-only, or if the HTTP client fails to build.
    pub fn new(server: &str, session: impl Into<String>) -> Result<Self, ApiError> {
        let session = session.into();
        if session.trim().is_empty() {
            return Err(ApiError::MissingSession);
        }
        let host = strip_scheme(server.trim()).trim_end_matches('/');
        if host.is_empty() {
            return Err(ApiError::MissingServer);
        }

        Self::with_base_url(format!("https://{host}/{API_PREFIX}"), session)
    }

    /// Creates a client rooted at a full API URL, e.g. `https://host/api/v0`.
    fn with_base_url(base_url: String, session: String) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}/{path}", self.base_url);
        tracing::debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::COOKIE, format!("{SESSION_COOKIE}={}", self.session))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != reqwest::StatusCode::OK {
            return Err(ApiError::Status {
                path: format!("/{API_PREFIX}/{path}"),
                status: status.as_u16(),
                body,
            });
        }

        parse_body(path, &body)
    }

    /// Username of the session's owner.
    pub async fn whoami(&self) -> Result<String, ApiError> {
        let who: WhoAmI = self.get("whoami").await?;
        Ok(who.username)
    }

    /// Hour-code projects and their billability.
    pub async fn codes(&self, user: &str) -> Result<Vec<ProjectEntry>, ApiError> {
        let codes: Codes = self.get(&format!("codes/{user}")).await?;
        Ok(codes.invoices)
    }

    /// Every logged month with its daily entries.
    pub async fn work_months(&self, user: &str) -> Result<Vec<WorkMonth>, ApiError> {
        self.get(&format!("workMonths/{user}")).await
    }

    /// Required hours per `YYYY-MM` between two months, inclusive.
    pub async fn month_summaries(
        &self,
        user: &str,
        first: &str,
        last: &str,
    ) -> Result<BTreeMap<String, MonthSummary>, ApiError> {
        self.get(&format!("reports/monthSummaries/{user}/{first}/{last}"))
            .await
    }

    /// Fetches everything a report needs, in the order the service expects.
    pub async fn fetch_snapshot(&self) -> Result<Snapshot, ApiError> {
        let user = self.whoami().await?;
        tracing::debug!(%user, "signed in");

        let projects = self.codes(&user).await?;
        let months = self.work_months(&user).await?;

        let mut keys: Vec<&str> = months.iter().map(|m| m.month.as_str()).collect();
        keys.sort_unstable();
        let summaries = match (keys.first(), keys.last()) {
            (Some(first), Some(last)) => self.month_summaries(&user, first, last).await?,
            _ => BTreeMap::new(),
        };

        Ok(Snapshot {
            projects,
            months,
            summaries,
        })
    }
}

fn strip_scheme(server: &str) -> &str {
    server.split_once("://").map_or(server, |(_, rest)| rest)
}

fn parse_body<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|err| ApiError::InvalidResponse {
        path: format!("/{API_PREFIX}/{path}"),
        message: err.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct WhoAmI {
    username: String,
}

#[derive(Debug, Deserialize)]
struct Codes {
    invoices: Vec<ProjectEntry>,
}

/// One month of logged work.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkMonth {
    /// `YYYY-MM`.
    pub month: String,
    #[serde(default)]
    pub days: Vec<WorkDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkDay {
    #[serde(default)]
    pub entries: Vec<TimeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeEntry {
    #[serde(rename = "hourCode")]
    pub hour_code: String,
    #[serde(deserialize_with = "hours_from_number_or_string")]
    pub hours: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MonthSummary {
    #[serde(rename = "requiredHours")]
    pub required_hours: f64,
}

fn hours_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let hours: f64 = match Raw::deserialize(deserializer)? {
        Raw::Number(hours) => hours,
        Raw::Text(text) => text
            .trim()
            .replace(',', ".")
            .parse()
            .map_err(serde::de::Error::custom)?,
    };
    if !hours.is_finite() {
        return Err(serde::de::Error::custom(format!("invalid hours {hours}")));
    }
    if hours < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "hours cannot be negative, got {hours}"
        )));
    }
    Ok(hours)
}

/// Everything fetched for one report run.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub projects: Vec<ProjectEntry>,
    pub months: Vec<WorkMonth>,
    pub summaries: BTreeMap<String, MonthSummary>,
}

impl Snapshot {
    /// Registry with the absence code forced non-billable.
    pub fn registry(&self) -> ProjectRegistry {
        ProjectRegistry::new(self.projects.iter().cloned()).with_absence_code()
    }

    /// Ledger keyed by each work month.
    pub fn ledger(&self) -> Result<HourLedger, ApiError> {
        let mut ledger = HourLedger::new();
        for month in &self.months {
            let (year, month_number) = parse_year_month(&month.month)?;
            for entry in month.days.iter().flat_map(|day| &day.entries) {
                ledger.record_in_month(year, month_number, &entry.hour_code, entry.hours);
            }
        }
        Ok(ledger)
    }

    /// Required hours per month, reporting only months before `today`'s.
    pub fn required_hours(&self, today: NaiveDate) -> Result<RequiredHours, ApiError> {
        let mut by_month = BTreeMap::new();
        for (key, summary) in &self.summaries {
            by_month.insert(parse_year_month(key)?, summary.required_hours);
        }
        Ok(RequiredHours::new(by_month, (today.year(), today.month())))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use hs_core::ReportAggregator;

    use super::*;

    const WORK_MONTHS: &str = r#"[
        {"month": "2024-02", "days": [
            {"entries": [{"hourCode": "PROJA-1", "hours": 7.5}, {"hourCode": "poissa", "hours": "2,5"}]},
            {"entries": [{"hourCode": "PROJA-1", "hours": "4"}]}
        ]},
        {"month": "2024-01", "days": [
            {"entries": [{"hourCode": "INT-1", "hours": 1}]},
            {"entries": []}
        ]}
    ]"#;

    const SUMMARIES: &str = r#"{
        "2024-01": {"requiredHours": 165.0, "other": 1},
        "2024-02": {"requiredHours": 157.5}
    }"#;

    fn snapshot() -> Snapshot {
        Snapshot {
            projects: vec![
                ProjectEntry {
                    name: "PROJA".to_string(),
                    billable: true,
                },
                ProjectEntry {
                    name: "INT".to_string(),
                    billable: false,
                },
            ],
            months: parse_body("workMonths/me", WORK_MONTHS).unwrap(),
            summaries: parse_body("reports/monthSummaries/me/2024-01/2024-02", SUMMARIES)
                .unwrap(),
        }
    }

    #[test]
    fn client_rejects_empty_session() {
        assert!(matches!(
            Client::new("hours.example.com", "  "),
            Err(ApiError::MissingSession)
        ));
    }

    #[test]
    fn client_rejects_empty_server() {
        assert!(matches!(
            Client::new("https://", "cookie"),
            Err(ApiError::MissingServer)
        ));
    }

    #[test]
    fn client_strips_scheme_from_server() {
        let client = Client::new("https://hours.example.com/", "cookie").unwrap();
        assert_eq!(client.base_url(), "https://hours.example.com/api/v0");
        let client = Client::new("hours.example.com", "cookie").unwrap();
        assert_eq!(client.base_url(), "https://hours.example.com/api/v0");
    }

    #[test]
    fn client_debug_redacts_session() {
        let client = Client::new("hours.example.com", "secret-cookie").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-cookie"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn entry_hours_accept_numbers_and_strings() {
        let months: Vec<WorkMonth> = parse_body("workMonths/me", WORK_MONTHS).unwrap();
        let hours: Vec<f64> = months[0].days[0].entries.iter().map(|e| e.hours).collect();
        assert_eq!(hours, vec![7.5, 2.5]);
    }

    #[test]
    fn entry_hours_reject_non_finite_and_negative() {
        for hours in [r#""NaN""#, r#""inf""#, "-5", r#""-0,5""#] {
            let body = format!(
                r#"[{{"month": "2024-01", "days": [{{"entries": [{{"hourCode": "A-1", "hours": {hours}}}]}}]}}]"#
            );
            let err = parse_body::<Vec<WorkMonth>>("workMonths/me", &body).unwrap_err();
            assert!(
                matches!(err, ApiError::InvalidResponse { .. }),
                "{hours}: {err}"
            );
        }
    }

    #[test]
    fn invalid_body_names_the_path() {
        let err = parse_body::<Vec<WorkMonth>>("workMonths/me", "{}").unwrap_err();
        assert!(err.to_string().contains("/api/v0/workMonths/me"));
    }

    #[test]
    fn status_error_carries_code_and_body() {
        let err = ApiError::Status {
            path: "/api/v0/whoami".to_string(),
            status: 401,
            body: "unauthorized".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to get /api/v0/whoami: 401 / unauthorized"
        );
    }

    /// Serves one canned HTTP response and hands back the raw request.
    fn serve_once(response: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (format!("http://{addr}/{API_PREFIX}"), handle)
    }

    #[tokio::test]
    async fn non_200_response_fails_with_status_and_body() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 401 Unauthorized\r\nContent-Length: 12\r\nConnection: close\r\n\r\nunauthorized",
        );
        let client = Client::with_base_url(base_url, "cookie".to_string()).unwrap();

        let err = client.whoami().await.unwrap_err();
        match &err {
            ApiError::Status { path, status, body } => {
                assert_eq!(path, "/api/v0/whoami");
                assert_eq!(*status, 401);
                assert_eq!(body, "unauthorized");
            }
            other => panic!("expected status error, got {other:?}"),
        }

        let request = server.join().unwrap();
        assert!(request.starts_with("GET /api/v0/whoami "), "{request}");
        assert!(
            request
                .to_lowercase()
                .contains("cookie: __secure-x-reaktor-session-id=cookie"),
            "{request}"
        );
    }

    #[tokio::test]
    async fn ok_response_is_parsed() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 20\r\nConnection: close\r\n\r\n{\"username\":\"maija\"}",
        );
        let client = Client::with_base_url(base_url, "cookie".to_string()).unwrap();

        assert_eq!(client.whoami().await.unwrap(), "maija");
        server.join().unwrap();
    }

    #[test]
    fn snapshot_builds_ledger_by_month() {
        let ledger = snapshot().ledger().unwrap();
        assert_eq!(ledger.hours(2024, 2, "PROJA-1"), Some(11.5));
        assert_eq!(ledger.hours(2024, 2, "poissa"), Some(2.5));
        assert_eq!(ledger.hours(2024, 1, "INT-1"), Some(1.0));
    }

    #[test]
    fn snapshot_rejects_bad_month_key() {
        let mut snapshot = snapshot();
        snapshot.months[0].month = "February".to_string();
        assert!(matches!(snapshot.ledger(), Err(ApiError::Month(_))));
    }

    #[test]
    fn absence_is_never_billable() {
        let registry = snapshot().registry();
        assert!(!registry.is_billable("poissa"));
        assert!(registry.is_billable("PROJA-1"));
    }

    #[test]
    fn snapshot_report_stops_before_current_month() {
        let snapshot = snapshot();
        let ledger = snapshot.ledger().unwrap();
        let registry = snapshot.registry();
        let today = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        let required = snapshot.required_hours(today).unwrap();

        let years = ReportAggregator::new(&registry, &required).build(&ledger);
        assert_eq!(years.len(), 1);
        assert_eq!(years[0].months.len(), 1);
        let january = &years[0].months[0];
        assert_eq!(parse_year_month("2024-01").unwrap(), (january.year, january.month));
        assert!((january.expected_hours - 165.0).abs() < 1e-9);
        assert!((january.diff() + 164.0).abs() < 1e-9);
    }
}
