//! Asynchronous client for the fleet tracking and defects services.
//!
//! - `GET {base}/api/vessels` returns the tracking rows.
//! - `PUT {base}/checklist` and `PUT {base}/api/vessels/comments` persist
//!   operator edits; the caller applies them only after a 2xx.
//! - `GET {defects_base}/api/defects` lists open and closed defects.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{
    domain::{DefectRecord, VesselRecord},
    util::{config::AppConfig, version::user_agent},
};

#[derive(Debug, Error)]
pub enum FleetApiError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
pub struct FleetClient {
    http: Client,
    base_url: Url,
    defects_url: Url,
}

impl FleetClient {
    pub fn new(base: &str, defects_base: &str, timeout: Duration) -> Result<Self, FleetApiError> {
        let http = Client::builder()
            .user_agent(user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: directory_url(base)?,
            defects_url: directory_url(defects_base)?,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, FleetApiError> {
        Self::new(
            &config.api_base_url,
            &config.defects_base_url,
            config.request_timeout(),
        )
    }

    pub async fn get_vessels(&self) -> Result<Vec<VesselRecord>, FleetApiError> {
        let url = self.base_url.join("api/vessels")?;
        tracing::info!(%url, "fetching vessel tracking data");
        let rows: Vec<VesselDto> = self.fetch_json(self.http.get(url)).await?;
        Ok(rows.into_iter().map(VesselRecord::from).collect())
    }

    /// Returns the flag as stored by the server.
    pub async fn update_checklist(
        &self,
        id: Option<&str>,
        imo_no: &str,
        checklist_received: bool,
    ) -> Result<bool, FleetApiError> {
        let url = self.base_url.join("checklist")?;
        let body = ChecklistUpdate {
            id: id.unwrap_or(imo_no),
            imo_no,
            checklist_received,
        };
        tracing::info!(imo = imo_no, checklist_received, "updating checklist flag");
        let response: ChecklistResponse = self.fetch_json(self.http.put(url).json(&body)).await?;
        Ok(response.checklist_received.unwrap_or(checklist_received))
    }

    /// Returns the updated record when the server echoes one.
    pub async fn update_comments(
        &self,
        imo_no: &str,
        comments: &str,
    ) -> Result<Option<VesselRecord>, FleetApiError> {
        let url = self.base_url.join("api/vessels/comments")?;
        tracing::info!(imo = imo_no, len = comments.len(), "saving vessel comments");
        let response = self
            .send(self.http.put(url).json(&CommentsUpdate { imo_no, comments }))
            .await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        // Some deployments answer with a bare acknowledgement instead of the row.
        match serde_json::from_str::<VesselDto>(&text) {
            Ok(dto) => Ok(Some(VesselRecord::from(dto))),
            Err(err) => {
                tracing::debug!(error = %err, "comments response is not a vessel row");
                Ok(None)
            }
        }
    }

    pub async fn get_defects(&self) -> Result<Vec<DefectRecord>, FleetApiError> {
        let url = self.defects_url.join("api/defects")?;
        tracing::info!(%url, "fetching defects");
        let rows: Vec<DefectDto> = self.fetch_json(self.http.get(url)).await?;
        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(index, dto)| dto.into_record(index))
            .collect())
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<Response, FleetApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(FleetApiError::Status {
            status: status.as_u16(),
            body: body.trim().chars().take(200).collect(),
        })
    }

    async fn fetch_json<T>(&self, builder: reqwest::RequestBuilder) -> Result<T, FleetApiError>
    where
        T: DeserializeOwned,
    {
        let text = self.send(builder).await?.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Parses a base URL and makes sure relative joins append to its path.
fn directory_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[derive(Debug, Serialize)]
struct ChecklistUpdate<'a> {
    id: &'a str,
    imo_no: &'a str,
    checklist_received: bool,
}

#[derive(Debug, Deserialize)]
struct ChecklistResponse {
    #[serde(default, deserialize_with = "lenient_bool")]
    checklist_received: Option<bool>,
}

#[derive(Debug, Serialize)]
struct CommentsUpdate<'a> {
    imo_no: &'a str,
    comments: &'a str,
}

#[derive(Debug, Deserialize)]
struct VesselDto {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    imo_no: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    vessel_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    owner: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    event_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    office_doc: Option<String>,
    #[serde(default, alias = "fromport", deserialize_with = "lenient_string")]
    departure_port: Option<String>,
    #[serde(default, alias = "fromcountry", deserialize_with = "lenient_string")]
    departure_country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    departure_date: Option<String>,
    #[serde(default, alias = "toport", deserialize_with = "lenient_string")]
    arrival_port: Option<String>,
    #[serde(default, alias = "tocountry", deserialize_with = "lenient_string")]
    arrival_country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    eta: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    etb: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    etd: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    atd: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    report_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    dwh_load_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    distance_to_go: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    comments: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    checklist_received: Option<bool>,
    #[serde(default, deserialize_with = "lenient_string")]
    psc_last_inspection_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    psc_last_inspection_port: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    amsa_last_inspection_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    amsa_last_inspection_port: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    open_defects: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    alerts_red: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    alerts_yellow: Option<u32>,
}

impl From<VesselDto> for VesselRecord {
    fn from(dto: VesselDto) -> Self {
        Self {
            id: dto.id,
            imo_no: dto.imo_no.map(|imo| imo.trim().to_string()).unwrap_or_default(),
            vessel_name: dto.vessel_name,
            owner: dto.owner,
            event_type: dto.event_type,
            status: dto.status,
            office_doc: dto.office_doc,
            departure_port: dto.departure_port,
            departure_country: dto.departure_country,
            departure_date: dto.departure_date,
            arrival_port: dto.arrival_port,
            arrival_country: dto.arrival_country,
            eta: dto.eta,
            etb: dto.etb,
            etd: dto.etd,
            atd: dto.atd,
            report_date: dto.report_date,
            dwh_load_date: dto.dwh_load_date,
            distance_to_go: dto.distance_to_go,
            comments: dto.comments,
            checklist_received: dto.checklist_received.unwrap_or(false),
            psc_last_inspection_date: dto.psc_last_inspection_date,
            psc_last_inspection_port: dto.psc_last_inspection_port,
            amsa_last_inspection_date: dto.amsa_last_inspection_date,
            amsa_last_inspection_port: dto.amsa_last_inspection_port,
            open_defects: dto.open_defects,
            alerts_red: dto.alerts_red,
            alerts_yellow: dto.alerts_yellow,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DefectDto {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, alias = "vesselName", deserialize_with = "lenient_string")]
    vessel_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    equipment: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    criticality: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    status: Option<String>,
    #[serde(
        default,
        alias = "reportedDate",
        alias = "date_reported",
        deserialize_with = "lenient_string"
    )]
    reported_date: Option<String>,
    #[serde(default, alias = "actionPlanned", deserialize_with = "lenient_string")]
    action_planned: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    comments: Option<String>,
}

impl DefectDto {
    /// Rows without an id get a positional one so table keys stay unique.
    fn into_record(self, index: usize) -> DefectRecord {
        DefectRecord {
            id: self.id.unwrap_or_else(|| format!("defect-{index}")),
            vessel_name: self.vessel_name,
            equipment: self.equipment,
            description: self.description,
            criticality: self.criticality,
            status: self.status,
            reported_date: self.reported_date,
            action_planned: self.action_planned,
            comments: self.comments,
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(value)) => Some(value).filter(|v| !v.trim().is_empty()),
        Some(Value::Number(value)) => Some(value.to_string()),
        Some(Value::Bool(value)) => Some(value.to_string()),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(value)) => value.as_f64(),
        Some(Value::String(value)) => value.trim().parse().ok(),
        _ => None,
    }
    .filter(|v: &f64| v.is_finite()))
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?
        .filter(|v| *v >= 0.0)
        .map(|v| v.min(u32::MAX as f64) as u32))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(value)) => Some(value),
        Some(Value::Number(value)) => value.as_i64().map(|v| v != 0),
        Some(Value::String(value)) => match value.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "1" => Some(true),
            "false" | "f" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
        task::JoinHandle,
    };

    /// Serves exactly one HTTP response and hands back the raw request.
    async fn respond_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            request
        });
        (base, handle)
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn client(base: &str) -> FleetClient {
        FleetClient::new(base, base, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn vessels_accept_numbers_and_strings() {
        let (base, server) = respond_once(
            "200 OK",
            r#"[{"imo_no":9877872,"vessel_name":"Ocean Pearl","distance_to_go":"412.5",
                "alerts_red":"2","checklist_received":"true","unknown":{"x":1}},
               {"imo_no":"9400001","eta":null,"open_defects":3}]"#,
        ).await;
        let vessels = client(&base).get_vessels().await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /api/vessels "));
        assert_eq!(vessels.len(), 2);
        assert_eq!(vessels[0].imo_no, "9877872");
        assert_eq!(vessels[0].distance_to_go, Some(412.5));
        assert_eq!(vessels[0].alerts_red, Some(2));
        assert!(vessels[0].checklist_received);
        assert_eq!(vessels[1].eta, None);
        assert_eq!(vessels[1].open_defects, Some(3));
    }

    #[tokio::test]
    async fn rows_without_imo_do_not_fail_the_fetch() {
        let (base, server) = respond_once(
            "200 OK",
            r#"[{"imo_no":"9877872","dwh_load_date":"2025-01-10"},
               {"imo_no":null,"vessel_name":"Ghost"},
               {"vessel_name":"No Key"}]"#,
        ).await;
        let vessels = client(&base).get_vessels().await.unwrap();
        server.await.unwrap();

        assert_eq!(vessels.len(), 3);
        assert_eq!(vessels[1].imo_no, "");
        assert_eq!(vessels[2].imo_no, "");
        let kept = crate::domain::dedupe_latest(&vessels);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].imo_no, "9877872");
    }

    #[tokio::test]
    async fn base_path_is_preserved() {
        let (base, server) = respond_once("200 OK", "[]").await;
        let vessels = client(&format!("{base}/fleet")).get_vessels().await.unwrap();
        assert!(vessels.is_empty());
        assert!(server.await.unwrap().starts_with("GET /fleet/api/vessels "));
    }

    #[tokio::test]
    async fn checklist_update_sends_body_and_reads_flag() {
        let (base, server) = respond_once("200 OK", r#"{"checklist_received":true}"#).await;
        let stored = client(&base)
            .update_checklist(Some("42"), "9877872", true)
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert!(stored);
        assert!(request.starts_with("PUT /checklist "));
        let body = request.split("\r\n\r\n").nth(1).unwrap();
        let json: Value = serde_json::from_str(body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "42", "imo_no": "9877872", "checklist_received": true})
        );
    }

    #[tokio::test]
    async fn checklist_server_error_is_reported() {
        let (base, server) = respond_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;
        let err = client(&base)
            .update_checklist(None, "9877872", true)
            .await
            .unwrap_err();
        server.await.unwrap();
        match err {
            FleetApiError::Status { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_comments_response_is_success() {
        let (base, server) = respond_once("200 OK", "").await;
        let updated = client(&base)
            .update_comments("9877872", "Pilot at 0600")
            .await
            .unwrap();
        let request = server.await.unwrap();
        assert!(updated.is_none());
        assert!(request.starts_with("PUT /api/vessels/comments "));
        assert!(request.contains(r#""comments":"Pilot at 0600""#));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let (base, server) = respond_once("200 OK", r#"{"not":"an array"}"#).await;
        let err = client(&base).get_defects().await.unwrap_err();
        server.await.unwrap();
        assert!(matches!(err, FleetApiError::Decode(_)));
    }

    #[tokio::test]
    async fn defects_accept_camel_case_and_fill_ids() {
        let (base, server) = respond_once(
            "200 OK",
            r#"[{"vesselName":"Coral Star","status":"open","actionPlanned":"Replace"},
               {"id":7,"equipment":"Main Engine"}]"#,
        ).await;
        let defects = client(&base).get_defects().await.unwrap();
        server.await.unwrap();
        assert_eq!(defects[0].id, "defect-0");
        assert_eq!(defects[0].vessel_name.as_deref(), Some("Coral Star"));
        assert_eq!(defects[0].action_planned.as_deref(), Some("Replace"));
        assert_eq!(defects[1].id, "7");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = FleetClient::new("not a url", "http://localhost", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, FleetApiError::InvalidUrl(_)));
    }
}
