//! HTTP client for the supervisor's JSON API.
//!
//! Every JSON response is wrapped in `{ "data": ..., "error": "..." }`.
//! Logical failures arrive with HTTP 200 and a non-empty `error`, which is
//! surfaced as [`Error::Backend`] with the message untouched. Everything
//! else that goes wrong (connect, timeout, non-2xx, unparseable body) is an
//! [`Error::Transport`].

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::debug;

use procdeck_core::prelude::*;
use procdeck_core::types::ApiEnvelope;
use procdeck_core::{DashboardInfo, ExecId, LogFile, ServiceSnapshot};

use crate::backend::Backend;
use crate::endpoint::Endpoint;

/// Multipart part name the upload handler reads.
pub const UPLOAD_PART_NAME: &str = "file";

/// File name sent with every upload. The backend stores the part under this
/// name before swapping it into place.
pub const UPLOAD_FILE_NAME: &str = "binary";

/// [`Backend`] implementation over HTTP
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoint: Endpoint,
}

impl ApiClient {
    /// Build a client with a per-request timeout.
    pub fn new(endpoint: Endpoint, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn service_url(&self, exec_id: &ExecId, tail: &[&str]) -> String {
        let mut segments = vec!["api", "service", exec_id.as_str()];
        segments.extend_from_slice(tail);
        self.endpoint.http_url(&segments)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await.map_err(transport)?;
        response.error_for_status().map_err(transport)
    }

    async fn read_envelope<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<T>> {
        let response = self.send(request).await?;
        let envelope: ApiEnvelope<T> = response.json().await.map_err(transport)?;
        envelope.into_result()
    }

    /// POST a command endpoint whose payload, if any, is ignored.
    async fn command(&self, exec_id: &ExecId, verb: &str) -> Result<()> {
        let url = self.service_url(exec_id, &[verb]);
        debug!("POST {}", url);
        self.read_envelope::<serde_json::Value>(self.http.post(&url))
            .await
            .map(|_| ())
    }
}

fn transport(err: reqwest::Error) -> Error {
    Error::transport(err.to_string())
}

impl Backend for ApiClient {
    async fn list_services(&self) -> Result<Vec<ServiceSnapshot>> {
        let url = self.endpoint.http_url(&["api", "service"]);
        let services = self
            .read_envelope::<Vec<ServiceSnapshot>>(self.http.get(&url))
            .await?;
        Ok(services.unwrap_or_default())
    }

    async fn dashboard_info(&self) -> Result<DashboardInfo> {
        let url = self.endpoint.http_url(&["api", "config"]);
        let info = self.read_envelope::<DashboardInfo>(self.http.get(&url)).await?;
        Ok(info.unwrap_or_default())
    }

    async fn start(&self, exec_id: &ExecId) -> Result<()> {
        self.command(exec_id, "start").await
    }

    async fn stop(&self, exec_id: &ExecId) -> Result<()> {
        self.command(exec_id, "stop").await
    }

    async fn restart(&self, exec_id: &ExecId) -> Result<()> {
        self.command(exec_id, "restart").await
    }

    async fn upload(&self, exec_id: &ExecId, binary: Vec<u8>) -> Result<()> {
        let url = self.service_url(exec_id, &["upload"]);
        debug!("POST {} ({} bytes)", url, binary.len());
        let part = Part::bytes(binary).file_name(UPLOAD_FILE_NAME);
        let form = Form::new().part(UPLOAD_PART_NAME, part);
        self.read_envelope::<serde_json::Value>(self.http.post(&url).multipart(form))
            .await
            .map(|_| ())
    }

    async fn list_log_files(&self, exec_id: &ExecId) -> Result<Vec<LogFile>> {
        let url = self.service_url(exec_id, &["log"]);
        let files = self.read_envelope::<Vec<LogFile>>(self.http.get(&url)).await?;
        Ok(files.unwrap_or_default())
    }

    async fn download_log_file(&self, exec_id: &ExecId, name: &str) -> Result<Vec<u8>> {
        let url = self.service_url(exec_id, &["log", name]);
        let response = self.send(self.http.get(&url)).await?;
        let bytes = response.bytes().await.map_err(transport)?;
        Ok(bytes.to_vec())
    }

    async fn fetch_config_file(&self, exec_id: &ExecId) -> Result<String> {
        let url = self.service_url(exec_id, &["config-file"]);
        let response = self.send(self.http.get(&url)).await?;
        response.text().await.map_err(transport)
    }

    async fn save_config_file(&self, exec_id: &ExecId, content: String) -> Result<()> {
        let url = self.service_url(exec_id, &["config-file"]);
        debug!("POST {} ({} bytes)", url, content.len());
        let request = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(content);
        self.read_envelope::<serde_json::Value>(request)
            .await
            .map(|_| ())
    }

    fn log_file_url(&self, exec_id: &ExecId, name: &str) -> String {
        self.service_url(exec_id, &["log", name])
    }

    fn output_url(&self, exec_id: &ExecId) -> String {
        self.endpoint
            .ws_url(&["api", "service", exec_id.as_str(), "output"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Mode;
    use crate::test_utils::{MockHttpServer, MockResponse};

    fn client_for(server: &MockHttpServer) -> ApiClient {
        let endpoint = Endpoint::resolve(Mode::Prod, "http", &server.address()).unwrap();
        ApiClient::new(endpoint, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_list_services_parses_envelope() {
        let server = MockHttpServer::start(|_| {
            MockResponse::json(
                r#"{"data":[{"exec":"svc1","name":"one","running":true,"tag":"web"}],"error":""}"#,
            )
        })
        .await;
        let client = client_for(&server);

        let services = client.list_services().await.unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].exec_id.as_str(), "svc1");

        let requests = server.requests();
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path, "/api/service");
    }

    #[tokio::test]
    async fn test_null_service_list_is_empty() {
        let server = MockHttpServer::start(|_| MockResponse::json(r#"{"data":null}"#)).await;
        let client = client_for(&server);
        assert!(client.list_services().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_posts_to_command_endpoint() {
        let server = MockHttpServer::start(|_| MockResponse::json(r#"{"data":null,"error":""}"#)).await;
        let client = client_for(&server);

        client.start(&ExecId::from("svc1")).await.unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/api/service/svc1/start");
    }

    #[tokio::test]
    async fn test_backend_error_is_surfaced_verbatim() {
        let server = MockHttpServer::start(|_| {
            MockResponse::json(r#"{"data":null,"error":"service not found"}"#)
        })
        .await;
        let client = client_for(&server);

        let err = client.stop(&ExecId::from("ghost")).await.unwrap_err();
        assert!(matches!(err, Error::Backend { .. }));
        assert_eq!(err.user_message(), "service not found");
    }

    #[tokio::test]
    async fn test_http_status_error_is_transport() {
        let server = MockHttpServer::start(|_| MockResponse::status(500, "boom")).await;
        let client = client_for(&server);

        let err = client.restart(&ExecId::from("svc1")).await.unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
    }

    #[tokio::test]
    async fn test_non_json_body_is_transport() {
        let server = MockHttpServer::start(|_| MockResponse::text("<html>")).await;
        let client = client_for(&server);

        let err = client.start(&ExecId::from("svc1")).await.unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_binary_part() {
        let server = MockHttpServer::start(|_| MockResponse::json(r#"{"error":""}"#)).await;
        let client = client_for(&server);

        client
            .upload(&ExecId::from("svc1"), b"ELF-PAYLOAD".to_vec())
            .await
            .unwrap();

        let requests = server.requests();
        let req = &requests[0];
        assert_eq!(req.path, "/api/service/svc1/upload");
        assert!(req
            .header("content-type")
            .unwrap_or_default()
            .starts_with("multipart/form-data"));
        let body = String::from_utf8_lossy(&req.body);
        assert!(body.contains(r#"name="file""#));
        assert!(body.contains(r#"filename="binary""#));
        assert!(body.contains("ELF-PAYLOAD"));
    }

    #[tokio::test]
    async fn test_config_file_round_trip_uses_raw_text() {
        let server = MockHttpServer::start(|req| {
            if req.method == "GET" {
                MockResponse::text("port: 80\n")
            } else {
                MockResponse::json("{}")
            }
        })
        .await;
        let client = client_for(&server);
        let id = ExecId::from("svc1");

        let text = client.fetch_config_file(&id).await.unwrap();
        assert_eq!(text, "port: 80\n");

        client
            .save_config_file(&id, "port: 81\n".to_string())
            .await
            .unwrap();

        let requests = server.requests();
        assert_eq!(requests[1].method, "POST");
        assert_eq!(requests[1].path, "/api/service/svc1/config-file");
        assert_eq!(requests[1].body, b"port: 81\n");
    }

    #[tokio::test]
    async fn test_log_files_and_download() {
        let server = MockHttpServer::start(|req| {
            if req.path.ends_with("/log") {
                MockResponse::json(r#"{"data":[{"name":"out 1.log","size":42}]}"#)
            } else {
                MockResponse::text("line one\nline two\n")
            }
        })
        .await;
        let client = client_for(&server);
        let id = ExecId::from("svc1");

        let files = client.list_log_files(&id).await.unwrap();
        assert_eq!(files[0].name, "out 1.log");
        assert_eq!(files[0].size_bytes, 42);

        let bytes = client.download_log_file(&id, &files[0].name).await.unwrap();
        assert_eq!(bytes, b"line one\nline two\n");
        assert_eq!(server.requests()[1].path, "/api/service/svc1/log/out%201.log");
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport() {
        let endpoint = Endpoint::resolve(Mode::Prod, "http", "127.0.0.1:1").unwrap();
        let client = ApiClient::new(endpoint, Duration::from_secs(2)).unwrap();
        let err = client.list_services().await.unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_output_url_is_websocket() {
        let endpoint = Endpoint::resolve(Mode::Prod, "http", "10.0.0.1:7798").unwrap();
        let client = ApiClient::new(endpoint, Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.output_url(&ExecId::from("svc1")),
            "ws://10.0.0.1:7798/api/service/svc1/output"
        );
    }
}
