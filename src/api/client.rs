use std::future::Future;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};

use super::error::ApiError;
use super::types::TaskResponse;
use crate::document::DocumentUpload;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Multipart field the server reads the PDF from.
const UPLOAD_FIELD: &str = "pdf_file";

/// Transport seam between the poller and the notes service.
pub trait JobApi: Send + Sync {
    /// Create a notes-generation job for `doc`.
    fn submit_document(
        &self,
        doc: &DocumentUpload,
    ) -> impl Future<Output = Result<TaskResponse, ApiError>> + Send;

    /// Fetch the current status of `task_id`.
    fn fetch_status(
        &self,
        task_id: &str,
    ) -> impl Future<Output = Result<TaskResponse, ApiError>> + Send;
}

pub struct NotesClient {
    client: Client,
    base_url: Url,
}

impl NotesClient {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(request_timeout)
            .build()?;
        let base_url = base_url.into();
        let base_url = Url::parse(&base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    /// Append `segments` to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl JobApi for NotesClient {
    async fn submit_document(&self, doc: &DocumentUpload) -> Result<TaskResponse, ApiError> {
        let part = Part::bytes(doc.bytes.clone())
            .file_name(doc.file_name.clone())
            .mime_str("application/pdf")?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(self.endpoint(&["generate-notes-from-pdf"])?)
            .multipart(form)
            .send()
            .await?;

        decode(response).await
    }

    async fn fetch_status(&self, task_id: &str) -> Result<TaskResponse, ApiError> {
        let response = self
            .client
            .get(self.endpoint(&["tasks", task_id])?)
            .send()
            .await?;

        decode(response).await
    }
}

async fn decode(response: Response) -> Result<TaskResponse, ApiError> {
    let status = response.status();

    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TaskStatus;
    use wiremock::matchers::{header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> NotesClient {
        NotesClient::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn pdf() -> DocumentUpload {
        DocumentUpload::from_bytes("lecture.pdf".into(), b"%PDF-1.4 test".to_vec()).unwrap()
    }

    #[tokio::test]
    async fn submit_posts_multipart_and_decodes_task() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate-notes-from-pdf"))
            .and(header_regex("content-type", "^multipart/form-data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "abc-123",
                "status": "pending",
                "message": "Processing started"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = client_for(&server).submit_document(&pdf()).await.unwrap();
        assert_eq!(resp.task_id, "abc-123");
        assert_eq!(resp.status, TaskStatus::Pending);
        assert_eq!(resp.message, "Processing started");

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains(r#"name="pdf_file""#));
        assert!(body.contains(r#"filename="lecture.pdf""#));
    }

    #[tokio::test]
    async fn submit_maps_http_error_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate-notes-from-pdf"))
            .respond_with(ResponseTemplate::new(500).set_body_string("worker crashed"))
            .mount(&server)
            .await;

        let err = client_for(&server).submit_document(&pdf()).await.unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "worker crashed");
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_status_reads_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks/abc-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "abc-123",
                "status": "completed",
                "message": "done",
                "result": {"Topic": [{"Sub_topic": "Photosynthesis", "summary": "Light to sugar."}]}
            })))
            .mount(&server)
            .await;

        let resp = client_for(&server).fetch_status("abc-123").await.unwrap();
        assert_eq!(resp.status, TaskStatus::Completed);
        let entries = resp.result.unwrap().into_entries();
        assert_eq!(entries[0].sub_topic, "Photosynthesis");
    }

    #[tokio::test]
    async fn fetch_status_rejects_garbage_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks/abc-123"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_status("abc-123").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        // Nothing listens on port 9 on a test host.
        let client = NotesClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.fetch_status("abc").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let client = NotesClient::new("http://localhost:8000/api/", Duration::from_secs(1)).unwrap();
        let url = client.endpoint(&["tasks", "abc"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/tasks/abc");
    }

    #[test]
    fn task_id_is_escaped_as_one_segment() {
        let client = NotesClient::new("http://localhost:8000", Duration::from_secs(1)).unwrap();
        let url = client.endpoint(&["tasks", "a/b?c#d"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/tasks/a%2Fb%3Fc%23d");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[tokio::test]
    async fn fetch_status_sends_escaped_task_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks/odd%2Fid%3Fx"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "odd/id?x",
                "status": "pending",
                "message": ""
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = client_for(&server).fetch_status("odd/id?x").await.unwrap();
        assert_eq!(resp.task_id, "odd/id?x");
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let err = NotesClient::new("not a url", Duration::from_secs(1)).err().unwrap();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }
}
