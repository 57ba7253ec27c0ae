use super::{RequestHandle, ResumeService};
use crate::error::EnhanceError;
use crate::model::{ClientConfig, ExtractPdfResponse, EXTRACT_PDF_PATH};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart;
use std::path::Path;

/// Error bodies longer than this are cut before being shown to the user.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// HTTP client for the enhancement service.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    pub fn new(cfg: &ClientConfig) -> Result<Self> {
        reqwest::Url::parse(&cfg.base_url)
            .with_context(|| format!("invalid base URL: {}", cfg.base_url))?;
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.timeout)
            .build()
            .context("build http client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Upload a PDF to the extraction endpoint and return its text.
    pub async fn extract_pdf(&self, path: &Path) -> Result<String, EnhanceError> {
        if !is_pdf(path) {
            return Err(EnhanceError::NotPdf(path.display().to_string()));
        }
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume.pdf")
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        tracing::debug!(file = %file_name, bytes = bytes.len(), "uploading pdf");

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part("pdf", part);

        let resp = self
            .http
            .post(self.endpoint(EXTRACT_PDF_PATH))
            .multipart(form)
            .send()
            .await?;
        let value = read_json(resp).await?;
        let parsed: ExtractPdfResponse = serde_json::from_value(value)?;
        Ok(parsed.text)
    }
}

#[async_trait]
impl ResumeService for ServiceClient {
    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
        handle: &RequestHandle,
    ) -> Result<serde_json::Value, EnhanceError> {
        if handle.is_cancelled() {
            return Err(EnhanceError::Cancelled);
        }

        let send = async {
            let resp = self.http.post(self.endpoint(path)).json(&body).send().await?;
            read_json(resp).await
        };

        let res = tokio::select! {
            biased;
            _ = handle.cancelled() => return Err(EnhanceError::Cancelled),
            r = send => r,
        };

        // A response that raced a cancel is still stale.
        if handle.is_cancelled() {
            return Err(EnhanceError::Cancelled);
        }
        res
    }
}

async fn read_json(resp: reqwest::Response) -> Result<serde_json::Value, EnhanceError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(EnhanceError::Status {
            status,
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub(crate) fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EnhancementRequest, ENHANCE_PATH};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client_for(base_url: String) -> ServiceClient {
        client_with_timeout(base_url, Duration::from_secs(5))
    }

    fn client_with_timeout(base_url: String, timeout: Duration) -> ServiceClient {
        ServiceClient::new(&ClientConfig {
            base_url,
            timeout,
            user_agent: "resume-refiner-test".into(),
        })
        .unwrap()
    }

    /// Read one full HTTP request (headers plus content-length body).
    async fn read_request(sock: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = sock.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let content_len = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_len {
                    return text;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Serve a single canned response; the received request is sent back on the channel.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
        delay: Duration,
    ) -> (String, tokio::sync::oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let req = read_request(&mut sock).await;
            let _ = tx.send(req);
            tokio::time::sleep(delay).await;
            let resp = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = sock.write_all(resp.as_bytes()).await;
            let _ = sock.shutdown().await;
        });
        (format!("http://{addr}"), rx)
    }

    #[tokio::test]
    async fn enhance_sends_body_and_decodes_result() {
        let (url, req_rx) = serve_once(
            "200 OK",
            r#"{"improved_text":"Better","suggestions":["Use metrics","Stronger verbs"]}"#,
            Duration::ZERO,
        )
        .await;
        let client = client_for(url);
        let request = EnhancementRequest::from_input("valid resume", Some("")).unwrap();
        let result = client
            .enhance(&request, &RequestHandle::new(1))
            .await
            .unwrap();
        assert_eq!(result.improved_text, "Better");
        assert_eq!(result.suggestions, vec!["Use metrics", "Stronger verbs"]);

        let raw = req_rx.await.unwrap();
        assert!(raw.starts_with(&format!("POST {ENHANCE_PATH} ")));
        assert!(raw.contains(r#""resume_text":"valid resume""#));
        assert!(!raw.contains("target_role"));
    }

    #[tokio::test]
    async fn non_success_status_maps_to_status_error() {
        let (url, _rx) = serve_once(
            "500 Internal Server Error",
            r#"{"error":"Internal server error"}"#,
            Duration::ZERO,
        )
        .await;
        let client = client_for(url);
        let err = client
            .post_json(ENHANCE_PATH, serde_json::json!({}), &RequestHandle::new(1))
            .await
            .unwrap_err();
        match err {
            EnhanceError::Status { status, body } => {
                assert_eq!(status.as_u16(), 500);
                assert!(body.contains("Internal server error"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_fields_are_a_decode_error() {
        let (url, _rx) = serve_once("200 OK", r#"{"improved_text":"x"}"#, Duration::ZERO).await;
        let client = client_for(url);
        let request = EnhancementRequest::from_input("resume", None).unwrap();
        let err = client
            .enhance(&request, &RequestHandle::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, EnhanceError::Decode(_)), "{err:?}");
    }

    #[tokio::test]
    async fn cancel_mid_request_returns_cancelled() {
        let (url, _rx) = serve_once(
            "200 OK",
            r#"{"improved_text":"late","suggestions":[]}"#,
            Duration::from_secs(3),
        )
        .await;
        let client = client_for(url);
        let handle = RequestHandle::new(1);
        let canceller = {
            let h = handle.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                h.cancel();
            })
        };
        let err = client
            .post_json(ENHANCE_PATH, serde_json::json!({}), &handle)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        canceller.await.unwrap();
    }

    #[tokio::test]
    async fn already_cancelled_handle_skips_the_call() {
        // Nothing listens here; a real call would fail with a transport error.
        let client = client_for("http://127.0.0.1:9".into());
        let handle = RequestHandle::new(1);
        handle.cancel();
        let err = client
            .post_json(ENHANCE_PATH, serde_json::json!({}), &handle)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn slow_service_is_a_timeout_error() {
        let (url, _rx) = serve_once(
            "200 OK",
            r#"{"improved_text":"late","suggestions":[]}"#,
            Duration::from_secs(5),
        )
        .await;
        let client = client_with_timeout(url, Duration::from_millis(200));
        let err = client
            .post_json(ENHANCE_PATH, serde_json::json!({}), &RequestHandle::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, EnhanceError::Timeout), "{err:?}");
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Free the port so the connection is refused.
        drop(listener);

        let client = client_for(format!("http://{addr}"));
        let err = client
            .post_json(ENHANCE_PATH, serde_json::json!({}), &RequestHandle::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, EnhanceError::Transport(_)), "{err:?}");
        assert!(!err.is_cancelled());
    }

    #[tokio::test]
    async fn extract_pdf_uploads_multipart_field() {
        let (url, req_rx) = serve_once("200 OK", r#"{"text":"Jane Doe\nEngineer"}"#, Duration::ZERO).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.PDF");
        std::fs::write(&path, b"%PDF-1.4 fake").unwrap();

        let text = client_for(url).extract_pdf(&path).await.unwrap();
        assert_eq!(text, "Jane Doe\nEngineer");

        let raw = req_rx.await.unwrap();
        assert!(raw.starts_with(&format!("POST {EXTRACT_PDF_PATH} ")));
        assert!(raw.contains(r#"name="pdf""#));
        assert!(raw.contains("application/pdf"));
    }

    #[tokio::test]
    async fn extract_pdf_rejects_other_extensions_without_a_call() {
        let client = client_for("http://127.0.0.1:9".into());
        let err = client
            .extract_pdf(Path::new("resume.docx"))
            .await
            .unwrap_err();
        assert!(matches!(err, EnhanceError::NotPdf(_)));
    }

    #[test]
    fn rejects_invalid_base_url() {
        let err = ServiceClient::new(&ClientConfig {
            base_url: "not a url".into(),
            timeout: Duration::from_secs(1),
            user_agent: "x".into(),
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("invalid base URL"));
    }
}
