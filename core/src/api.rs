//! Remote API contract and response normalization.
//!
//! The host supplies a [`Backend`] that performs the raw HTTP exchange and
//! hands back status and body. Everything after that (JSON parsing,
//! `success` flags, error messages) is normalized here so that upload,
//! query and document listing all fail the same way.
//!
//! # Endpoints
//!
//! | Method | Path              | Body                                 |
//! |--------|-------------------|--------------------------------------|
//! | POST   | `/api/upload/`    | multipart, one `file` field          |
//! | POST   | `/api/query/`     | `{ query, document_names }`          |
//! | GET    | `/api/documents/` | -                                    |

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult, TransportError};
use crate::progress::TransferProgress;
use crate::staging::StagedFile;

// =============================================================================
// Wire Types
// =============================================================================

/// Response of `POST /api/upload/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /api/query/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryRequest {
    pub query: String,
    /// Empty means "all documents".
    #[serde(default)]
    pub document_names: Vec<String>,
}

/// Response of `POST /api/query/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `GET /api/documents/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentsResponse {
    #[serde(default)]
    pub documents: Vec<String>,
}

/// Error body the server sends with non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Raw HTTP response handed back by a [`Backend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// =============================================================================
// Host Traits
// =============================================================================

/// HTTP transport provided by the host environment.
///
/// Implementations only move bytes: they return `Err` when no response
/// was received at all, and otherwise hand back status and body untouched.
#[allow(async_fn_in_trait)]
pub trait Backend {
    /// Host handle of a file to upload.
    type File;

    /// Sends one file as multipart form data.
    ///
    /// `on_progress` should be called whenever the host learns how many
    /// bytes have been sent. Hosts without transfer events never call it.
    async fn upload(
        &self,
        file: &StagedFile<Self::File>,
        on_progress: &dyn Fn(TransferProgress),
    ) -> Result<HttpReply, TransportError>;

    async fn query(&self, request: &QueryRequest) -> Result<HttpReply, TransportError>;

    async fn documents(&self) -> Result<HttpReply, TransportError>;
}

/// Animation clock provided by the host.
#[allow(async_fn_in_trait)]
pub trait Ticker {
    /// Resolves after one animation interval.
    async fn tick(&self);
}

// =============================================================================
// Normalization
// =============================================================================

fn server_message(reply: &HttpReply, fallback: impl FnOnce() -> String) -> String {
    serde_json::from_str::<ErrorBody>(&reply.body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(fallback)
}

fn reject_non_success(reply: &HttpReply, fallback: impl FnOnce() -> String) -> ApiResult<()> {
    if reply.is_success() {
        Ok(())
    } else {
        Err(ApiError::Server {
            status: reply.status,
            message: server_message(reply, fallback),
        })
    }
}

/// Outcome of one file upload; `Ok` carries the server's message.
pub fn interpret_upload(
    reply: Result<HttpReply, TransportError>,
    file_name: &str,
) -> ApiResult<Option<String>> {
    let reply = reply?;
    reject_non_success(&reply, || format!("Failed to upload {}", file_name))?;

    let body: UploadResponse = serde_json::from_str(&reply.body)?;
    if body.success {
        Ok(body.message)
    } else {
        Err(ApiError::Server {
            status: reply.status,
            message: body
                .message
                .unwrap_or_else(|| format!("Unknown error for {}", file_name)),
        })
    }
}

/// Assistant answer of a query.
pub fn interpret_query(reply: Result<HttpReply, TransportError>) -> ApiResult<String> {
    let reply = reply?;
    reject_non_success(&reply, || "Failed to get response from server".to_string())?;

    let body: QueryResponse = serde_json::from_str(&reply.body)?;
    if !body.success {
        return Err(ApiError::Server {
            status: reply.status,
            message: body.message.unwrap_or_else(|| "Query failed".to_string()),
        });
    }
    body.response
        .ok_or_else(|| ApiError::MalformedResponse("missing `response` field".to_string()))
}

/// Names of the documents known to the server.
pub fn interpret_documents(reply: Result<HttpReply, TransportError>) -> ApiResult<Vec<String>> {
    let reply = reply?;
    reject_non_success(&reply, || "Failed to fetch documents".to_string())?;

    let body: DocumentsResponse = serde_json::from_str(&reply.body)?;
    Ok(body.documents)
}

// =============================================================================
// Calls
// =============================================================================

/// Lists the uploaded documents.
pub async fn fetch_documents<B: Backend>(backend: &B) -> ApiResult<Vec<String>> {
    let documents = interpret_documents(backend.documents().await)?;
    log::debug!("server lists {} document(s)", documents.len());
    Ok(documents)
}

/// Asks a question, optionally restricted to some documents.
pub async fn submit_query<B: Backend>(
    backend: &B,
    query: &str,
    document_names: &[String],
) -> ApiResult<String> {
    let request = QueryRequest {
        query: query.trim().to_string(),
        document_names: document_names.to_vec(),
    };
    log::info!(
        "querying {} document(s)",
        if request.document_names.is_empty() {
            "all".to_string()
        } else {
            request.document_names.len().to_string()
        }
    );
    interpret_query(backend.query(&request).await)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn test_upload_success_with_message() {
        let reply = Ok(HttpReply::new(
            200,
            r#"{"success": true, "message": "File processed successfully."}"#,
        ));
        let result = interpret_upload(reply, "a.pdf");
        assert_eq!(result, Ok(Some("File processed successfully.".to_string())));
    }

    #[test]
    fn test_upload_network_failure() {
        let result = interpret_upload(Err(TransportError::new("offline")), "a.pdf");
        assert_eq!(result, Err(ApiError::Network("offline".into())));
    }

    #[test]
    fn test_upload_server_error_uses_body_message() {
        let reply = Ok(HttpReply::new(
            400,
            r#"{"success": false, "message": "Please upload a valid PDF file."}"#,
        ));
        match interpret_upload(reply, "a.pdf") {
            Err(ApiError::Server { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Please upload a valid PDF file.");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_upload_server_error_without_json() {
        let reply = Ok(HttpReply::new(502, "<html>Bad Gateway</html>"));
        match interpret_upload(reply, "a.pdf") {
            Err(ApiError::Server { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "Failed to upload a.pdf");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_upload_malformed_body() {
        let reply = Ok(HttpReply::new(200, "not json"));
        assert!(matches!(
            interpret_upload(reply, "a.pdf"),
            Err(ApiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_upload_success_false() {
        let reply = Ok(HttpReply::new(200, r#"{"success": false}"#));
        match interpret_upload(reply, "a.pdf") {
            Err(ApiError::Server { status, message }) => {
                assert_eq!(status, 200);
                assert_eq!(message, "Unknown error for a.pdf");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_query_response() {
        let reply = Ok(HttpReply::new(200, r#"{"success": true, "query": "q", "response": "42"}"#));
        assert_eq!(interpret_query(reply), Ok("42".to_string()));

        let reply = Ok(HttpReply::new(
            400,
            r#"{"success": false, "message": "Query cannot be empty."}"#,
        ));
        assert_eq!(
            interpret_query(reply).unwrap_err().reason(),
            "Query cannot be empty."
        );
    }

    #[test]
    fn test_documents_missing_field_is_empty() {
        assert_eq!(interpret_documents(Ok(HttpReply::new(200, "{}"))), Ok(vec![]));
        assert_eq!(
            interpret_documents(Ok(HttpReply::new(200, r#"{"documents": ["a.pdf", "b.txt"]}"#))),
            Ok(vec!["a.pdf".to_string(), "b.txt".to_string()])
        );
    }

    #[test]
    fn test_query_request_serialization() {
        let request = QueryRequest {
            query: "What is RAG?".into(),
            document_names: vec!["a.pdf".into()],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["query"], "What is RAG?");
        assert_eq!(json["document_names"][0], "a.pdf");
    }

    /// Replays one canned reply and keeps the last query it was sent.
    struct RecordingBackend {
        reply: Result<HttpReply, TransportError>,
        sent: RefCell<Option<QueryRequest>>,
    }

    impl RecordingBackend {
        fn replying(reply: Result<HttpReply, TransportError>) -> Self {
            Self {
                reply,
                sent: RefCell::new(None),
            }
        }

        fn sent(&self) -> QueryRequest {
            self.sent.borrow().clone().expect("no query was sent")
        }
    }

    impl Backend for RecordingBackend {
        type File = ();

        async fn upload(
            &self,
            _file: &StagedFile<()>,
            _on_progress: &dyn Fn(TransferProgress),
        ) -> Result<HttpReply, TransportError> {
            Err(TransportError::new("uploads are not scripted"))
        }

        async fn query(&self, request: &QueryRequest) -> Result<HttpReply, TransportError> {
            *self.sent.borrow_mut() = Some(request.clone());
            self.reply.clone()
        }

        async fn documents(&self) -> Result<HttpReply, TransportError> {
            self.reply.clone()
        }
    }

    fn answer(text: &str) -> Result<HttpReply, TransportError> {
        let body = serde_json::json!({ "success": true, "response": text });
        Ok(HttpReply::new(200, body.to_string()))
    }

    #[tokio::test]
    async fn test_submit_query_trims_and_targets_all_documents() {
        let backend = RecordingBackend::replying(answer("Retrieval augmented generation."));
        let result = submit_query(&backend, "  What is RAG?\n ", &[]).await;

        assert_eq!(result, Ok("Retrieval augmented generation.".to_string()));
        assert_eq!(
            backend.sent(),
            QueryRequest {
                query: "What is RAG?".into(),
                document_names: vec![],
            }
        );
    }

    #[tokio::test]
    async fn test_submit_query_passes_selected_documents() {
        let backend = RecordingBackend::replying(answer("42"));
        let names = vec!["a.pdf".to_string(), "notes.txt".to_string()];
        submit_query(&backend, "answer?", &names).await.unwrap();

        assert_eq!(backend.sent().query, "answer?");
        assert_eq!(backend.sent().document_names, names);
    }

    #[tokio::test]
    async fn test_submit_query_propagates_failures() {
        let backend = RecordingBackend::replying(Err(TransportError::new("offline")));
        assert_eq!(
            submit_query(&backend, "q", &[]).await,
            Err(ApiError::Network("offline".into()))
        );

        let backend = RecordingBackend::replying(Ok(HttpReply::new(
            500,
            r#"{"message": "Index unavailable"}"#,
        )));
        assert_eq!(
            submit_query(&backend, "q", &[]).await,
            Err(ApiError::Server {
                status: 500,
                message: "Index unavailable".into(),
            })
        );
    }

    #[tokio::test]
    async fn test_fetch_documents() {
        let backend = RecordingBackend::replying(Ok(HttpReply::new(
            200,
            r#"{"documents": ["a.pdf", "b.docx"]}"#,
        )));
        assert_eq!(
            fetch_documents(&backend).await,
            Ok(vec!["a.pdf".to_string(), "b.docx".to_string()])
        );

        let backend = RecordingBackend::replying(Err(TransportError::new("refused")));
        assert_eq!(
            fetch_documents(&backend).await,
            Err(ApiError::Network("refused".into()))
        );

        let backend = RecordingBackend::replying(Ok(HttpReply::new(503, "")));
        assert_eq!(
            fetch_documents(&backend).await,
            Err(ApiError::Server {
                status: 503,
                message: "Failed to fetch documents".into(),
            })
        );
    }
}
