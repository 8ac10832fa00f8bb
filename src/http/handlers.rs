//! Route handlers.
//!
//! Each handler turns a matched request into a [`Response`]. Handlers never
//! fail: collaborator errors are mapped to a status here.

use crate::compress;
use crate::http::request::Request;
use crate::http::response::{
    Response, Status, CONTENT_ENCODING, CONTENT_TYPE, OCTET_STREAM, TEXT_PLAIN,
};
use crate::routing::router::{Endpoint, ECHO_PREFIX, FILES_PREFIX};
use crate::storage::{FileStore, StorageError};

/// Header line prefix the user agent handler looks for, case included.
const USER_AGENT_LINE: &str = "User-Agent:";

/// Run the handler for `endpoint`.
pub async fn handle(endpoint: Endpoint, req: &Request, files: &FileStore) -> Response {
    match endpoint {
        Endpoint::Root => root(),
        Endpoint::Echo => echo(req),
        Endpoint::UserAgent => user_agent(req),
        Endpoint::FileRead => read_file(req, files).await,
        Endpoint::FileWrite => write_file(req, files).await,
        Endpoint::NotFound => Response::not_found(),
    }
}

pub fn root() -> Response {
    Response::new(Status::Ok)
}

/// Echo the path after `/echo/`, gzipped when the client accepts it.
pub fn echo(req: &Request) -> Response {
    let text = suffix(&req.target, ECHO_PREFIX);

    let wants_gzip = req
        .header("accept-encoding")
        .map(compress::accepts_gzip)
        .unwrap_or(false);

    if !wants_gzip {
        return Response::ok_with_body(TEXT_PLAIN, text.as_bytes().to_vec());
    }

    match compress::gzip(text.as_bytes()) {
        Ok(compressed) => Response::new(Status::Ok)
            .header(CONTENT_TYPE, TEXT_PLAIN)
            .header(CONTENT_ENCODING, compress::GZIP)
            .with_body(compressed),
        Err(e) => {
            tracing::error!(error = %e, "gzip compression failed");
            Response::internal_error()
        }
    }
}

/// Echo the `User-Agent` header. Only the exact-case header name counts.
pub fn user_agent(req: &Request) -> Response {
    let agent = req
        .header_lines
        .iter()
        .find_map(|line| line.strip_prefix(USER_AGENT_LINE))
        .map(str::trim)
        .unwrap_or_default();

    Response::ok_with_body(TEXT_PLAIN, agent.as_bytes().to_vec())
}

pub async fn read_file(req: &Request, files: &FileStore) -> Response {
    let path = files.resolve(suffix(&req.target, FILES_PREFIX));

    match files.read_all(&path).await {
        Ok(contents) => Response::ok_with_body(OCTET_STREAM, contents),
        Err(StorageError::NotFound(path)) => {
            tracing::debug!(path = %path.display(), "File not found");
            Response::not_found()
        }
        Err(e) => {
            tracing::warn!(error = %e, "File read failed");
            Response::internal_error()
        }
    }
}

pub async fn write_file(req: &Request, files: &FileStore) -> Response {
    let path = files.resolve(suffix(&req.target, FILES_PREFIX));

    match files.write_all(&path, &req.body).await {
        Ok(()) => {
            tracing::debug!(path = %path.display(), bytes = req.body.len(), "File written");
            Response::new(Status::Created)
        }
        Err(e) => {
            tracing::warn!(error = %e, "File write failed");
            Response::internal_error()
        }
    }
}

fn suffix<'a>(target: &'a str, prefix: &str) -> &'a str {
    target.strip_prefix(prefix).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::CONTENT_LENGTH;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn request(raw: &str) -> Request {
        let (head, body) = raw.split_once("\r\n\r\n").unwrap_or((raw, ""));
        Request::from_parts(head.as_bytes(), body.as_bytes().to_vec())
    }

    #[test]
    fn root_is_bare_ok() {
        assert_eq!(root().to_bytes(), b"HTTP/1.1 200 OK\r\n\r\n");
    }

    #[test]
    fn echo_plain() {
        let response = echo(&request("GET /echo/grape HTTP/1.1\r\n\r\n"));
        assert_eq!(
            response.to_bytes(),
            b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\ngrape"
        );
    }

    #[test]
    fn echo_empty_suffix() {
        let response = echo(&request("GET /echo/ HTTP/1.1\r\n\r\n"));
        assert_eq!(response.header_value(CONTENT_LENGTH), Some("0"));
        assert!(response.body.is_empty());
    }

    #[test]
    fn echo_gzip() {
        let response = echo(&request(
            "GET /echo/pineapple HTTP/1.1\r\nAccept-Encoding: deflate, gzip\r\n\r\n",
        ));

        assert_eq!(response.status, Status::Ok);
        assert_eq!(response.header_value("content-encoding"), Some("gzip"));
        assert_eq!(
            response.header_value(CONTENT_LENGTH),
            Some(response.body.len().to_string().as_str())
        );
        let names: Vec<&str> = response.headers.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["Content-Type", "Content-Encoding", "Content-Length"]);

        let mut decoded = String::new();
        GzDecoder::new(&response.body[..])
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "pineapple");
    }

    #[test]
    fn echo_ignores_other_encodings() {
        let plain = echo(&request("GET /echo/kiwi HTTP/1.1\r\n\r\n"));
        let offered = echo(&request(
            "GET /echo/kiwi HTTP/1.1\r\nAccept-Encoding: identity, br\r\n\r\n",
        ));
        assert_eq!(plain, offered);
    }

    #[test]
    fn user_agent_echoed() {
        let response = user_agent(&request(
            "GET /user-agent HTTP/1.1\r\nHost: x\r\nUser-Agent: test-client/1.0\r\n\r\n",
        ));
        assert_eq!(response.body, b"test-client/1.0");
        assert_eq!(response.header_value(CONTENT_LENGTH), Some("15"));
    }

    #[test]
    fn user_agent_is_case_sensitive() {
        let response = user_agent(&request(
            "GET /user-agent HTTP/1.1\r\nuser-agent: curl/8.0\r\n\r\n",
        ));
        assert!(response.body.is_empty());
        assert_eq!(response.header_value(CONTENT_LENGTH), Some("0"));
    }

    #[test]
    fn user_agent_missing() {
        let response = user_agent(&request("GET /user-agent HTTP/1.1\r\n\r\n"));
        assert_eq!(response.status, Status::Ok);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let files = FileStore::new(dir.path());

        let created = handle(
            Endpoint::FileWrite,
            &request("POST /files/note.txt HTTP/1.1\r\nContent-Length: 11\r\n\r\nhello world"),
            &files,
        )
        .await;
        assert_eq!(created.to_bytes(), b"HTTP/1.1 201 Created\r\n\r\n");

        let read = handle(
            Endpoint::FileRead,
            &request("GET /files/note.txt HTTP/1.1\r\n\r\n"),
            &files,
        )
        .await;
        assert_eq!(
            read.to_bytes(),
            b"HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\n\
              Content-Length: 11\r\n\r\nhello world"
        );
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let files = FileStore::new(dir.path());

        let response = read_file(&request("GET /files/absent HTTP/1.1\r\n\r\n"), &files).await;
        assert_eq!(response.to_bytes(), b"HTTP/1.1 404 Not Found\r\n\r\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unreadable_file_is_server_error() {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.txt");
        std::fs::write(&path, b"secret").unwrap();
        std::fs::set_permissions(&path, Permissions::from_mode(0o000)).unwrap();

        // Root ignores file modes.
        if std::fs::read(&path).is_ok() {
            return;
        }

        let files = FileStore::new(dir.path());
        let response = read_file(&request("GET /files/locked.txt HTTP/1.1\r\n\r\n"), &files).await;
        std::fs::set_permissions(&path, Permissions::from_mode(0o644)).unwrap();
        assert_eq!(
            response.to_bytes(),
            b"HTTP/1.1 500 Internal Server Error\r\n\r\n"
        );
    }

    #[tokio::test]
    async fn unwritable_path_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let files = FileStore::new(dir.path());

        let response = write_file(
            &request("POST /files/no/such/dir.txt HTTP/1.1\r\n\r\nx"),
            &files,
        )
        .await;
        assert_eq!(response.status, Status::InternalServerError);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn not_found_endpoint() {
        let files = FileStore::new("");
        let req = request("GET /x HTTP/1.1\r\n\r\n");
        let response = handle(Endpoint::NotFound, &req, &files).await;
        assert_eq!(response.to_bytes(), b"HTTP/1.1 404 Not Found\r\n\r\n");
    }
}
