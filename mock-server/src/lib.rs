use axum::{
    body::to_bytes,
    extract::{FromRequest, Multipart, Path, Request},
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode, Uri},
    routing::any,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

const BODY_LIMIT: usize = 10 << 20;

/// Everything the server saw of a request, decoded by content type.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub content_type: Option<String>,
    /// Url-encoded pairs or multipart text fields.
    pub form: Vec<(String, String)>,
    pub files: Vec<EchoFile>,
    pub json: Option<serde_json::Value>,
    pub body_len: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EchoFile {
    pub name: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl Echo {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        lookup(&self.query, key)
    }

    pub fn form_value(&self, key: &str) -> Option<&str> {
        lookup(&self.form, key)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn file(&self, name: &str) -> Option<&EchoFile> {
        self.files.iter().find(|f| f.name == name)
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    request: Request,
) -> Result<Json<Echo>, (StatusCode, String)> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let mut echo = Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(|q| parse_pairs(q.as_bytes())).unwrap_or_default(),
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect(),
        content_type: content_type.clone(),
        ..Echo::default()
    };

    match content_type.as_deref() {
        Some(ct) if ct.starts_with("multipart/form-data") => {
            let mut multipart = Multipart::from_request(request, &()).await.map_err(bad_request)?;
            while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
                let name = field.name().unwrap_or_default().to_string();
                match field.file_name().map(str::to_owned) {
                    Some(file_name) => {
                        let content_type = field.content_type().map(str::to_owned);
                        let data = field.bytes().await.map_err(bad_request)?;
                        echo.body_len += data.len();
                        echo.files.push(EchoFile {
                            name,
                            file_name,
                            content_type,
                            data: data.to_vec(),
                        });
                    }
                    None => {
                        let value = field.text().await.map_err(bad_request)?;
                        echo.body_len += value.len();
                        echo.form.push((name, value));
                    }
                }
            }
        }
        other => {
            let body = to_bytes(request.into_body(), BODY_LIMIT).await.map_err(bad_request)?;
            echo.body_len = body.len();
            match other {
                Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
                    echo.form = parse_pairs(&body);
                }
                Some(ct) if ct.starts_with("application/json") && !body.is_empty() => {
                    echo.json = Some(serde_json::from_slice(&body).map_err(bad_request)?);
                }
                _ => {}
            }
        }
    }

    tracing::debug!(method = %echo.method, path = %echo.path, len = echo.body_len, "echoed request");
    Ok(Json(echo))
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

fn parse_pairs(input: &[u8]) -> Vec<(String, String)> {
    url::form_urlencoded::parse(input).into_owned().collect()
}

fn bad_request(err: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.to_string())
}
