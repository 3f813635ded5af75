//! Builders exercised against the live echo server.
//!
//! # Design
//! Starts the mock server on a random port, sends every kind of built
//! request over real HTTP through the default transport, and checks what the
//! server decoded. Part order across different keys is not asserted.

use std::net::SocketAddr;
use std::path::PathBuf;

use easyreq::{send, ApiError, FormBuilder, HttpMethod, JsonBuilder, RequestBuilder};
use mock_server::Echo;
use serde::Serialize;

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn echo_of(response: easyreq::HttpResponse) -> Echo {
    assert_eq!(response.status, 200, "{}", response.text());
    serde_json::from_slice(&response.body).unwrap()
}

fn logo(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("logo.png");
    std::fs::write(&path, b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR").unwrap();
    path
}

fn john() -> FormBuilder {
    let mut form = FormBuilder::new();
    form.fields().add("Name", "John").add("Likes", "Ice Cream");
    form.header().add("X-Trace", "example");
    form
}

#[test]
fn multipart_form_reaches_server() {
    let addr = start_server();
    let dir = tempfile::tempdir().unwrap();
    let path = logo(&dir);

    let mut form = john();
    form.files().add("File", path.to_str().unwrap());

    let request = form
        .build_request(HttpMethod::Post, &format!("http://{addr}/echo?test=true"))
        .unwrap();
    assert!(request.content_type().unwrap().starts_with("multipart/form-data; boundary="));

    let echo = echo_of(form.send(HttpMethod::Post, &format!("http://{addr}/echo?test=true")).unwrap());
    assert_eq!(echo.query_value("test"), Some("true"));
    assert_eq!(echo.form_value("Name"), Some("John"));
    assert_eq!(echo.form_value("Likes"), Some("Ice Cream"));
    assert_eq!(echo.header("x-trace"), Some("example"));

    let file = echo.file("File").unwrap();
    assert_eq!(file.file_name, "logo.png");
    assert_eq!(file.data, std::fs::read(&path).unwrap());
}

#[test]
fn several_files_under_one_key_keep_order() {
    let addr = start_server();
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a.txt");
    let second = dir.path().join("b.txt");
    std::fs::write(&first, "first").unwrap();
    std::fs::write(&second, "second").unwrap();

    let mut form = FormBuilder::new();
    form.files()
        .add("Docs", first.to_str().unwrap())
        .add("Docs", second.to_str().unwrap());

    let echo = echo_of(form.send(HttpMethod::Put, &format!("http://{addr}/echo")).unwrap());
    let docs: Vec<_> = echo.files.iter().filter(|f| f.name == "Docs").collect();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].file_name, "a.txt");
    assert_eq!(docs[0].data, b"first");
    assert_eq!(docs[1].file_name, "b.txt");
    assert_eq!(docs[1].data, b"second");
}

#[test]
fn urlencoded_form_for_post_and_put() {
    let addr = start_server();
    let form = john();

    for method in [HttpMethod::Post, HttpMethod::Put] {
        let echo = echo_of(form.send(method, &format!("http://{addr}/echo?test=true")).unwrap());
        assert_eq!(echo.method, method.as_str());
        assert_eq!(echo.content_type.as_deref(), Some("application/x-www-form-urlencoded"));
        assert_eq!(echo.query_value("test"), Some("true"));
        assert_eq!(echo.form_value("Name"), Some("John"));
        assert_eq!(echo.form_value("Likes"), Some("Ice Cream"));
    }
}

#[test]
fn get_form_merges_query() {
    let addr = start_server();
    let echo = echo_of(john().send(HttpMethod::Get, &format!("http://{addr}/echo?test=true")).unwrap());

    assert_eq!(echo.method, "GET");
    assert_eq!(echo.query_value("test"), Some("true"));
    assert_eq!(echo.query_value("Name"), Some("John"));
    assert_eq!(echo.query_value("Likes"), Some("Ice Cream"));
    assert_eq!(echo.body_len, 0);
}

#[test]
fn simplest_get_has_no_query() {
    let addr = start_server();
    let echo = echo_of(FormBuilder::new().send(HttpMethod::Get, &format!("http://{addr}/echo")).unwrap());
    assert!(echo.query.is_empty());
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Person {
    name: Vec<String>,
    likes: Vec<String>,
}

#[test]
fn json_payload_reaches_server() {
    let addr = start_server();
    let person = Person {
        name: vec!["John".to_string()],
        likes: vec!["Ice Cream".to_string()],
    };

    let mut builder = JsonBuilder::new(person);
    builder.set_basic_auth("user", "pass");
    let echo = echo_of(send(&builder, HttpMethod::Post, &format!("http://{addr}/echo")).unwrap());

    assert_eq!(echo.content_type.as_deref(), Some("application/json"));
    assert_eq!(echo.header("authorization"), Some("Basic dXNlcjpwYXNz"));
    assert_eq!(
        echo.json,
        Some(serde_json::json!({"Name": ["John"], "Likes": ["Ice Cream"]}))
    );
}

#[test]
fn host_header_follows_the_url() {
    let addr = start_server();
    let mut form = john();
    form.header().add("Host", "example.com");

    let request = form.build_request(HttpMethod::Post, &format!("http://{addr}/echo")).unwrap();
    assert_eq!(request.headers.get("Host"), Some("example.com"));

    let echo = echo_of(form.send(HttpMethod::Post, &format!("http://{addr}/echo")).unwrap());
    assert_eq!(echo.header("host"), Some(addr.to_string().as_str()));
    assert_eq!(echo.header("x-trace"), Some("example"));
    assert_eq!(echo.form_value("Name"), Some("John"));
}

#[test]
fn error_status_is_a_response() {
    let addr = start_server();
    let response = FormBuilder::new()
        .send(HttpMethod::Post, &format!("http://{addr}/status/404"))
        .unwrap();
    assert_eq!(response.status, 404);
}

#[test]
fn missing_file_never_dispatches() {
    let mut form = FormBuilder::new();
    form.fields().add("Name", "John");
    form.files().add("File", "test-files/logo1.png");

    // Nothing listens on port 9; reaching the transport would be a Transport error.
    let err = form.send(HttpMethod::Post, "http://127.0.0.1:9/echo").unwrap_err();
    assert!(matches!(err, ApiError::FileNotFound { .. }), "{err}");
}

#[test]
fn unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = john().send(HttpMethod::Post, &format!("http://{addr}/echo")).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "{err}");
}
