// Integration tests for userlist-viewer

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

fn temp_path(tag: &str) -> PathBuf {
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    std::env::temp_dir().join(format!("ulv_{tag}_{}_{}.conf", std::process::id(), nonce))
}

/// Serve one canned HTTP response on a local port. Returns the endpoint URL
/// and a receiver for the request line the client sent.
fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
        }
        let _ = tx.send(request_line.trim().to_string());
        let mut stream = stream;
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
    });
    (format!("http://{addr}/api/v2/users"), rx)
}

/// Client for the local stub; ambient proxy settings must not apply.
fn local_source(endpoint: String) -> userlist_viewer::remote::HttpUserSource {
    let client = reqwest::blocking::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();
    userlist_viewer::remote::HttpUserSource::with_client(client, endpoint)
}

const USERS_JSON: &str = r#"[
  {"id": 3, "uid": "u3", "first_name": "Cleo", "last_name": "Park", "username": "cpark",
   "email": "a@x", "avatar": "https://img/3",
   "address": {"city": "Oslo", "street_name": "Elm", "street_address": "3", "zip_code": "0150",
               "state": "Oslo", "country": "Norway", "coordinates": {"lat": 1.0, "lng": 2.0}}},
  {"id": 1, "first_name": "Ada", "last_name": "Byron", "username": "ada", "email": "a@y",
   "address": {"city": "London"}},
  {"id": 2, "first_name": "Bo", "last_name": "Lind", "username": "bo", "email": "b@z"}
]"#;

// 1) Settings, theme and keymap files roundtrip
#[test]
fn config_files_roundtrip() {
    use userlist_viewer::app::{Keymap, Settings};
    use userlist_viewer::pipeline::SortDirection;
    use userlist_viewer::ui::theme::Theme;

    let path = temp_path("settings");
    let p = path.to_string_lossy().to_string();
    let mut s = Settings::default();
    s.page_size = 7;
    s.sort_key = "id".into();
    s.sort_direction = SortDirection::Descending;
    s.reset_page_on_search = false;
    s.write_file(&p).expect("write settings");
    assert_eq!(Settings::from_file(&p).expect("read settings"), s);
    let _ = std::fs::remove_file(&p);

    let path = temp_path("theme");
    let p = path.to_string_lossy().to_string();
    let t = Theme::mocha();
    t.write_file(&p).expect("write theme");
    assert_eq!(Theme::from_file(&p).expect("read theme"), t);
    let _ = std::fs::remove_file(&p);

    let path = temp_path("keybinds");
    let p = path.to_string_lossy().to_string();
    let km = Keymap::default();
    km.write_file(&p).expect("write keymap");
    let reread = Keymap::from_file(&p).expect("read keymap");
    assert_eq!(km.all_bindings().len(), reread.all_bindings().len());
    let _ = std::fs::remove_file(&p);
}

// 2) Fetch over HTTP sends the size parameter and decodes the body
#[test]
fn http_fetch_decodes_users() {
    use userlist_viewer::remote::UserSource;

    let (endpoint, requests) = serve_once("200 OK", USERS_JSON);
    let source = local_source(endpoint);
    let users = source.fetch_users(3).expect("fetch users");
    assert_eq!(users.iter().map(|u| u.id).collect::<Vec<_>>(), vec![3, 1, 2]);
    assert_eq!(users[0].address.country, "Norway");
    assert_eq!(users[2].address.city, "");

    let line = requests.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(line.starts_with("GET /api/v2/users?size=3 "), "{line}");
}

// 3) Non-success status and malformed bodies surface as fetch errors
#[test]
fn http_fetch_reports_status_and_decode_errors() {
    use userlist_viewer::error::FetchError;
    use userlist_viewer::remote::UserSource;

    let (endpoint, _rx) = serve_once("500 Internal Server Error", "{}");
    let err = local_source(endpoint).fetch_users(5).unwrap_err();
    assert!(matches!(err, FetchError::Status(500)));

    let (endpoint, _rx) = serve_once("200 OK", "{\"not\": \"a list\"}");
    let err = local_source(endpoint).fetch_users(5).unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
    assert!(err.user_message().starts_with("Failed to fetch users"));
}

// 4) Full flow: background load, debounced search, sort toggle, paging, expand
#[test]
fn app_state_flow_over_fetched_users() {
    use userlist_viewer::app::{AppState, Keymap, Settings};
    use userlist_viewer::pipeline::SortDirection;
    use userlist_viewer::remote;
    use userlist_viewer::ui::theme::Theme;

    let (endpoint, _rx) = serve_once("200 OK", USERS_JSON);
    let mut settings = Settings::default();
    settings.page_size = 1;
    settings.sort_key = "id".into();
    let mut app = AppState::new(settings, Theme::dark(), Keymap::default());
    assert!(app.is_loading());

    let mut pending = remote::spawn_fetch(local_source(endpoint), 3);
    let result = pending.wait(Duration::from_secs(10)).expect("fetch finished");
    app.receive_users(result);
    assert!(!app.is_loading());
    assert_eq!(app.derived().window.total, 3);

    let t0 = Instant::now();
    app.on_search_input("a", t0);
    app.on_search_input("a@", t0 + Duration::from_millis(100));
    assert!(!app.tick(t0 + Duration::from_millis(300)));
    assert!(app.tick(t0 + Duration::from_millis(400)));
    assert_eq!(app.derived().filtered_len, 2);

    app.on_sort_request("id");
    assert_eq!(app.view.directive.direction, SortDirection::Descending);
    assert_eq!(app.derived().rows[0].id, 3);
    app.on_page_change(2);
    assert_eq!(app.derived().rows[0].id, 1);
    app.on_page_change(9999);
    assert_eq!(app.view.page_index, 2);

    // Unsortable columns are ignored.
    app.on_sort_request("avatar");
    assert_eq!(app.view.directive.key, "id");

    app.toggle_expanded();
    assert!(app.is_expanded(1));
    app.toggle_expanded();
    assert!(!app.is_expanded(1));
}

// 5) A failed fetch leaves an empty table and a visible message
#[test]
fn app_state_reports_fetch_failure() {
    use userlist_viewer::app::{AppState, Keymap, Settings};
    use userlist_viewer::remote;
    use userlist_viewer::ui::theme::Theme;

    let (endpoint, _rx) = serve_once("503 Service Unavailable", "");
    let mut app = AppState::new(Settings::default(), Theme::dark(), Keymap::default());
    let mut pending = remote::spawn_fetch(local_source(endpoint), 10);
    app.receive_users(pending.wait(Duration::from_secs(10)).expect("fetch finished"));
    assert!(!app.is_loading());
    assert!(app.error_message().unwrap().contains("503"));
    assert!(app.records.is_empty());
    assert_eq!(app.derived().window.total, 1);
}
