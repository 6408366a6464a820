use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct RecordResponse {
    id: u64,
    date: String,
    time: String,
    shape: String,
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ShapeCounts {
    normal: u32,
    hard: u32,
    soft: u32,
    watery: u32,
}

#[derive(Debug, Deserialize)]
struct ShapeStats {
    counts: ShapeCounts,
    total: u32,
    normal_rate_pct: f64,
    abnormal_count: u32,
}

#[derive(Debug, Deserialize)]
struct DailyStats {
    days_with_records: u32,
    average_per_day: f64,
    max_per_day: u32,
}

#[derive(Debug, Deserialize)]
struct PeriodSummary {
    start: String,
    end: String,
    label: String,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    period: PeriodSummary,
    shape: ShapeStats,
    daily: DailyStats,
    advice: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CalendarDay {
    date: String,
    records: Vec<RecordResponse>,
}

#[derive(Debug, Deserialize)]
struct CalendarResponse {
    days: Vec<CalendarDay>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("stool_log_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

fn unique_user(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}")
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_stool_log"))
        .env("PORT", port.to_string())
        .env("STOOL_LOG_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn insert(
    client: &Client,
    base_url: &str,
    user: &str,
    date: &str,
    time: &str,
    shape: &str,
) -> RecordResponse {
    client
        .post(format!("{base_url}/api/records"))
        .header("x-user-id", user)
        .json(&serde_json::json!({ "date": date, "time": time, "shape": shape }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn list(client: &Client, base_url: &str, user: &str) -> Vec<RecordResponse> {
    client
        .get(format!("{base_url}/api/records"))
        .header("x-user-id", user)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_insert_then_list_sorted_newest_first() {
    let server = shared_server().await;
    let client = Client::new();
    let user = unique_user("alice");

    insert(&client, &server.base_url, &user, "2024-06-03", "08:30", "normal").await;
    insert(&client, &server.base_url, &user, "2024-06-05", "09:00", "hard").await;
    insert(&client, &server.base_url, &user, "2024-06-04", "07:15", "soft").await;

    let records = list(&client, &server.base_url, &user).await;
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].date, "2024-06-05");
    assert_eq!(records[1].date, "2024-06-04");
    assert_eq!(records[2].date, "2024-06-03");
    assert_eq!(records[0].time, "09:00");
    assert_eq!(records[0].shape, "hard");
    assert!(records[0].notes.is_none());
}

#[tokio::test]
async fn http_stats_for_a_reference_week() {
    let server = shared_server().await;
    let client = Client::new();
    let user = unique_user("stats");

    insert(&client, &server.base_url, &user, "2024-06-03", "08:30", "normal").await;
    insert(&client, &server.base_url, &user, "2024-06-03", "21:00", "hard").await;
    insert(&client, &server.base_url, &user, "2024-06-05", "08:00", "normal").await;
    // Outside the requested week, must not be counted.
    insert(&client, &server.base_url, &user, "2024-06-10", "08:00", "watery").await;

    let stats: StatsResponse = client
        .get(format!(
            "{}/api/stats?period=week&date=2024-06-03",
            server.base_url
        ))
        .header("x-user-id", &user)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(stats.period.start, "2024-06-03");
    assert_eq!(stats.period.end, "2024-06-09");
    assert_eq!(stats.period.label, "6/3 - 6/9");
    assert_eq!(stats.shape.total, 3);
    assert_eq!(stats.shape.counts.normal, 2);
    assert_eq!(stats.shape.counts.hard, 1);
    assert_eq!(stats.shape.counts.soft, 0);
    assert_eq!(stats.shape.counts.watery, 0);
    assert_eq!(stats.shape.normal_rate_pct, 66.7);
    assert_eq!(stats.shape.abnormal_count, 1);
    assert_eq!(stats.daily.days_with_records, 2);
    assert_eq!(stats.daily.average_per_day, 1.5);
    assert_eq!(stats.daily.max_per_day, 2);
    assert_eq!(stats.advice.len(), 2);
}

#[tokio::test]
async fn http_calendar_binds_records_to_their_day() {
    let server = shared_server().await;
    let client = Client::new();
    let user = unique_user("calendar");

    insert(&client, &server.base_url, &user, "2024-06-03", "08:30", "normal").await;
    insert(&client, &server.base_url, &user, "2024-06-03", "21:00", "soft").await;

    let calendar: CalendarResponse = client
        .get(format!(
            "{}/api/calendar?view=week&selected=2024-06-05",
            server.base_url
        ))
        .header("x-user-id", &user)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(calendar.days.len(), 7);
    assert_eq!(calendar.days[0].date, "2024-06-03");
    assert_eq!(calendar.days[0].records.len(), 2);
    assert!(calendar.days[1..].iter().all(|day| day.records.is_empty()));
}

#[tokio::test]
async fn http_users_are_isolated() {
    let server = shared_server().await;
    let client = Client::new();
    let alice = unique_user("alice");
    let bob = unique_user("bob");

    insert(&client, &server.base_url, &alice, "2024-06-03", "08:30", "normal").await;

    assert_eq!(list(&client, &server.base_url, &alice).await.len(), 1);
    assert!(list(&client, &server.base_url, &bob).await.is_empty());
}

#[tokio::test]
async fn http_delete_one_and_delete_all() {
    let server = shared_server().await;
    let client = Client::new();
    let user = unique_user("wipe");

    let first =
        insert(&client, &server.base_url, &user, "2024-06-03", "08:30", "normal").await;
    insert(&client, &server.base_url, &user, "2024-06-04", "08:30", "hard").await;

    let response = client
        .delete(format!("{}/api/records/{}", server.base_url, first.id))
        .header("x-user-id", &user)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);
    assert_eq!(list(&client, &server.base_url, &user).await.len(), 1);

    let missing = client
        .delete(format!("{}/api/records/{}", server.base_url, first.id))
        .header("x-user-id", &user)
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);

    let wipe = client
        .delete(format!("{}/api/records", server.base_url))
        .header("x-user-id", &user)
        .send()
        .await
        .unwrap();
    assert_eq!(wipe.status().as_u16(), 204);
    assert!(list(&client, &server.base_url, &user).await.is_empty());
}

#[tokio::test]
async fn http_update_changes_shape_and_notes() {
    let server = shared_server().await;
    let client = Client::new();
    let user = unique_user("edit");

    let record =
        insert(&client, &server.base_url, &user, "2024-06-03", "08:30", "normal").await;

    let updated: RecordResponse = client
        .put(format!("{}/api/records/{}", server.base_url, record.id))
        .header("x-user-id", &user)
        .json(&serde_json::json!({ "shape": "watery", "notes": "お腹が痛い" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(updated.id, record.id);
    assert_eq!(updated.date, "2024-06-03");
    assert_eq!(updated.shape, "watery");
    assert_eq!(updated.notes.as_deref(), Some("お腹が痛い"));
}

#[tokio::test]
async fn http_rejects_missing_user_and_bad_input() {
    let server = shared_server().await;
    let client = Client::new();
    let user = unique_user("reject");

    let unauthorized = client
        .get(format!("{}/api/records", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(unauthorized.status().as_u16(), 401);

    let bad_date = client
        .post(format!("{}/api/records", server.base_url))
        .header("x-user-id", &user)
        .json(&serde_json::json!({ "date": "06/03/2024", "time": "08:30", "shape": "normal" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_date.status().as_u16(), 400);

    let bad_time = client
        .post(format!("{}/api/records", server.base_url))
        .header("x-user-id", &user)
        .json(&serde_json::json!({ "date": "2024-06-03", "time": "late", "shape": "normal" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_time.status().as_u16(), 400);
}

#[tokio::test]
async fn http_health_message_reports_the_week() {
    let server = shared_server().await;
    let client = Client::new();
    let user = unique_user("message");

    #[derive(Debug, Deserialize)]
    struct HealthMessage {
        week_start: String,
        week_end: String,
        message: String,
    }

    let empty: HealthMessage = client
        .get(format!(
            "{}/api/health-message?date=2024-06-05",
            server.base_url
        ))
        .header("x-user-id", &user)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(empty.week_start, "2024-06-03");
    assert_eq!(empty.week_end, "2024-06-09");
    assert!(empty.message.contains("まだ記録がありません"));

    for day in 3..=9 {
        let date = format!("2024-06-{day:02}");
        insert(&client, &server.base_url, &user, &date, "08:00", "normal").await;
    }

    let full: HealthMessage = client
        .get(format!(
            "{}/api/health-message?date=2024-06-05",
            server.base_url
        ))
        .header("x-user-id", &user)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(full.message.contains("毎日記録できていますね"));
    assert!(full.message.contains("形状も良好です"));
}
