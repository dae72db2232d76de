use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::{Framed, LinesCodec};
use ulid::Ulid;

use kartavail::fleet::FleetStore;
use kartavail::model::*;
use kartavail::protocol::Response;
use kartavail::schedule::Schedule;
use kartavail::wire::{self, AvailabilityHandler};

// ── Test infrastructure ──────────────────────────────────────

fn write_fleet(karts: &[Kart]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kartavail_int_test_{}", Ulid::new()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("fleet.json");
    std::fs::write(&path, serde_json::to_vec(karts).unwrap()).unwrap();
    path
}

async fn start_test_server(fleet_path: &Path) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let store = Arc::new(FleetStore::open(fleet_path).unwrap());
    let handler = Arc::new(AvailabilityHandler::new(store, Schedule::default()));

    tokio::spawn(async move {
        loop {
            let (socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => break,
            };
            let handler = handler.clone();
            tokio::spawn(async move {
                let _ = wire::process_connection(socket, handler).await;
            });
        }
    });

    addr
}

async fn connect(addr: SocketAddr) -> Framed<TcpStream, LinesCodec> {
    let stream = TcpStream::connect(addr).await.unwrap();
    Framed::new(stream, LinesCodec::new())
}

async fn request(client: &mut Framed<TcpStream, LinesCodec>, line: &str) -> Response {
    client.send(line.to_string()).await.unwrap();
    let reply = tokio::time::timeout(Duration::from_secs(5), client.next())
        .await
        .expect("response timed out")
        .expect("connection closed")
        .unwrap();
    serde_json::from_str(&reply).unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 13).unwrap()
}

fn at(hour: Ms) -> Ms {
    Schedule::default().day_window(date()).start + hour * HOUR_MS
}

fn sample_fleet() -> Vec<Kart> {
    let mut booked = Kart::new("j2", Category::Junior);
    booked.bookings.push(Span::new(at(14), at(15)));
    let mut serviced = Kart::new("s1", Category::Senior);
    serviced.maintenance.push(Span::new(at(10), at(12)));
    let mut retired = Kart::new("d1", Category::Double);
    retired.status = KartStatus::Retired;
    vec![Kart::new("j1", Category::Junior), booked, serviced, retired]
}

fn count(slots: &[AvailabilitySlot], time: &str, category: Category) -> u32 {
    slots
        .iter()
        .find(|s| s.time == time && s.category == category)
        .map(|s| s.available_count)
        .unwrap()
}

// ── Tests ────────────────────────────────────────────────────

#[tokio::test]
async fn availability_over_tcp() {
    let path = write_fleet(&sample_fleet());
    let addr = start_test_server(&path).await;
    let mut client = connect(addr).await;

    let response = request(&mut client, r#"{"op":"availability","date":"2024-06-13"}"#).await;
    let Response::Availability { date: d, slots } = response else {
        panic!("expected availability response");
    };
    assert_eq!(d, date());
    assert_eq!(slots.len(), Schedule::default().slot_count() * Category::ALL.len());

    assert_eq!(count(&slots, "13:00", Category::Junior), 2);
    assert_eq!(count(&slots, "14:00", Category::Junior), 1);
    assert_eq!(count(&slots, "15:00", Category::Junior), 2);
    assert_eq!(count(&slots, "09:00", Category::Senior), 1);
    assert_eq!(count(&slots, "10:00", Category::Senior), 0);
    assert_eq!(count(&slots, "11:00", Category::Senior), 0);
    assert_eq!(count(&slots, "12:00", Category::Senior), 1);
    assert!(slots
        .iter()
        .filter(|s| s.category == Category::Double)
        .all(|s| !s.available && s.available_count == 0));
}

#[tokio::test]
async fn other_day_is_fully_free() {
    let path = write_fleet(&sample_fleet());
    let addr = start_test_server(&path).await;
    let mut client = connect(addr).await;

    let response = request(
        &mut client,
        r#"{"op":"availability","date":"2024-06-14","category":"junior"}"#,
    )
    .await;
    let Response::Availability { slots, .. } = response else {
        panic!("expected availability response");
    };
    assert!(slots.iter().all(|s| s.available_count == 2));
}

#[tokio::test]
async fn free_spans_over_tcp() {
    let path = write_fleet(&sample_fleet());
    let addr = start_test_server(&path).await;
    let mut client = connect(addr).await;

    let response = request(
        &mut client,
        r#"{"op":"free_spans","date":"2024-06-13","category":"junior","min_available":2}"#,
    )
    .await;
    let Response::FreeSpans { category, spans, .. } = response else {
        panic!("expected free_spans response");
    };
    assert_eq!(category, Category::Junior);
    assert_eq!(spans, vec![Span::new(at(9), at(14)), Span::new(at(15), at(22))]);
}

#[tokio::test]
async fn errors_keep_connection_open() {
    let path = write_fleet(&sample_fleet());
    let addr = start_test_server(&path).await;
    let mut client = connect(addr).await;

    let response = request(&mut client, r#"{"op":"availability","date":"yesterday"}"#).await;
    assert!(response.is_error());

    let response = request(&mut client, r#"{"op":"fleet"}"#).await;
    let Response::Fleet { karts, categories } = response else {
        panic!("expected fleet response");
    };
    assert_eq!(karts, 4);
    assert_eq!(categories[0].offerable, 2);
    assert_eq!(categories[2].offerable, 0);
}

#[tokio::test]
async fn reload_picks_up_new_snapshot() {
    let path = write_fleet(&sample_fleet());
    let addr = start_test_server(&path).await;
    let mut client = connect(addr).await;

    std::fs::write(&path, "[]").unwrap();
    let response = request(&mut client, r#"{"op":"reload"}"#).await;
    assert_eq!(response, Response::Reloaded { karts: 0 });

    let response = request(&mut client, r#"{"op":"availability","date":"2024-06-13"}"#).await;
    let Response::Availability { slots, .. } = response else {
        panic!("expected availability response");
    };
    assert!(slots.iter().all(|s| s.available_count == 0 && !s.available));
}

#[tokio::test]
async fn concurrent_clients_see_same_answer() {
    let path = write_fleet(&sample_fleet());
    let addr = start_test_server(&path).await;

    let mut tasks = Vec::new();
    for _ in 0..8 {
        tasks.push(tokio::spawn(async move {
            let mut client = connect(addr).await;
            request(&mut client, r#"{"op":"availability","date":"2024-06-13"}"#).await
        }));
    }
    let mut responses = Vec::new();
    for task in tasks {
        responses.push(task.await.unwrap());
    }
    assert!(responses.windows(2).all(|w| w[0] == w[1]));
}
