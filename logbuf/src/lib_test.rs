use serde_json::{Map, json};

use crate::{DEFAULT_CAPACITY, LogBuffer, LogLevel, UnknownLevel};

fn push(buffer: &LogBuffer, message: &str) -> u64 {
    buffer.push(LogLevel::Info, message, Map::new())
}

#[test]
fn level_parses_case_insensitively() {
    assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
    assert_eq!(" debug ".parse::<LogLevel>().unwrap(), LogLevel::Debug);
    assert!("verbose".parse::<LogLevel>().is_err());
}

#[test]
fn unknown_level_is_a_std_error() {
    let err = "verbose".parse::<LogLevel>().unwrap_err();
    assert_eq!(err, UnknownLevel("verbose".into()));
    let boxed: Box<dyn std::error::Error> = Box::new(err);
    assert_eq!(boxed.to_string(), "unknown log level 'verbose'");
}

#[test]
fn level_display_round_trips() {
    for level in LogLevel::ALL {
        assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
    }
}

#[test]
fn level_from_tracing() {
    assert_eq!(LogLevel::from(tracing::Level::ERROR), LogLevel::Error);
    assert_eq!(LogLevel::from(tracing::Level::WARN), LogLevel::Warn);
    assert_eq!(LogLevel::from(tracing::Level::INFO), LogLevel::Info);
    assert_eq!(LogLevel::from(tracing::Level::DEBUG), LogLevel::Debug);
    assert_eq!(LogLevel::from(tracing::Level::TRACE), LogLevel::Debug);
}

#[test]
fn default_buffer_capacity() {
    assert_eq!(LogBuffer::default().capacity(), DEFAULT_CAPACITY);
    assert_eq!(LogBuffer::new(0).capacity(), 1);
}

#[test]
fn push_keeps_order_and_fields() {
    let buffer = LogBuffer::new(10);
    let mut fields = Map::new();
    fields.insert("user_id".into(), json!(7));
    buffer.push(LogLevel::Warn, "first", fields);
    push(&buffer, "second");

    let entries = buffer.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].message, "first");
    assert_eq!(entries[0].level, LogLevel::Warn);
    assert_eq!(entries[0].fields["user_id"], json!(7));
    assert_eq!(entries[1].message, "second");
}

#[test]
fn evicts_oldest_at_capacity() {
    let buffer = LogBuffer::new(3);
    for i in 0..5 {
        push(&buffer, &format!("m{i}"));
    }
    let messages: Vec<_> = buffer.entries().into_iter().map(|e| e.message).collect();
    assert_eq!(messages, vec!["m2", "m3", "m4"]);
}

#[test]
fn clear_empties_but_ids_keep_increasing() {
    let buffer = LogBuffer::new(10);
    let first = push(&buffer, "a");
    buffer.clear();
    assert!(buffer.is_empty());
    let second = push(&buffer, "b");
    assert!(second > first);
}

#[test]
fn clones_share_the_ring() {
    let buffer = LogBuffer::new(10);
    let other = buffer.clone();
    push(&other, "shared");
    assert_eq!(buffer.len(), 1);
}
