//! Property-based tests for rust_log_dispatch using proptest

use proptest::prelude::*;
use rust_log_dispatch::core::{encode_batch, format_record, LoggerError};
use rust_log_dispatch::prelude::*;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop::sample::select(LogLevel::ALL.to_vec())
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Names round-trip through parsing and JSON
    #[test]
    fn test_log_level_name_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);

        let json = serde_json::to_string(&level).unwrap();
        prop_assert_eq!(json, format!("\"{}\"", level));
    }

    /// Ordering follows the numeric discriminant
    #[test]
    fn test_log_level_ordering(a in any_level(), b in any_level()) {
        prop_assert_eq!(a.cmp(&b), (a as u8).cmp(&(b as u8)));
    }

    /// Anything that is not an exact level name is rejected
    #[test]
    fn test_unknown_names_rejected(name in "[A-Za-z]{0,10}") {
        prop_assume!(LogLevel::ALL.iter().all(|l| l.to_str() != name));

        let result: Result<LogLevel> = name.parse();
        let is_unknown = matches!(result, Err(LoggerError::UnknownLevel { .. }));
        prop_assert!(is_unknown);
    }

    /// Lowercase spellings are not accepted
    #[test]
    fn test_parsing_is_case_sensitive(level in any_level()) {
        prop_assert!(level.to_str().to_lowercase().parse::<LogLevel>().is_err());
    }
}

// ============================================================================
// LevelSet Tests
// ============================================================================

proptest! {
    /// Toggling levels only ever changes membership of the toggled level
    #[test]
    fn test_level_set_toggle(ops in prop::collection::vec((any_level(), any::<bool>()), 0..40)) {
        let mut set = LevelSet::new();
        let mut model = std::collections::BTreeSet::new();

        for (level, enable) in ops {
            let result = if enable { set.enable(level) } else { set.disable(level) };
            let changed = if enable { model.insert(level) } else { model.remove(&level) };
            prop_assert_eq!(result.is_ok(), changed);
        }

        prop_assert_eq!(set.iter().collect::<Vec<_>>(), model.into_iter().collect::<Vec<_>>());
    }
}

// ============================================================================
// Record and Batch Tests
// ============================================================================

proptest! {
    /// Batches keep submission order on the wire
    #[test]
    fn test_batch_encoding_preserves_order(messages in prop::collection::vec(".{0,20}", 0..20)) {
        let batch: Batch = messages
            .iter()
            .enumerate()
            .map(|(i, m)| Record::from_parts(LogLevel::Info, "f", "", "a.rs", i as u32, m.clone()))
            .collect();

        let body = encode_batch(&batch).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let entries = value["logentries"].as_array().unwrap();

        prop_assert_eq!(entries.len(), messages.len());
        for (entry, message) in entries.iter().zip(&messages) {
            prop_assert_eq!(entry["message"].as_str().unwrap(), message.as_str());
        }
    }

    /// Detailed layout appears exactly from the verbosity threshold upward
    #[test]
    fn test_console_layout_threshold(level in any_level(), verbosity in any_level()) {
        let record = Record::from_parts(level, "main", "/src", "lib.rs", 7, "msg");
        let line = format_record(verbosity, &record);

        let expected_prefix = format!("({}) @ main()", level);
        prop_assert!(line.starts_with(&expected_prefix));
        prop_assert_eq!(line.contains("lib.rs:7"), level >= verbosity);
        prop_assert!(line.ends_with("msg"));
    }
}
