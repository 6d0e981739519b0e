//! Property-based tests for the tracing configuration

use std::path::PathBuf;

use proptest::prelude::*;
use panbridge_core::{TracingConfig, TracingLevel, TracingOutput, field_names, span_names};

// ========== Strategies ==========

/// Strategy for generating tracing levels
fn arb_tracing_level() -> impl Strategy<Value = TracingLevel> {
    prop_oneof![
        Just(TracingLevel::Error),
        Just(TracingLevel::Warn),
        Just(TracingLevel::Info),
        Just(TracingLevel::Debug),
        Just(TracingLevel::Trace),
    ]
}

/// Strategy for generating tracing output types
fn arb_tracing_output() -> impl Strategy<Value = TracingOutput> {
    prop_oneof![
        Just(TracingOutput::Stdout),
        Just(TracingOutput::Stderr),
        "[a-z]{1,8}".prop_map(|name| TracingOutput::File {
            path: PathBuf::from(format!("/tmp/{name}.log")),
        }),
    ]
}

/// Strategy for generating filter strings
fn arb_filter_string() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("panbridge_core=debug".to_string()),
        Just("panbridge_core=info".to_string()),
        Just("panbridge_core=trace,panbridge=warn".to_string()),
        Just("panbridge_core=debug,tokio=warn".to_string()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Builder methods compose without clobbering each other
    #[test]
    fn tracing_config_builder_composable(
        level in arb_tracing_level(),
        output in arb_tracing_output(),
        thread_ids in any::<bool>(),
    ) {
        let config = TracingConfig::new()
            .with_level(level)
            .with_output(output.clone())
            .with_thread_ids(thread_ids);

        prop_assert_eq!(config.level, level);
        prop_assert_eq!(config.output, output);
        prop_assert_eq!(config.thread_ids, thread_ids);
        prop_assert!(config.filter.is_none());
    }

    /// A custom filter is stored verbatim
    #[test]
    fn tracing_config_accepts_filter(filter in arb_filter_string()) {
        let config = TracingConfig::new().with_filter(filter.clone());
        prop_assert_eq!(config.filter, Some(filter));
    }

    /// Display output parses back to the same level, in any case
    #[test]
    fn tracing_level_display_roundtrips(level in arb_tracing_level(), upper in any::<bool>()) {
        let text = if upper { level.to_string().to_uppercase() } else { level.to_string() };
        prop_assert_eq!(text.parse::<TracingLevel>(), Ok(level));
    }

    /// The default directive names both crates at the configured level
    #[test]
    fn default_directive_uses_level(level in arb_tracing_level()) {
        let directive = TracingConfig::new().with_level(level).default_directive();
        prop_assert_eq!(directive, format!("panbridge_core={level},panbridge={level}"));
    }

    /// More `-v` flags never lower the level
    #[test]
    fn verbosity_is_monotonic(count in 0_u8..10) {
        let lower = TracingLevel::from_verbosity(count).to_tracing_level();
        let higher = TracingLevel::from_verbosity(count + 1).to_tracing_level();
        prop_assert!(higher >= lower);
    }
}

#[test]
fn span_names_are_dotted() {
    let names = [
        span_names::SESSION_CONNECT,
        span_names::SESSION_EXECUTE,
        span_names::PERFORMANCE_POLL,
        span_names::SERVICE_MUTATE,
    ];
    for name in names {
        assert!(!name.is_empty());
        assert!(name.contains('.'), "span name {name} should be namespaced");
    }
}

#[test]
fn field_names_are_distinct() {
    let names = [
        field_names::HOST,
        field_names::COMMAND,
        field_names::DURATION_MS,
        field_names::ATTEMPT,
        field_names::ERROR,
    ];
    let unique: std::collections::HashSet<_> = names.iter().collect();
    assert_eq!(unique.len(), names.len());
}

#[test]
fn unknown_level_is_rejected() {
    assert_eq!("loud".parse::<TracingLevel>(), Err(()));
    assert_eq!("warning".parse::<TracingLevel>(), Ok(TracingLevel::Warn));
}
