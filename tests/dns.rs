use pretty_assertions::assert_eq;
use serde::Deserialize;
use std::fs;
use std::time::Duration;
use stubdns::{Entry, Error, Response};

const TEST_DATA_FILENAME: &str = "tests/test_data.yaml";

#[derive(Deserialize)]
struct TestCase {
    // Name of the test case.
    name: String,

    // Hex encoded reply.
    binary: String,

    // The entries the reply should decode to.
    #[serde(default)]
    entries: Vec<TestEntry>,

    // Or, the kind of error parsing should fail with.
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct TestEntry {
    domain: String,
    ip: String,
    ttl: u64,
}

fn error_kind(e: &Error) -> &'static str {
    match e {
        Error::InvalidName(_) => "InvalidName",
        Error::BufferTooSmall { .. } => "BufferTooSmall",
        Error::MalformedName(_) => "MalformedName",
        Error::TruncatedMessage(_) => "TruncatedMessage",
        Error::Timeout => "Timeout",
        Error::TransportFailure(_) => "TransportFailure",
        Error::ResponseCode(_) => "ResponseCode",
        Error::MismatchedId { .. } => "MismatchedId",
    }
}

#[test]
fn tests() {
    let _ = env_logger::builder().is_test(true).try_init();

    let s = fs::read(TEST_DATA_FILENAME).expect("failed read test input");
    let tests: Vec<TestCase> =
        serde_yaml::from_slice(&s).expect("failed to deserialise test input");

    assert!(!tests.is_empty(), "no test cases in {}", TEST_DATA_FILENAME);

    for case in tests {
        test_from_slice(case);
    }
}

fn test_from_slice(case: TestCase) {
    let input = match hex::decode(&case.binary) {
        Err(e) => panic!("{}: Invalid test case input: {}", case.name, e),
        Ok(i) => i,
    };

    let result = Response::from_slice(&input);

    if let Some(want) = case.error {
        match result {
            Err(e) => assert_eq!(error_kind(&e), want, "{}: wrong error: {}", case.name, e),
            Ok(m) => panic!("{}: parsed, but wanted {}:\n{}", case.name, want, m),
        }
        return;
    }

    let m = match result {
        Err(e) => panic!("{}: Unable to parse: {}", case.name, e),
        Ok(m) => m,
    };

    let want: Vec<Entry> = case
        .entries
        .iter()
        .map(|e| Entry {
            domain: e.domain.clone(),
            ip: e.ip.parse().expect("invalid test ip"),
            ttl: Duration::from_secs(e.ttl),
        })
        .collect();

    assert_eq!(m.entries(), want, "{}: entries don't match", case.name);

    // Parsing is a pure function of the input.
    let again = Response::from_slice(&input).expect("second parse failed");
    assert_eq!(again, m, "{}: second parse differs", case.name);
}
