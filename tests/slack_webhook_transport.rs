mod common;

use common::{env, slack_options};
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;
use winston_env::format::LogInfo;
use winston_env::transports::{SlackWebhookTransport, Transport};
use winston_env::{build_transports, TransportFactory, DEFAULT_SLACK_ICON_URL, SLACK_LOGGER_WEBHOOK};

#[test]
fn test_error_is_posted_to_webhook() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/hook")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "text": "error: payment failed",
            "username": "Logger",
            "icon_url": DEFAULT_SLACK_ICON_URL,
            "channel": "#alerts",
        })))
        .with_status(200)
        .expect(1)
        .create();

    let transport =
        SlackWebhookTransport::new(slack_options(format!("{}/hook", server.url()), Some("#alerts")))
            .unwrap();

    transport.log(LogInfo::new("error", "payment failed"));

    mock.assert();
}

#[test]
fn test_events_below_error_are_ignored() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", Matcher::Any).expect(0).create();

    let transport =
        SlackWebhookTransport::new(slack_options(format!("{}/hook", server.url()), None)).unwrap();

    for level in ["warn", "info", "debug", "trace"] {
        transport.log(LogInfo::new(level, "not worth a page"));
    }

    mock.assert();
}

#[test]
fn test_failed_post_does_not_panic() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/hook")
        .with_status(404)
        .with_body("no_service")
        .expect(1)
        .create();

    let transport = SlackWebhookTransport::builder(slack_options(
        format!("{}/hook", server.url()),
        None,
    ))
    .timeout(Duration::from_secs(2))
    .build()
    .unwrap();

    transport.log(LogInfo::new("error", "still fine"));
    assert!(transport.flush().is_ok());

    mock.assert();
}

#[test]
fn test_build_transports_from_env() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/hook")
        .match_body(Matcher::PartialJson(json!({ "text": "error: from env" })))
        .with_status(200)
        .expect(1)
        .create();

    let webhook = format!("{}/hook", server.url());
    let factory = TransportFactory::new(env(&[(SLACK_LOGGER_WEBHOOK, webhook.as_str())]));

    let transports = build_transports(&factory).unwrap();
    assert_eq!(transports.len(), 2);
    assert_eq!(transports[0].0, "info");
    assert_eq!(transports[1].0, "error");

    transports[1].1.log(LogInfo::new("error", "from env"));

    mock.assert();
}

#[test]
fn test_build_transports_without_webhook() {
    let factory = TransportFactory::new(env(&[]));

    let transports = build_transports(&factory).unwrap();
    assert_eq!(transports.len(), 1);
}
