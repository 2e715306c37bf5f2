//! End-to-end tests for the submission handler.

use formrelay_core::web::{ExtractSubmission, FormSubmission, Relay, Reply};
use formrelay_core::{PlaintextOnly, RelayConfig, TransportErrorKind, VecTransport};

const CONFIG: &str = r#"
    key = "relay-key"
    subject = "New form submission"

    [sender]
    display_name = "Contact form"
    locator = "arn:aws:ses:eu-west-1:123456789012:identity/forms@example.com"
"#;

fn config() -> RelayConfig {
    RelayConfig::from_toml(CONFIG).unwrap()
}

fn config_with(top_level: &str) -> RelayConfig {
    let document = CONFIG.replacen("[sender]", &format!("{top_level}\n[sender]"), 1);
    RelayConfig::from_toml(&document).unwrap()
}

fn json(body: &str) -> FormSubmission {
    FormSubmission::new(body)
        .with_query("format=json")
        .with_source_origin("203.0.113.7")
}

fn json_body(reply: &Reply) -> serde_json::Value {
    assert_eq!(reply.content_type, "application/json");
    serde_json::from_str(&reply.body).unwrap()
}

#[test]
fn delivers_valid_submission() {
    let transport = VecTransport::new();
    let relay = Relay::new(config(), PlaintextOnly, &transport);

    let reply = relay.handle(&json("name=Jo&_to=owner%40example.com"));

    assert_eq!(reply.status, 200);
    assert_eq!(json_body(&reply)["success"], true);
    transport.with_sent(|sent| {
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].sender(), "Contact form <forms@example.com>");
        assert_eq!(sent[0].subject(), "New form submission");
        assert_eq!(sent[0].body(), "NAME: Jo\r\n");
        assert_eq!(sent[0].destination().to, vec!["owner@example.com"]);
    });
}

#[test]
fn honeypot_is_forbidden() {
    let transport = VecTransport::new();
    let relay = Relay::new(config(), PlaintextOnly, &transport);

    let reply = relay.handle(&json("name=Jo&_to=owner%40example.com&_honeypot=cheap+pills"));

    assert_eq!(reply.status, 403);
    assert_eq!(json_body(&reply)["success"], false);
    assert!(transport.is_empty());
}

#[test]
fn missing_recipient_is_unprocessable() {
    let transport = VecTransport::new();
    let relay = Relay::new(config(), PlaintextOnly, &transport);

    let reply = relay.handle(&json("name=Jo&_to="));

    assert_eq!(reply.status, 422);
    assert_eq!(json_body(&reply)["message"], "Invalid '_to' recipient");
    assert!(transport.is_empty());
}

#[test]
fn non_whitelisted_recipient_is_unprocessable() {
    let transport = VecTransport::new();
    let relay = Relay::new(
        config_with(r#"whitelist = ["owner@example.com"]"#),
        PlaintextOnly,
        &transport,
    );

    let reply = relay.handle(&json("name=Jo&_to=someone%40example.com"));
    assert_eq!(reply.status, 422);
    assert_eq!(
        json_body(&reply)["message"],
        "Non-whitelisted '_to' recipient"
    );

    let reply = relay.handle(&json("name=Jo&_to=owner%40example.com"));
    assert_eq!(reply.status, 200);
    assert_eq!(transport.len(), 1);
}

#[test]
fn reserved_only_submission_is_unprocessable() {
    let transport = VecTransport::new();
    let relay = Relay::new(config(), PlaintextOnly, &transport);

    let reply = relay.handle(&json("_to=owner%40example.com&_subject=hi"));

    assert_eq!(reply.status, 422);
    assert_eq!(
        json_body(&reply)["message"],
        "Expected at least one custom field"
    );
}

#[test]
fn bad_redirect_is_unprocessable() {
    let transport = VecTransport::new();
    let relay = Relay::new(config(), PlaintextOnly, &transport);

    let reply = relay.handle(&json("name=Jo&_to=owner%40example.com&_redirect=javascript%3Aalert(1)"));

    assert_eq!(reply.status, 422);
    assert_eq!(
        json_body(&reply)["message"],
        "Invalid website URL in '_redirect'"
    );
}

#[test]
fn redirect_with_line_break_is_not_followed() {
    let transport = VecTransport::new();
    let relay = Relay::new(config(), PlaintextOnly, &transport);

    let reply = relay.handle(&json(
        "name=Jo&_to=owner%40example.com&_redirect=https%3A%2F%2Fexample.com%2F%0D%0ASet-Cookie%3A%20x%3D1",
    ));

    assert_eq!(reply.status, 422);
    assert_eq!(reply.location, None);
    assert_eq!(
        json_body(&reply)["message"],
        "Invalid website URL in '_redirect'"
    );
    assert!(transport.is_empty());
}

#[test]
fn redirect_is_followed_after_delivery() {
    let transport = VecTransport::new();
    let relay = Relay::new(config(), PlaintextOnly, &transport);

    let reply = relay.handle(&json(
        "name=Jo&_to=owner%40example.com&_redirect=https%3A%2F%2Fexample.com%2Fthanks",
    ));

    assert_eq!(reply.status, 303);
    assert_eq!(reply.location.as_deref(), Some("https://example.com/thanks"));
    assert_eq!(transport.len(), 1);
}

#[test]
fn html_is_the_default_format() {
    let transport = VecTransport::new();
    let relay = Relay::new(config(), PlaintextOnly, &transport);

    let submission = FormSubmission::new("name=Jo&_to=owner%40example.com")
        .with_source_origin("203.0.113.7");
    let reply = relay.handle(&submission);

    assert_eq!(reply.status, 200);
    assert!(reply.content_type.starts_with("text/html"));
    assert!(reply.body.contains("Message sent"));
}

#[test]
fn unrecognized_format_is_unprocessable_html() {
    let transport = VecTransport::new();
    let relay = Relay::new(config(), PlaintextOnly, &transport);

    let submission = FormSubmission::new("name=Jo&_to=owner%40example.com")
        .with_query("format=xml")
        .with_source_origin("203.0.113.7");
    let reply = relay.handle(&submission);

    assert_eq!(reply.status, 422);
    assert!(reply.content_type.starts_with("text/html"));
    assert!(transport.is_empty());
}

#[test]
fn missing_origin_is_an_internal_error() {
    let transport = VecTransport::new();
    let relay = Relay::new(config(), PlaintextOnly, &transport);

    let submission = FormSubmission::new("name=Jo&_to=owner%40example.com").with_query("format=json");
    let reply = relay.handle(&submission);

    assert_eq!(reply.status, 500);
    assert_eq!(json_body(&reply)["message"], "Internal error");
    assert!(transport.is_empty());
}

#[test]
fn transport_failure_is_bad_gateway() {
    let transport = VecTransport::failing(TransportErrorKind::Io);
    let relay = Relay::new(config(), PlaintextOnly, &transport);

    let reply = relay.handle(&json("name=Jo&_to=owner%40example.com"));

    assert_eq!(reply.status, 502);
    assert_eq!(json_body(&reply)["success"], false);
}

#[test]
fn configured_reply_to_replaces_form_value() {
    let transport = VecTransport::new();
    let relay = Relay::new(
        config_with(r#"reply_to = "desk@example.com""#),
        PlaintextOnly,
        &transport,
    );

    let reply = relay.handle(&json(
        "name=Jo&_to=owner%40example.com&_replyTo=visitor%40example.org",
    ));

    assert_eq!(reply.status, 200);
    transport.with_sent(|sent| {
        assert_eq!(sent[0].reply_to(), ["desk@example.com".to_string()]);
    });
}

#[test]
fn form_reply_to_used_without_override() {
    let transport = VecTransport::new();
    let relay = Relay::new(config(), PlaintextOnly, &transport);

    relay.handle(&json(
        "name=Jo&_to=owner%40example.com&_replyTo=visitor%40example.org",
    ));

    transport.with_sent(|sent| {
        assert_eq!(sent[0].reply_to(), ["visitor@example.org".to_string()]);
    });
}

struct GatewayEvent {
    body: String,
    query: String,
    source_ip: Option<String>,
}

impl ExtractSubmission for GatewayEvent {
    fn extract_submission(&self) -> FormSubmission {
        let submission = FormSubmission::new(self.body.clone()).with_query(self.query.clone());
        match &self.source_ip {
            Some(ip) => submission.with_source_origin(ip.clone()),
            None => submission,
        }
    }
}

#[test]
fn host_event_extraction_flow() {
    let transport = VecTransport::new();
    let relay = Relay::new(config(), PlaintextOnly, &transport);
    let event = GatewayEvent {
        body: "message=Hello&_to=owner%40example.com&_cc=a%40x.com%3Bb%40x.com".to_string(),
        query: "format=json".to_string(),
        source_ip: Some("198.51.100.4".to_string()),
    };

    let reply = relay.handle(&event.extract_submission());

    assert_eq!(reply.status, 200);
    transport.with_sent(|sent| {
        assert_eq!(sent[0].destination().cc, vec!["a@x.com", "b@x.com"]);
        assert_eq!(sent[0].body(), "MESSAGE: Hello\r\n");
    });
}
