use globochat_core::*;
use serde_json::{self as json, Value};

fn parse(json_str: &str) -> Value {
    json::from_str(json_str).expect("valid json")
}

/*
    Goal: a ClientEvent::Message must serialize flat, with "type": "message"
    next to the fields (no payload envelope), and the same JSON must
    deserialize back into the same Rust value.
*/
#[test]
fn client_message_event_roundtrip() {
    let ev = ClientEvent::Message {
        username: "Ana".to_string(),
        message: "oi".to_string(),
    };

    let s = json::to_string(&ev).expect("serialize");
    let v = parse(&s);

    assert_eq!(v["type"], "message");
    assert_eq!(v["username"], "Ana");
    assert_eq!(v["message"], "oi");
    assert!(v.get("payload").is_none(), "events are flat, no envelope");

    let back: ClientEvent = json::from_str(&s).expect("deserialize");
    assert_eq!(back, ev);
}

/*
    Goal: a ClientEvent::Typing must carry the flag under the exact wire
    name "is_typing" as a JSON boolean.
*/
#[test]
fn client_typing_event_uses_is_typing_field() {
    let ev = ClientEvent::Typing {
        username: "Ana".to_string(),
        is_typing: true,
    };

    let s = json::to_string(&ev).expect("serialize");
    let v = parse(&s);

    assert_eq!(v["type"], "typing");
    assert_eq!(v["username"], "Ana");
    assert_eq!(v["is_typing"], true);

    let back: ClientEvent = json::from_str(&s).expect("deserialize");
    assert_eq!(back, ev);
}

/*
    Goal: a ServerEvent::Message must flatten the ChatMessage fields next to
    the "type" discriminant, matching what the browser client read:
    {type, id, username, message, timestamp}.
*/
#[test]
fn server_message_event_flattens_chat_message() {
    let m = ChatMessage {
        id: "33333333-3333-4333-8333-333333333333".to_string(),
        username: "Ana".to_string(),
        message: "oi".to_string(),
        timestamp: "2025-11-02T10:20:35Z".to_string(),
    };
    let ev = ServerEvent::Message(m.clone());

    let s = json::to_string(&ev).expect("serialize");
    let v = parse(&s);

    assert_eq!(v["type"], "message");
    assert_eq!(v["id"], m.id);
    assert_eq!(v["username"], m.username);
    assert_eq!(v["message"], m.message);
    assert_eq!(v["timestamp"], m.timestamp);

    let back: ServerEvent = json::from_str(&s).expect("deserialize");
    match back {
        ServerEvent::Message(m_back) => assert_eq!(m_back, m),
        _ => panic!("expected Message"),
    }
}

/*
    Goal: a ServerEvent::Error carries a single user-facing "message" field.
*/
#[test]
fn server_error_event_roundtrip() {
    let ev = ServerEvent::Error {
        message: "name must be at least 2 characters".to_string(),
    };

    let s = json::to_string(&ev).expect("serialize");
    let v = parse(&s);

    assert_eq!(v["type"], "error");
    assert_eq!(v["message"], "name must be at least 2 characters");

    let back: ServerEvent = json::from_str(&s).expect("deserialize");
    assert_eq!(back, ev);
}

/*
    Goal: inbound frames written by hand (as the browser client produced
    them) must parse into the right variants.
*/
#[test]
fn raw_browser_frames_parse() {
    let msg: ClientEvent =
        json::from_str(r#"{"type":"message","username":"Ana","message":"oi"}"#)
            .expect("message frame");
    assert_eq!(
        msg,
        ClientEvent::Message { username: "Ana".into(), message: "oi".into() }
    );

    let typing: ClientEvent =
        json::from_str(r#"{"type":"typing","username":"Ana","is_typing":false}"#)
            .expect("typing frame");
    assert_eq!(
        typing,
        ClientEvent::Typing { username: "Ana".into(), is_typing: false }
    );

    // unknown discriminant must fail, not silently match a variant
    assert!(json::from_str::<ClientEvent>(r#"{"type":"presence","username":"Ana"}"#).is_err());
}

/*
    Goal: HistoryParams defaults limit to 100 when the query string omits it,
    and effective_limit clamps the extremes.
*/
#[test]
fn history_params_default_and_clamp() {
    let p: HistoryParams = json::from_str("{}").expect("empty params");
    assert_eq!(p.limit, DEFAULT_HISTORY_LIMIT);
    assert_eq!(p.effective_limit(), DEFAULT_HISTORY_LIMIT);

    let p: HistoryParams = json::from_str(r#"{"limit":0}"#).expect("zero");
    assert_eq!(p.effective_limit(), 1);

    let p: HistoryParams = json::from_str(r#"{"limit":100000}"#).expect("huge");
    assert_eq!(p.effective_limit(), MAX_HISTORY_LIMIT);
}
