use geoattend::models::Coordinate;
use geoattend::transport::Update;
use geoattend::transport::telegram::{RawUpdate, parse_command};
use serde_json::json;

fn parse(v: serde_json::Value) -> Option<Update> {
    serde_json::from_value::<RawUpdate>(v).unwrap().into_update()
}

#[test]
fn test_parse_command_variants() {
    assert_eq!(parse_command("/checkin").as_deref(), Some("checkin"));
    assert_eq!(parse_command("/CheckOut@attend_bot").as_deref(), Some("checkout"));
    assert_eq!(parse_command("  /records please").as_deref(), Some("records"));
    assert_eq!(parse_command("hello"), None);
    assert_eq!(parse_command("/"), None);
}

#[test]
fn test_command_message() {
    let update = parse(json!({
        "update_id": 1,
        "message": {
            "message_id": 10,
            "from": { "id": 42, "first_name": "Ali", "is_bot": false },
            "chat": { "id": 42, "type": "private" },
            "date": 1714550000,
            "text": "/checkin"
        }
    }));

    match update {
        Some(Update::Command { chat_id, user, name }) => {
            assert_eq!(chat_id, 42);
            assert_eq!(user.first_name, "Ali");
            assert_eq!(name, "checkin");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_live_and_forwarded_locations() {
    let live = parse(json!({
        "update_id": 2,
        "message": {
            "message_id": 11,
            "from": { "id": 42, "first_name": "Ali" },
            "chat": { "id": 42 },
            "location": { "latitude": 33.3114, "longitude": 44.3307 }
        }
    }));
    assert_eq!(
        live,
        Some(Update::Location {
            chat_id: 42,
            user: geoattend::transport::User {
                id: 42,
                first_name: "Ali".into()
            },
            coordinate: Coordinate::new(33.3114, 44.3307),
            forwarded: false,
        })
    );

    let legacy_forward = parse(json!({
        "update_id": 3,
        "message": {
            "message_id": 12,
            "from": { "id": 42, "first_name": "Ali" },
            "chat": { "id": 42 },
            "forward_date": 1714000000,
            "location": { "latitude": 33.3114, "longitude": 44.3307 }
        }
    }));
    assert!(matches!(legacy_forward, Some(Update::Location { forwarded: true, .. })));

    let origin_forward = parse(json!({
        "update_id": 4,
        "message": {
            "message_id": 13,
            "from": { "id": 42, "first_name": "Ali" },
            "chat": { "id": 42 },
            "forward_origin": { "type": "user", "date": 1714000000 },
            "location": { "latitude": 33.3114, "longitude": 44.3307 }
        }
    }));
    assert!(matches!(origin_forward, Some(Update::Location { forwarded: true, .. })));
}

#[test]
fn test_callback_query() {
    let update = parse(json!({
        "update_id": 5,
        "callback_query": {
            "id": "abc",
            "from": { "id": 7, "first_name": "Boss" },
            "message": { "message_id": 99, "chat": { "id": 7 } },
            "data": "2"
        }
    }));

    assert_eq!(
        update,
        Some(Update::Callback {
            chat_id: 7,
            user: geoattend::transport::User {
                id: 7,
                first_name: "Boss".into()
            },
            callback_id: "abc".into(),
            message_id: Some(99),
            data: "2".into(),
        })
    );
}

#[test]
fn test_plain_text_and_other_updates_are_ignored() {
    assert!(
        parse(json!({
            "update_id": 6,
            "message": {
                "message_id": 14,
                "from": { "id": 42, "first_name": "Ali" },
                "chat": { "id": 42 },
                "text": "good morning"
            }
        }))
        .is_none()
    );
    assert!(parse(json!({ "update_id": 7, "edited_message": {} })).is_none());
}
