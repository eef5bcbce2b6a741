use schema_annotator::{Message, Role};

#[test]
fn test_message_constructor() {
    let user = Message::user("Hello");
    assert!(matches!(user.role, Role::User));
    assert_eq!(user.content, "Hello");
}

#[test]
fn test_message_wire_format() {
    let json = serde_json::to_value(Message::user("which property?")).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"role": "user", "content": "which property?"})
    );
}

