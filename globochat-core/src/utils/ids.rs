use uuid::Uuid;

/// Generates a fresh message id (UUIDv4) as a string.
pub fn new_message_id() -> String {
    Uuid::new_v4().to_string()
}
