pub mod types;
pub mod observability;

pub mod utils {
    pub mod logging;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn status_message_serializes_flag_and_message() {
        let body = serde_json::to_value(types::StatusMessage::denied("Access Denied")).unwrap();
        assert_eq!(body, serde_json::json!({"status": false, "message": "Access Denied"}));
    }
}
