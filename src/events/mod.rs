mod bus;

pub use bus::EventBus;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    ProvidersLoaded { ids: Vec<String> },
    ErrorReported { message: String, omitted: bool },
    EntriesChanged { path: String, count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_snake_case_type() {
        let cases: Vec<(AppEvent, &str)> = vec![
            (AppEvent::ProvidersLoaded { ids: vec![] }, "providers_loaded"),
            (
                AppEvent::ErrorReported {
                    message: "boom".into(),
                    omitted: false,
                },
                "error_reported",
            ),
            (
                AppEvent::EntriesChanged {
                    path: "/tmp".into(),
                    count: 0,
                },
                "entries_changed",
            ),
        ];

        for (event, expected_type) in cases {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["type"], expected_type, "event type mismatch");
        }
    }

    #[test]
    fn providers_loaded_serializes_ids_in_order() {
        let event = AppEvent::ProvidersLoaded {
            ids: vec!["local".into(), "ssh".into()],
        };

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["ids"][0], "local");
        assert_eq!(json["ids"][1], "ssh");
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn error_reported_carries_severity() {
        let event = AppEvent::ErrorReported {
            message: "init failed".into(),
            omitted: true,
        };

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["message"], "init failed");
        assert_eq!(json["omitted"], true);
    }
}
