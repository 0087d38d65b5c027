use crate::backend::CommandResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    /// The backend found a stored command.
    Matched,
    /// The backend generated a new command script.
    Generated,
    /// Only an intent was parsed; executing will generate and run a command.
    Intent,
}

/// Shown in place of the action when the backend parsed an intent without one.
pub const UNKNOWN_ACTION: &str = "unknown";

/// A single row in the palette.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub title: String,
    pub description: String,
    pub kind: ResultKind,
    pub payload: CommandResponse,
}

/// Turn a search response into the row shown to the user.
///
/// The first matching rule wins: a matched command, then a generated script,
/// then the parsed intent. An intent without an action is still shown, as
/// `unknown`. Returns `None` when the response carries none of them.
pub fn classify(response: CommandResponse) -> Option<QueryResult> {
    let (title, description, kind) = if let Some(cmd) = response.matched_command() {
        (format!("▶ {cmd}"), "run existing command", ResultKind::Matched)
    } else if response.is_generated() {
        (
            "✨ new command generated".to_string(),
            "press enter to run",
            ResultKind::Generated,
        )
    } else if response.intent.is_some() {
        let action = response.intent_action().unwrap_or(UNKNOWN_ACTION);
        (
            format!("🤖 {action}"),
            "press enter to generate & run",
            ResultKind::Intent,
        )
    } else {
        return None;
    };
    Some(QueryResult {
        title,
        description: description.to_string(),
        kind,
        payload: response,
    })
}

/// Build the result list for one search response. The backend answers with
/// a single resolution, so the list is always a singleton.
pub fn results_from_response(response: CommandResponse) -> Option<Vec<QueryResult>> {
    classify(response).map(|r| vec![r])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(v: serde_json::Value) -> CommandResponse {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn matched_command_wins_over_generated() {
        let r = classify(response(json!({
            "matched_command": "ls",
            "generated": true,
            "intent": {"action": "list files"}
        })))
        .unwrap();
        assert_eq!(r.kind, ResultKind::Matched);
        assert!(r.title.contains("ls"));
        assert_eq!(r.description, "run existing command");
    }

    #[test]
    fn generated_false_falls_through_to_intent() {
        let r = classify(response(json!({
            "matched_command": null,
            "generated": false,
            "intent": {"action": "open browser", "target": "firefox"}
        })))
        .unwrap();
        assert_eq!(r.kind, ResultKind::Intent);
        assert!(r.title.contains("open browser"));
        assert_eq!(r.description, "press enter to generate & run");
    }

    #[test]
    fn empty_matched_command_is_absent() {
        let r = classify(response(json!({
            "matched_command": "",
            "generated": {"script": "x.sh"}
        })))
        .unwrap();
        assert_eq!(r.kind, ResultKind::Generated);
        assert_eq!(r.title, "✨ new command generated");
    }

    #[test]
    fn intent_without_action_is_still_an_intent_row() {
        let rows = results_from_response(response(json!({
            "intent": {"query": "play something"},
            "generated": false
        })))
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, ResultKind::Intent);
        assert_eq!(rows[0].title, "🤖 unknown");
        assert_eq!(rows[0].description, "press enter to generate & run");
    }

    #[test]
    fn response_without_any_resolution_is_rejected() {
        assert!(classify(response(json!({"executed": false}))).is_none());
        assert!(results_from_response(response(json!({"intent": null}))).is_none());
        assert!(results_from_response(response(json!({"generated": false}))).is_none());
    }
}
