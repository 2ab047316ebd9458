//! Tools launcher catalog.

use serde::{Deserialize, Serialize};

/// Id of the check-in tracker tool.
pub const CHECK_IN_TOOL_ID: &str = "check_in";

/// One entry on the launcher screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolItem {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
}

/// Tools shipped with the app, in launcher order.
pub fn builtin_tools() -> Vec<ToolItem> {
    vec![ToolItem {
        id: CHECK_IN_TOOL_ID.to_string(),
        name: "Check-in".to_string(),
        icon: "ic_check_in".to_string(),
        description: "Track daily habits and view them on a calendar".to_string(),
    }]
}

/// Looks up one builtin tool by id.
pub fn find_tool(id: &str) -> Option<ToolItem> {
    builtin_tools().into_iter().find(|tool| tool.id == id.trim())
}

#[cfg(test)]
mod tests {
    use super::{builtin_tools, find_tool, CHECK_IN_TOOL_ID};

    #[test]
    fn catalog_contains_check_in() {
        let tools = builtin_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].id, CHECK_IN_TOOL_ID);
        assert!(find_tool(" check_in ").is_some());
        assert!(find_tool("calculator").is_none());
    }
}
