//! Member completion for `Terrasoft.<Enum>.`

use serde::Serialize;

use crate::data::terrasoft::COMPLETION_ENUMS;
use crate::data::EnumDef;

const NAMESPACE: &str = "Terrasoft";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionItem {
    pub label: String,
    /// Numeric value, shown as detail
    pub value: i64,
    pub enum_name: &'static str,
}

/// Members of `def` when `line_prefix` ends with `Terrasoft.<def.name>.`
pub fn enum_completions(def: &EnumDef, line_prefix: &str) -> Vec<CompletionItem> {
    let trigger = format!("{}.{}.", NAMESPACE, def.name);
    if !line_prefix.ends_with(&trigger) {
        return Vec::new();
    }
    def.members
        .iter()
        .map(|(name, value)| CompletionItem {
            label: name.to_string(),
            value: *value,
            enum_name: def.name,
        })
        .collect()
}

/// Completions for the text left of the cursor
pub fn completion_items(line_prefix: &str) -> Vec<CompletionItem> {
    COMPLETION_ENUMS
        .iter()
        .flat_map(|def| enum_completions(def, line_prefix))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::terrasoft::{DATA_VALUE_TYPE, LOGICAL_OPERATOR_TYPE};

    #[test]
    fn test_data_value_type_members() {
        let items = completion_items("    dataValueType: Terrasoft.DataValueType.");
        assert_eq!(items.len(), DATA_VALUE_TYPE.members.len());
        assert_eq!(items[0].label, "GUID");
        assert!(items.iter().any(|i| i.label == "BOOLEAN" && i.value == 12));
    }

    #[test]
    fn test_view_item_type_members() {
        let items = completion_items("itemType: Terrasoft.ViewItemType.");
        assert!(items.iter().all(|i| i.enum_name == "ViewItemType"));
        assert!(items.iter().any(|i| i.label == "BUTTON"));
    }

    #[test]
    fn test_no_trigger() {
        assert!(completion_items("Terrasoft.DataValueType").is_empty());
        assert!(completion_items("Terrasoft.DataValueType.TE").is_empty());
        assert!(completion_items("").is_empty());
    }

    #[test]
    fn test_enum_outside_completion_set() {
        assert!(completion_items("Terrasoft.LogicalOperatorType.").is_empty());
        assert_eq!(
            enum_completions(&LOGICAL_OPERATOR_TYPE, "Terrasoft.LogicalOperatorType.").len(),
            2
        );
    }
}
