//! Platform enumerations recognized by the annotator and completion
//!
//! Values mirror the client-side `Terrasoft` namespace and the business rule
//! enumerations of the page designer.

/// Shown wherever a value cannot be resolved (missing identifier, unknown enum value, ...)
pub const UNKNOWN_PLACEHOLDER: &str = "¯\\_(ツ)_/¯";

/// A named enumeration: `(member, value)` pairs in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumDef {
    pub name: &'static str,
    pub members: &'static [(&'static str, i64)],
}

impl EnumDef {
    /// Member name for a value; first declared member wins on duplicates
    pub fn name_of(&self, value: i64) -> Option<&'static str> {
        self.members
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(name, _)| *name)
    }

    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.members
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    pub fn member_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.members.iter().map(|(name, _)| *name)
    }
}

pub mod terrasoft {
    use super::EnumDef;

    pub const DATA_VALUE_TYPE: EnumDef = EnumDef {
        name: "DataValueType",
        members: &[
            ("GUID", 0),
            ("TEXT", 1),
            ("INTEGER", 4),
            ("FLOAT", 5),
            ("MONEY", 6),
            ("DATE_TIME", 7),
            ("DATE", 8),
            ("TIME", 9),
            ("LOOKUP", 10),
            ("ENUM", 11),
            ("BOOLEAN", 12),
            ("BLOB", 13),
            ("IMAGE", 14),
            ("CUSTOM_OBJECT", 15),
            ("IMAGELOOKUP", 16),
            ("COLLECTION", 17),
            ("COLOR", 18),
            ("LOCALIZABLE_STRING", 19),
            ("ENTITY", 20),
            ("ENTITY_COLLECTION", 21),
            ("ENTITY_COLUMN_MAPPING_COLLECTION", 22),
            ("HASH_TEXT", 23),
            ("SECURE_TEXT", 24),
            ("FILE", 25),
            ("MAPPING", 26),
            ("SHORT_TEXT", 27),
            ("MEDIUM_TEXT", 28),
            ("MAXSIZE_TEXT", 29),
            ("LONG_TEXT", 30),
            ("FLOAT1", 31),
            ("FLOAT2", 32),
            ("FLOAT3", 33),
            ("FLOAT4", 34),
            ("LOCALIZABLE_PARAMETER_VALUES_LIST", 35),
            ("METADATA_TEXT", 36),
            ("STAGE_INDICATOR", 37),
            ("OBJECT_LIST", 38),
            ("COMPOSITE_OBJECT_LIST", 39),
            ("FLOAT8", 40),
        ],
    };

    pub const COMPARISON_TYPE: EnumDef = EnumDef {
        name: "ComparisonType",
        members: &[
            ("BETWEEN", 0),
            ("IS_NULL", 1),
            ("IS_NOT_NULL", 2),
            ("EQUAL", 3),
            ("NOT_EQUAL", 4),
            ("LESS", 5),
            ("LESS_OR_EQUAL", 6),
            ("GREATER", 7),
            ("GREATER_OR_EQUAL", 8),
            ("START_WITH", 9),
            ("NOT_START_WITH", 10),
            ("CONTAIN", 11),
            ("NOT_CONTAIN", 12),
            ("END_WITH", 13),
            ("NOT_END_WITH", 14),
            ("EXISTS", 15),
            ("NOT_EXISTS", 16),
        ],
    };

    pub const VIEW_ITEM_TYPE: EnumDef = EnumDef {
        name: "ViewItemType",
        members: &[
            ("GRID_LAYOUT", 0),
            ("TAB_PANEL", 1),
            ("DETAIL", 2),
            ("MODEL_ITEM", 3),
            ("MODULE", 4),
            ("BUTTON", 5),
            ("LABEL", 6),
            ("CONTAINER", 7),
            ("MENU", 8),
            ("MENU_ITEM", 9),
            ("MENU_SEPARATOR", 10),
            ("SECTION_VIEWS", 11),
            ("SECTION_VIEW", 12),
            ("GRID", 13),
            ("SCHEDULE_EDIT", 14),
            ("CONTROL_GROUP", 15),
            ("RADIO_GROUP", 16),
            ("DESIGN_VIEW", 17),
            ("COLOR_BUTTON", 18),
            ("IMAGE_TAB_PANEL", 19),
            ("HYPERLINK", 20),
            ("INFORMATION_BUTTON", 21),
            ("TIP", 22),
            ("COMPONENT", 23),
            ("TIP_LABEL", 24),
            ("PROGRESS_BAR", 30),
            ("GRID_LAYOUT_EDIT", 31),
            ("IFRAMECONTROL", 32),
            ("EXTERNAL_WIDGET", 33),
        ],
    };

    pub const VIEW_MODEL_COLUMN_TYPE: EnumDef = EnumDef {
        name: "ViewModelColumnType",
        members: &[
            ("ENTITY_COLUMN", 0),
            ("CALCULATED_COLUMN", 1),
            ("VIRTUAL_COLUMN", 2),
            ("RESOURCE_COLUMN", 3),
        ],
    };

    pub const CONTENT_TYPE: EnumDef = EnumDef {
        name: "ContentType",
        members: &[
            ("LONG_TEXT", 0),
            ("SHORT_TEXT", 1),
            ("DATE_TIME", 2),
            ("ENUM", 3),
            ("RICH_TEXT", 4),
            ("LOOKUP", 5),
            ("SEARCHABLE_TEXT", 6),
        ],
    };

    pub const LOGICAL_OPERATOR_TYPE: EnumDef = EnumDef {
        name: "LogicalOperatorType",
        members: &[("AND", 0), ("OR", 1)],
    };

    /// Enumerations offered by `Terrasoft.<Name>.` completion
    pub const COMPLETION_ENUMS: &[EnumDef] = &[
        DATA_VALUE_TYPE,
        COMPARISON_TYPE,
        VIEW_ITEM_TYPE,
        VIEW_MODEL_COLUMN_TYPE,
    ];
}

pub mod business_rule {
    use super::EnumDef;

    pub const PROPERTY: EnumDef = EnumDef {
        name: "Property",
        members: &[("VISIBLE", 0), ("ENABLED", 1), ("REQUIRED", 2), ("READONLY", 3)],
    };

    pub const RULE_TYPE: EnumDef = EnumDef {
        name: "RuleType",
        members: &[
            ("DISABLED", -1),
            ("BINDPARAMETER", 0),
            ("FILTRATION", 1),
            ("AUTOCOMPLETE", 2),
            ("POPULATE_ATTRIBUTE", 3),
        ],
    };

    pub const VALUE_TYPE: EnumDef = EnumDef {
        name: "ValueType",
        members: &[
            ("CONSTANT", 0),
            ("ATTRIBUTE", 1),
            ("SYSSETTING", 2),
            ("SYSVALUE", 3),
            ("CARDSTATE", 4),
            ("PARAMETER", 5),
        ],
    };
}
