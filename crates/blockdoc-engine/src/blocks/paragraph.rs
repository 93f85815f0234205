use serde_json::json;

use crate::blocks::BlockDefinition;
use crate::editing::BlockData;
use crate::selection::is_blank;

pub const KIND: &str = "paragraph";

/// The default block kind: a single editable text payload, `{ text }`.
pub struct ParagraphDefinition;

impl BlockDefinition for ParagraphDefinition {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn default_value(&self) -> BlockData {
        let mut data = BlockData::new();
        data.insert("text".to_string(), json!(""));
        data
    }

    fn is_empty(&self, data: &BlockData) -> bool {
        data.get("text")
            .and_then(|v| v.as_str())
            .is_none_or(is_blank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paragraph_is_empty() {
        let def = ParagraphDefinition;
        assert!(def.is_empty(&def.default_value()));
    }

    #[test]
    fn emptiness_sees_through_markup() {
        let def = ParagraphDefinition;
        let mut data = BlockData::new();
        data.insert("text".to_string(), json!("<b>&nbsp;</b>"));
        assert!(def.is_empty(&data));

        data.insert("text".to_string(), json!("<b>x</b>"));
        assert!(!def.is_empty(&data));
    }
}
