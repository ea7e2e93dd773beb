//! Interceptor rule definitions

use crate::config::params;
use crate::types::ids::CommonEventId;
use serde::{Deserialize, Serialize};

/// Classification value that opts an event out of untagged rules
pub const NONE_EVENT_TYPE: &str = "none";

/// When an interceptor runs relative to the event's own instructions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Timing {
    /// Before the first instruction of the event
    #[default]
    Start,
    /// After the last instruction of the event's top-level list
    Finish,
}

impl std::fmt::Display for Timing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timing::Start => write!(f, "start"),
            Timing::Finish => write!(f, "finish"),
        }
    }
}

/// One entry of the ordered interceptor list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InterceptorRule {
    /// Label for humans, no runtime effect
    #[serde(default, deserialize_with = "params::string")]
    pub id: String,
    /// Required classification; `None` matches every event not tagged `none`
    #[serde(default, deserialize_with = "params::optional_string")]
    pub tag_value: Option<String>,
    #[serde(default)]
    pub timing: Timing,
    /// 1-based page number, `0` for any page
    #[serde(default, deserialize_with = "params::number")]
    pub page_index: u32,
    /// Never intercept events driven by a parallel interpreter
    #[serde(default, deserialize_with = "params::boolean")]
    pub invalid_parallel: bool,
    #[serde(
        default = "default_common_event_id",
        deserialize_with = "params::common_event_id"
    )]
    pub common_event_id: CommonEventId,
}

fn default_common_event_id() -> CommonEventId {
    CommonEventId::new(1)
}

impl InterceptorRule {
    /// Create a rule matching any page, tag and interpreter
    pub fn new(timing: Timing, common_event_id: impl Into<CommonEventId>) -> Self {
        Self {
            id: String::new(),
            tag_value: None,
            timing,
            page_index: 0,
            invalid_parallel: false,
            common_event_id: common_event_id.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Require an exact classification; an empty value means untagged
    pub fn with_tag(mut self, tag_value: impl Into<String>) -> Self {
        let tag_value = tag_value.into();
        self.tag_value = (!tag_value.is_empty()).then_some(tag_value);
        self
    }

    pub fn on_page(mut self, page_number: u32) -> Self {
        self.page_index = page_number;
        self
    }

    pub fn skip_parallel(mut self) -> Self {
        self.invalid_parallel = true;
        self
    }

    /// Display name used in logs and lint messages
    pub fn label(&self, index: usize) -> String {
        if self.id.is_empty() {
            format!("#{}", index + 1)
        } else {
            format!("#{} ({})", index + 1, self.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_normalises_empty_tag() {
        let rule = InterceptorRule::new(Timing::Start, 1).with_tag("");
        assert_eq!(rule.tag_value, None);

        let rule = rule.with_tag("aaa");
        assert_eq!(rule.tag_value.as_deref(), Some("aaa"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let rule: InterceptorRule = serde_json::from_str("{}").unwrap();
        assert_eq!(rule, InterceptorRule::new(Timing::Start, 1));
    }

    #[test]
    fn label_includes_id_when_present() {
        let rule = InterceptorRule::new(Timing::Finish, 2);
        assert_eq!(rule.label(0), "#1");
        assert_eq!(rule.with_id("door").label(2), "#3 (door)");
    }
}
