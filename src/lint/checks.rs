//! Individual rule table checks

use super::{LintIssue, LintLevel, LintResult};
use crate::config::InterceptorConfig;
use crate::types::{
    data::Database,
    rule::{InterceptorRule, NONE_EVENT_TYPE},
};

/// Rules pointing at no common event, or one the database lacks
pub fn check_references(
    config: &InterceptorConfig,
    database: Option<&Database>,
    result: &mut LintResult,
) {
    for (index, rule) in config.interceptor_list.iter().enumerate() {
        if rule.common_event_id.get() == 0 {
            result.add_issue(LintIssue {
                level: LintLevel::Error,
                message: format!("Rule {} has no common event", rule.label(index)),
                rule_index: index,
                category: "references".to_string(),
            });
            continue;
        }

        let Some(database) = database else {
            continue;
        };
        if database.common_event(rule.common_event_id).is_none() {
            result.add_issue(LintIssue {
                level: LintLevel::Warning,
                message: format!(
                    "Rule {} refers to missing common event {}; it will never run",
                    rule.label(index),
                    rule.common_event_id
                ),
                rule_index: index,
                category: "references".to_string(),
            });
        }
    }
}

/// Rules that an earlier rule always beats
pub fn check_shadowing(config: &InterceptorConfig, result: &mut LintResult) {
    let rules = &config.interceptor_list;
    for (index, rule) in rules.iter().enumerate() {
        let shadowing = rules[..index]
            .iter()
            .position(|earlier| covers(earlier, rule));
        if let Some(earlier_index) = shadowing {
            result.add_issue(LintIssue {
                level: LintLevel::Warning,
                message: format!(
                    "Rule {} is unreachable: rule {} matches every event it matches",
                    rule.label(index),
                    rules[earlier_index].label(earlier_index)
                ),
                rule_index: index,
                category: "flow".to_string(),
            });
        }
    }
}

/// Rules keyed on the opt-out sentinel
pub fn check_sentinel_tags(config: &InterceptorConfig, result: &mut LintResult) {
    for (index, rule) in config.interceptor_list.iter().enumerate() {
        if rule.tag_value.as_deref() == Some(NONE_EVENT_TYPE) {
            result.add_issue(LintIssue {
                level: LintLevel::Info,
                message: format!(
                    "Rule {} only matches events tagged as opted out (\"{}\")",
                    rule.label(index),
                    NONE_EVENT_TYPE
                ),
                rule_index: index,
                category: "quality".to_string(),
            });
        }
    }
}

/// Whether `earlier` matches at least every subject `later` matches
fn covers(earlier: &InterceptorRule, later: &InterceptorRule) -> bool {
    if earlier.timing != later.timing {
        return false;
    }
    if earlier.page_index != 0 && earlier.page_index != later.page_index {
        return false;
    }
    if earlier.invalid_parallel && !later.invalid_parallel {
        return false;
    }
    match (earlier.tag_value.as_deref(), later.tag_value.as_deref()) {
        (None, None) => true,
        (None, Some(tag_value)) => tag_value != NONE_EVENT_TYPE,
        (Some(earlier_tag), Some(later_tag)) => earlier_tag == later_tag,
        (Some(_), None) => false,
    }
}
