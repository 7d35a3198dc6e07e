pub mod formatter;

pub use formatter::{
    format_batch_json, format_batch_table, format_breakdown, format_failed_rules, format_json,
    format_report, format_rule_table, format_score, format_simple_report, resolve_colors,
    should_use_colors,
};
