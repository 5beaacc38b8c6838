//! Prometheus text exposition rendering.

use crate::domain::MetricRecord;

/// Content type of the text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render a snapshot into the text exposition format.
///
/// `# HELP` and `# TYPE` are emitted once per metric family, on its first
/// record; families must therefore be contiguous in the input, which the
/// collector's catalog-order guarantee provides.
#[must_use]
pub fn render(records: &[MetricRecord]) -> String {
    let mut out = String::with_capacity(records.len() * 64 + 128);
    let mut current_family = "";

    for record in records {
        if record.name != current_family {
            current_family = record.name;
            out.push_str(&format!("# HELP {} {}\n", record.name, record.help));
            out.push_str(&format!(
                "# TYPE {} {}\n",
                record.name,
                record.value_kind.as_str()
            ));
        }
        out.push_str(record.name);
        if !record.labels.is_empty() {
            out.push('{');
            for (i, (key, value)) in record.labels.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&format!("{key}=\"{}\"", escape_label_value(value)));
            }
            out.push('}');
        }
        out.push_str(&format!(" {}\n", record.value));
    }

    out
}

// Backslash, double quote, and newline must be escaped in label values.
fn escape_label_value(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
