//! Text rendering of unparseable values.

use crate::analysis::weird_values::WeirdValuesSnapshot;

pub fn render(snap: &WeirdValuesSnapshot) -> String {
    let mut out = String::new();
    if snap.groups.is_empty() {
        out.push_str(&format!("No parse failures for {}\n", snap.field));
        return out;
    }
    for group in &snap.groups {
        out.push_str(&format!("* {} ({})\n", group.reason, group.total));
        for sample in &group.values {
            out.push_str(&format!("  {}: {}\n", sample.count, sample.value));
        }
        out.push('\n');
    }
    out
}
