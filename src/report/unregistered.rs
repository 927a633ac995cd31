//! Text rendering of unregistered header names.

use crate::analysis::unregistered::UnregisteredSnapshot;

pub fn render(snap: &UnregisteredSnapshot) -> String {
    let mut out = String::new();

    out.push_str("* Top Interesting Header Servers\n");
    for header in &snap.interesting {
        out.push_str(&format!("  - {}\n", header.header));
        for server in &header.servers {
            out.push_str(&format!("    {} - {}\n", server.count, server.value));
        }
    }
    out.push('\n');

    out.push_str("* Top Unregistered Headers Seen\n");
    for sample in &snap.unregistered {
        out.push_str(&format!("  - {} {}\n", sample.value, sample.count));
    }

    out
}
