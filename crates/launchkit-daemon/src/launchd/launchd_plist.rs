//! Property-list descriptor rendering.

use crate::daemon_spec::DaemonSpec;

const HEADER: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
    "<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n",
    "<plist version=\"1.0\">\n",
);

/// Generate the launchd descriptor for a daemon.
pub fn render_plist(spec: &DaemonSpec) -> String {
    let mut plist = String::from(HEADER);
    plist.push_str("<dict>\n");

    plist.push_str("  <key>Label</key>\n");
    plist.push_str(&format!("  <string>{}</string>\n", escape_xml(&spec.label)));

    plist.push_str("  <key>Program</key>\n");
    plist.push_str(&format!(
        "  <string>{}</string>\n",
        escape_xml(&spec.program.to_string_lossy())
    ));

    plist.push_str("  <key>ProgramArguments</key>\n");
    plist.push_str("  <array>\n");
    for arg in &spec.program_arguments {
        plist.push_str(&format!("    <string>{}</string>\n", escape_xml(arg)));
    }
    plist.push_str("  </array>\n");

    plist.push_str("  <key>RunAtLoad</key>\n");
    plist.push_str(if spec.run_at_load { "  <true/>\n" } else { "  <false/>\n" });

    plist.push_str("</dict>\n");
    plist.push_str("</plist>\n");

    plist
}

/// Escape special characters for XML.
pub(super) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
