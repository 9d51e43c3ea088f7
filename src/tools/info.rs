//! Server information tool.

use std::fmt::Write;

use serde_json::json;

use super::{object_schema, NoParams, Tool};
use crate::wcag::{Level, WcagDocument};

pub fn get_server_info() -> Tool {
    Tool::new(
        "get-server-info",
        "Returns information about this WCAG MCP server and data source.",
        object_schema(json!({}), &[]),
        |document: &WcagDocument, _: NoParams| {
            let stats = document.statistics();
            let at = |level: Level| stats.criteria_by_level.get(&level).copied().unwrap_or(0);

            let mut out = format!("**WCAG MCP Server** v{}\n\n", env!("CARGO_PKG_VERSION"));
            out.push_str(
                "A Model Context Protocol server providing comprehensive access to WCAG 2.2 guidelines with full Understanding documentation.\n\n",
            );

            out.push_str("## Data Source\n\n");
            out.push_str("- **Source:** [W3C WCAG Repository](https://github.com/w3c/wcag)\n");
            out.push_str(
                "- **WCAG JSON:** [Published WCAG 2.2 JSON](https://www.w3.org/WAI/WCAG22/wcag.json)\n",
            );
            out.push_str(
                "- **Understanding Docs:** Parsed from official W3C Understanding HTML files\n",
            );
            out.push_str("- **WCAG Version:** 2.2\n\n");

            out.push_str("## Statistics\n\n");
            let _ = writeln!(out, "- **Principles:** {}", stats.principles);
            let _ = writeln!(out, "- **Guidelines:** {}", stats.guidelines);
            let _ = writeln!(
                out,
                "- **Success Criteria:** {} (Level A: {}, AA: {}, AAA: {})",
                stats.criteria,
                at(Level::A),
                at(Level::AA),
                at(Level::AAA)
            );
            let _ = writeln!(out, "- **Techniques:** {}", stats.techniques);
            let _ = writeln!(out, "- **Glossary Terms:** {}\n", stats.terms);

            out.push_str("## Attribution\n\n");
            out.push_str(
                "WCAG data from the [W3C WCAG Repository](https://github.com/w3c/wcag) ([W3C Document License](https://www.w3.org/copyright/document-license/)).\n\n",
            );
            out.push_str(
                "This software includes material copied from or derived from Web Content Accessibility Guidelines (WCAG) 2.2. Copyright © 2023 W3C® (MIT, ERCIM, Keio, Beihang).",
            );

            out
        },
    )
}

#[cfg(test)]
mod tests {
    use crate::tools::test_support::call;
    use serde_json::json;

    #[test]
    fn info_reports_dataset_statistics() {
        let text = call("get-server-info", json!({}));
        assert!(text.starts_with(&format!(
            "**WCAG MCP Server** v{}",
            env!("CARGO_PKG_VERSION")
        )));
        assert!(text.contains("- **Principles:** 2\n"));
        assert!(text.contains("- **Guidelines:** 3\n"));
        assert!(text.contains("- **Success Criteria:** 3 (Level A: 1, AA: 2, AAA: 0)"));
        assert!(text.contains("- **Techniques:** 5\n"));
        assert!(text.contains("- **Glossary Terms:** 2\n"));
        assert!(text.ends_with("(MIT, ERCIM, Keio, Beihang)."));
    }
}
