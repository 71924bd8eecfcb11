//! Minimal page rendering shared by the fallback path and the plain
//! processor. The annotating frontend produces its own markup; everything
//! here only has to be well-formed and correctly escaped.

use chrono::Local;

use crate::models::ProjectInfo;

/// Stylesheet linked from every generated page, resolved against the
/// configured data URL.
const STYLESHEET: &str = "source-atlas.css";

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

/// Footer line naming the generation date, the owning project, and its
/// revision when one is known.
pub fn page_footer(project: &ProjectInfo) -> String {
    let date = Local::now().format("%Y-%b-%d");
    let mut footer = format!("Generated on <em>{date}</em> from project {}", project.name);
    if let Some(revision) = &project.revision {
        footer.push_str(&format!(" revision <em>{revision}</em>"));
    }
    footer
}

/// Assembles one page around an escaped source listing. `notice` is placed
/// verbatim above the listing; `footer` may carry markup and is not escaped.
pub fn render_page(
    data_url: &str,
    title: &str,
    notice: Option<&str>,
    source: &str,
    footer: &str,
) -> String {
    let mut output = String::with_capacity(source.len() + 512);

    output.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    output.push_str("<meta charset=\"utf-8\">\n");
    output.push_str(&format!("<title>{} source code</title>\n", html_escape(title)));
    output.push_str(&format!("<link rel=\"stylesheet\" href=\"{data_url}/{STYLESHEET}\">\n"));
    output.push_str("</head>\n<body>\n");

    if let Some(notice) = notice {
        output.push_str(&format!("<p class=\"warnmsg\">{notice}</p>\n"));
    }
    output.push_str("<pre class=\"code\">\n");
    output.push_str(&html_escape(source));
    output.push_str("</pre>\n");

    output.push_str("<hr>\n");
    output.push_str(&format!("<p class=\"footer\">{footer}</p>\n"));
    output.push_str("</body>\n</html>\n");
    output
}
