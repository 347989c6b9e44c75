//! Embedded HTML pages for the form service
//!
//! The pages are small enough to live in the source; values are escaped
//! before interpolation.

use crate::forms::store::Submission;

/// Escape text for interpolation into HTML.
pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const STYLE: &str = r"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif;
            line-height: 1.6;
            background: #f4f5f7;
            color: #1f2430;
            padding: 40px 16px;
        }
        .container {
            max-width: 560px;
            margin: 0 auto;
            background: #ffffff;
            border-radius: 8px;
            padding: 32px;
            box-shadow: 0 2px 8px rgba(31, 36, 48, 0.08);
        }
        h1 { font-size: 1.6em; margin-bottom: 16px; }
        .notice {
            background: #fdf0ef;
            border: 1px solid #e6a9a2;
            border-radius: 4px;
            padding: 8px 12px;
            margin-bottom: 16px;
        }
        form label { display: block; margin-bottom: 12px; font-weight: 600; }
        form input, form textarea {
            display: block;
            width: 100%;
            margin-top: 4px;
            padding: 8px;
            font: inherit;
            font-weight: 400;
            border: 1px solid #c6cad2;
            border-radius: 4px;
        }
        form button {
            padding: 8px 20px;
            font: inherit;
            color: #ffffff;
            background: #4455a2;
            border: none;
            border-radius: 4px;
            cursor: pointer;
        }
        ul.submissions { list-style: none; }
        ul.submissions li {
            border-bottom: 1px solid #e3e5ea;
            padding: 12px 0;
        }
        ul.submissions li:last-child { border-bottom: none; }
        .who { font-weight: 600; }
        .detail { display: block; }
        .time { display: block; font-size: 0.85em; color: #70768a; }
        .footer { margin-top: 24px; font-size: 0.9em; }
        a { color: #4455a2; }
";

/// Wrap page body in the shared document shell
fn page_shell(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    <div class="container">
{body}
    </div>
</body>
</html>"#
    )
}

/// Render the submission form, with an optional inline notice (e.g. a
/// validation error carried back through the redirect).
pub fn render_form_page(notice: Option<&str>) -> String {
    let notice_html = notice.map_or_else(String::new, |message| {
        format!(
            "        <p class=\"notice\">{}</p>\n",
            escape_html(message)
        )
    });

    let body = format!(
        r#"        <h1>Contact us</h1>
{notice_html}        <form action="/submit" method="POST">
            <label>Name
                <input type="text" name="name">
            </label>
            <label>Email
                <input type="text" name="email">
            </label>
            <label>Phone
                <input type="text" name="phone">
            </label>
            <label>Message
                <textarea name="message" rows="4"></textarea>
            </label>
            <button type="submit">Submit</button>
        </form>
        <p class="footer"><a href="/display">View submissions</a></p>"#
    );

    page_shell("Contact us", &body)
}

/// Render the listing page, most recent submission first. When the stored
/// collection could not be loaded the page renders empty with a visible
/// notice instead of failing the request.
pub fn render_display_page(submissions: &[Submission], load_failed: bool) -> String {
    let mut body = String::from("        <h1>Submissions</h1>\n");

    if load_failed {
        body.push_str("        <p class=\"notice\">Could not load stored submissions.</p>\n");
    }

    if submissions.is_empty() {
        body.push_str("        <p>No submissions yet.</p>\n");
    } else {
        body.push_str("        <ul class=\"submissions\">\n");
        for submission in submissions.iter().rev() {
            body.push_str(&render_entry(submission));
        }
        body.push_str("        </ul>\n");
    }

    body.push_str("        <p class=\"footer\"><a href=\"/\">Back to form</a></p>");
    page_shell("Submissions", &body)
}

fn render_entry(submission: &Submission) -> String {
    let mut entry = format!(
        "            <li><span class=\"who\">{} ({})</span>\n",
        escape_html(&submission.name),
        escape_html(&submission.email)
    );
    if !submission.phone.is_empty() {
        entry.push_str(&format!(
            "                <span class=\"detail\">{}</span>\n",
            escape_html(&submission.phone)
        ));
    }
    if !submission.message.is_empty() {
        entry.push_str(&format!(
            "                <span class=\"detail\">{}</span>\n",
            escape_html(&submission.message)
        ));
    }
    entry.push_str(&format!(
        "                <span class=\"time\">{}</span></li>\n",
        escape_html(&submission.created_at)
    ));
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(id: i64, name: &str) -> Submission {
        Submission {
            id,
            name: name.to_string(),
            email: format!("{name}@example.com"),
            phone: String::new(),
            message: String::new(),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_display_page_is_most_recent_first() {
        let submissions = vec![submission(1, "First"), submission(2, "Second")];
        let html = render_display_page(&submissions, false);

        let first = html.find("First").expect("First rendered");
        let second = html.find("Second").expect("Second rendered");
        assert!(second < first, "later submission must render before earlier");
    }

    #[test]
    fn test_display_page_empty_state() {
        let html = render_display_page(&[], false);
        assert!(html.contains("No submissions yet."));
        assert!(!html.contains("Could not load"));
    }

    #[test]
    fn test_display_page_load_failure_notice() {
        let html = render_display_page(&[], true);
        assert!(html.contains("Could not load stored submissions."));
    }

    #[test]
    fn test_form_page_escapes_notice() {
        let html = render_form_page(Some("<script>alert(1)</script>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_form_page_without_notice_has_no_notice_block() {
        let html = render_form_page(None);
        assert!(!html.contains("class=\"notice\""));
        assert!(html.contains("action=\"/submit\""));
    }

    #[test]
    fn test_entries_escape_user_content() {
        let mut sub = submission(1, "Eve");
        sub.message = "<img src=x>".to_string();
        let html = render_display_page(&[sub], false);
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x&gt;"));
    }
}
