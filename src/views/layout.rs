use std::fmt::Write;

use super::{PageView, escape_html};
use crate::{
    dto::notice::{Notice, NoticeLevel},
    navigation::{self, Page},
};

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;background:#f5f6f8;color:#1d2330}\
nav{display:flex;gap:1rem;padding:.8rem 1.5rem;background:#1d2330}\
nav a{color:#c9d1e0;text-decoration:none;padding:.3rem .6rem;border-radius:4px}\
nav a.active{background:#3a66db;color:#fff}\
main{padding:1.5rem}\
table{border-collapse:collapse;width:100%;background:#fff}\
th,td{border-bottom:1px solid #dde1e8;padding:.4rem .6rem;text-align:left}\
.notice{padding:.7rem 1rem;margin-bottom:1rem;border-radius:4px}\
.notice-success{background:#e3f6e8}\
.notice-warning{background:#fff4d6}\
.notice-error{background:#fde2e1}\
.action-button{margin-right:.3rem}\
form.inline{display:inline}";

/// Wrap `body` in the document shell: head, navigation bar and notices.
pub fn render(view: &PageView<'_>, body: &str) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>PEO Check-in - {title}</title><style>{STYLE}</style></head><body>",
        title = view.page.title(),
    );
    html.push_str(&nav_bar(view.base, view.page));
    html.push_str("<main>");
    if view.degraded {
        html.push_str(&notice(&Notice::warning(
            "The database is unreachable. Showing the last loaded data.",
        )));
    }
    for item in view.notices {
        html.push_str(&notice(item));
    }
    let _ = write!(
        html,
        "<section class=\"page active\" id=\"{slug}-page\">{body}</section></main>{script}</body></html>",
        slug = view.page.slug(),
        script = navigation::client_script(view.base),
    );
    html
}

/// Navigation links with the current page highlighted.
pub fn nav_bar(base: &str, active: Page) -> String {
    let mut html = String::from("<nav class=\"nav-links\">");
    for page in Page::all() {
        let class = if page == active { " class=\"active\"" } else { "" };
        let _ = write!(
            html,
            "<a href=\"{href}\" data-page=\"{slug}\"{class}>{title}</a>",
            href = escape_html(&page.url(base)),
            slug = page.slug(),
            title = page.title(),
        );
    }
    html.push_str("</nav>");
    html
}

fn notice(notice: &Notice) -> String {
    let level = match notice.level {
        NoticeLevel::Success => "success",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!(
        "<div class=\"notice notice-{level}\" role=\"alert\">{}</div>",
        escape_html(&notice.message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Roster;

    #[test]
    fn highlights_only_the_active_page() {
        let html = nav_bar("/PEO", Page::Leaderboard);
        assert!(html.contains(
            "<a href=\"/PEO/leaderboard\" data-page=\"leaderboard\" class=\"active\">"
        ));
        assert_eq!(html.matches("class=\"active\"").count(), 1);
    }

    #[test]
    fn shows_notices_and_degraded_banner() {
        let roster = Roster::default();
        let notices = [Notice::error("Error updating status. Please try again.")];
        let view = PageView {
            base: "/PEO",
            page: Page::Checkin,
            roster: &roster,
            notices: &notices,
            degraded: true,
            search: "",
            test_data_count: 50,
        };
        let html = render(&view, "<p>body</p>");
        assert!(html.contains("notice-error"));
        assert!(html.contains("Error updating status. Please try again."));
        assert!(html.contains("notice-warning"));
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains("history.pushState"));
    }
}
