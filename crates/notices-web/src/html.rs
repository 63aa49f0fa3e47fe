//! Page rendering.
//!
//! Pages are small enough to build with `format!`. Every piece of user
//! content goes through [`escape`].

use std::fmt::Write as _;

use axum::{http::StatusCode, response::Html};
use chrono::{DateTime, Utc};
use notices_core::notice::NoticeSummary;

use crate::handlers::listing::Pager;

/// Escape text for use in element content and quoted attribute values.
pub fn escape(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#x27;"),
      c => out.push(c),
    }
  }
  out
}

pub fn format_dt(dt: DateTime<Utc>) -> String { dt.format("%Y-%m-%d %H:%M:%S").to_string() }

fn document(title: &str, body: &str) -> Html<String> {
  Html(format!(
    "<!DOCTYPE html><html><head><title>{}</title></head>\n<body>\n{body}\n</body></html>",
    escape(title)
  ))
}

// ─── Listing ─────────────────────────────────────────────────────────────────

pub fn listing(rows: &[NoticeSummary], pager: &Pager, banner: Option<&str>) -> Html<String> {
  let mut body = String::new();

  if let Some(banner) = banner {
    let _ = writeln!(body, "<p class=\"result\"><em>{}</em></p>", escape(banner));
  }

  body.push_str(
    "<p><h3>Current Notices:</h3></p>\n<table>\n\
     <tr><th>Notice ID</th><th>Recipient</th><th>Date</th><th>Message</th></tr>\n",
  );
  for row in rows {
    let _ = write!(
      body,
      "<tr><td>{id}</td><td>{name}</td><td>{date}</td><td>{message}</td>\
       <td><form action=\"/close\" method=\"POST\">\
       <input type=\"submit\" value=\"Close\" />\
       <input name=\"entry\" type=\"hidden\" value=\"{id}\" />\
       </form></td></tr>\n",
      id = row.id,
      name = escape(&row.name),
      date = format_dt(row.posted_at),
      message = escape(&row.message),
    );
  }
  body.push_str("</table>\n");

  let prev = match pager.prev() {
    Some(p) => format!("<a href=\"/{p}\">&lt;&lt;</a>&nbsp;&nbsp;"),
    None => "&lt;&lt;&nbsp;&nbsp;".to_owned(),
  };
  let next = match pager.next() {
    Some(p) => format!("&nbsp;&nbsp;<a href=\"/{p}\">&gt;&gt;</a>"),
    None => "&nbsp;&nbsp;&gt;&gt;".to_owned(),
  };
  let _ = writeln!(
    body,
    "<p><h3>{prev}<a href='/notify'>Send new notification</a>{next}</h3></p>"
  );

  if pager.show_position() {
    let _ = write!(body, "<p>{} of {} pages</p>", pager.page, pager.page_count);
  }

  document("Notification System", &body)
}

// ─── Submission ──────────────────────────────────────────────────────────────

pub fn form() -> Html<String> {
  document(
    "Notify",
    "<form action=\"/confirmation\" method=\"POST\">\n\
     Who shall I notify:\n\
     <input type=\"text\" name=\"name\"><br />\n\
     What is your message:<br />\n\
     <textarea name=\"message\" cols=\"80\" rows=\"25\"></textarea><br />\n\
     <input type=\"submit\" value=\"Notify\">\n\
     </form>",
  )
}

pub fn confirmation(id: i64, name: &str, message: &str) -> Html<String> {
  document(
    "Confirmation",
    &format!(
      "<p>{} has been sent message ID {id}:\n<blockquote>{}\n</blockquote>\n<a href=\"/\">Done</a>",
      escape(name),
      escape(message),
    ),
  )
}

// ─── Errors ──────────────────────────────────────────────────────────────────

pub fn error_page(status: StatusCode, detail: &str) -> Html<String> {
  let title = status.canonical_reason().unwrap_or("Error");
  document(
    title,
    &format!(
      "<p><h3>{}</h3></p>\n<p>{}</p>\n<a href=\"/\">Back to notices</a>",
      escape(title),
      escape(detail),
    ),
  )
}
