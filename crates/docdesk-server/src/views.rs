//! HTML pages for the panel.
//!
//! Pages are assembled from static fragments with `push_str`; every piece of
//! interpolated text goes through [`escape`].

use std::fmt::Write as _;

use docdesk_core::confirm::PendingAction;
use docdesk_core::form::FormModel;
use docdesk_core::schema;
use docdesk_core::view::Card;

use crate::session::{Flash, FlashKind};

/// Modal shown over the dashboard.
#[derive(Debug, Clone, Copy)]
pub enum Dialog<'a> {
    Form(&'a FormModel),
    Confirm(&'a PendingAction),
}

/// Everything the dashboard page shows.
#[derive(Debug)]
pub struct Dashboard<'a> {
    pub email: &'a str,
    pub active: Option<&'a str>,
    pub search: &'a str,
    pub cards: &'a [Card],
    pub dialog: Option<Dialog<'a>>,
    pub flash: Option<&'a Flash>,
}

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Sign-in page.
pub fn login_page(flash: Option<&Flash>) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str(PAGE_HEAD);
    push_flash(&mut html, flash);
    html.push_str(LOGIN_BODY);
    html.push_str(PAGE_TAIL);
    html
}

/// Signed-in dashboard with an optional dialog on top.
pub fn dashboard(view: &Dashboard<'_>) -> String {
    let mut html = String::with_capacity(16384);
    html.push_str(PAGE_HEAD);
    push_flash(&mut html, view.flash);

    let _ = write!(
        html,
        r#"<header class="bar"><span class="brand">docdesk</span><span class="who">{}</span><form method="post" action="/logout"><button class="btn-ghost">Logout</button></form></header>"#,
        escape(view.email)
    );

    html.push_str(r#"<nav class="collections">"#);
    for name in schema::collections() {
        let class = if view.active == Some(name) { "coll active" } else { "coll" };
        let _ = write!(
            html,
            r#"<a class="{class}" href="/collections/{name}">{}</a>"#,
            escape(name)
        );
    }
    html.push_str("</nav>");

    match view.active {
        None => html.push_str(r#"<p class="empty">Select a collection.</p>"#),
        Some(collection) => push_collection(&mut html, collection, view),
    }

    match view.dialog {
        Some(Dialog::Confirm(action)) => push_confirm(&mut html, action),
        Some(Dialog::Form(form)) => push_form(&mut html, form),
        None => {}
    }

    html.push_str(PAGE_TAIL);
    html
}

fn push_flash(html: &mut String, flash: Option<&Flash>) {
    if let Some(flash) = flash {
        let class = match flash.kind {
            FlashKind::Success => "notice ok",
            FlashKind::Error => "notice err",
        };
        let _ = write!(
            html,
            r#"<div class="{class}" role="alert">{}</div>"#,
            escape(&flash.message)
        );
    }
}

fn push_collection(html: &mut String, collection: &str, view: &Dashboard<'_>) {
    let _ = write!(
        html,
        r#"<section class="toolbar"><h2>{}</h2><form method="get" action="/"><input name="q" placeholder="Search by id" value="{}"/><button>Search</button></form><form method="post" action="/refresh"><button>Refresh</button></form><a class="btn" href="/documents/new">Add Record</a></section>"#,
        escape(collection),
        escape(view.search)
    );

    if view.cards.is_empty() {
        html.push_str(r#"<p class="empty">No documents found.</p>"#);
        return;
    }

    html.push_str(r#"<section class="cards">"#);
    for card in view.cards {
        push_card(html, card);
    }
    html.push_str("</section>");
}

fn push_card(html: &mut String, card: &Card) {
    let _ = write!(
        html,
        r#"<div class="card"><div class="card-header">{}</div><div class="card-body">"#,
        escape(&card.id)
    );
    for row in &card.rows {
        let _ = write!(
            html,
            r#"<div class="row"><strong>{}:</strong> <span>{}</span></div>"#,
            escape(&row.field),
            escape(&row.value)
        );
    }
    let _ = write!(
        html,
        r#"</div><div class="card-footer"><a class="btn" href="/documents/edit?path={}">Edit</a><form method="post" action="/documents/delete"><input type="hidden" name="path" value="{}"/><button class="btn-danger">Delete</button></form></div></div>"#,
        escape(&urlencoding::encode(&card.path)),
        escape(&card.path)
    );
}

fn push_form(html: &mut String, form: &FormModel) {
    let _ = write!(
        html,
        r#"<div class="modal"><form class="dialog" method="post" action="/documents/save"><h3>{}</h3>"#,
        form.title()
    );

    let disabled = if form.id_editable() { "" } else { " disabled" };
    let _ = write!(
        html,
        r#"<label>Document ID<input name="doc_id" placeholder="Leave blank for an auto id" value="{}"{disabled}/></label>"#,
        escape(&form.doc_id)
    );

    for input in &form.inputs {
        let d = &input.descriptor;
        let marker = if d.required { " *" } else { "" };
        let required = if d.required { " required" } else { "" };
        let _ = write!(
            html,
            r#"<label>{}{marker}<input type="{}" name="field.{}" placeholder="Enter {}" value="{}"{required}/></label>"#,
            escape(d.label),
            d.kind.as_html(),
            escape(d.name),
            escape(d.label),
            escape(&input.value)
        );
    }

    html.push_str(r#"<div class="actions"><button formaction="/documents/close" formnovalidate class="btn-ghost">Cancel</button><button>Save</button></div></form></div>"#);
}

fn push_confirm(html: &mut String, action: &PendingAction) {
    let _ = write!(
        html,
        r#"<div class="modal"><div class="dialog"><h3>{}</h3>"#,
        action.title()
    );

    match action {
        PendingAction::Delete { path } => {
            let id = path.rsplit('/').next().unwrap_or(path.as_str());
            let _ = write!(
                html,
                r#"<p>Are you sure you want to delete <strong>{}</strong>? This cannot be undone.</p>"#,
                escape(id)
            );
        }
        PendingAction::Save(save) => {
            html.push_str(r#"<div class="preview">"#);
            if let Some(id) = &save.doc_id {
                let _ = write!(
                    html,
                    r#"<div class="row"><strong>Document ID:</strong> {}</div>"#,
                    escape(id)
                );
            }
            for (field, value) in &save.preview {
                let _ = write!(
                    html,
                    r#"<div class="row"><strong>{}:</strong> {}</div>"#,
                    escape(field),
                    escape(value)
                );
            }
            html.push_str("</div>");
        }
    }

    html.push_str(r#"<div class="actions"><form method="post" action="/cancel"><button class="btn-ghost">Cancel</button></form><form method="post" action="/confirm"><button class="btn-danger">Proceed</button></form></div></div></div>"#);
}

const PAGE_HEAD: &str = r##"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"/><meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>docdesk</title>
<style>
*,*::before,*::after{box-sizing:border-box;margin:0;padding:0}
:root{--bg:#1E1610;--card:#2A2018;--text:#F5E6B8;--muted:#A69274;--primary:#F5C842;--danger:#E5484D;--border:rgba(255,255,255,.08)}
body{font-family:-apple-system,'Segoe UI',sans-serif;background:var(--bg);color:var(--text);line-height:1.5;padding:24px;max-width:1100px;margin:0 auto}
a{color:inherit;text-decoration:none}
button,.btn{background:var(--primary);color:#1E1610;border:0;border-radius:8px;padding:8px 14px;font-weight:600;cursor:pointer;display:inline-block}
.btn-ghost{background:transparent;color:var(--text);border:1px solid var(--border)}
.btn-danger{background:var(--danger);color:#fff}
input{background:var(--card);color:var(--text);border:1px solid var(--border);border-radius:8px;padding:8px 10px;width:100%}
input:disabled{opacity:.6}
label{display:block;margin:10px 0;color:var(--muted);font-size:14px}
.bar{display:flex;align-items:center;gap:16px;margin-bottom:20px}
.brand{font-size:20px;font-weight:800;flex:1}
.who{color:var(--muted)}
.collections{display:flex;gap:8px;margin-bottom:20px}
.coll{padding:6px 12px;border:1px solid var(--border);border-radius:999px}
.coll.active{background:var(--primary);color:#1E1610}
.toolbar{display:flex;align-items:center;gap:10px;margin-bottom:16px}
.toolbar h2{flex:1}
.toolbar form{display:flex;gap:6px}
.cards{display:grid;grid-template-columns:repeat(auto-fill,minmax(260px,1fr));gap:16px}
.card{background:var(--card);border:1px solid var(--border);border-radius:12px;overflow:hidden}
.card-header{padding:12px 16px;font-weight:700;border-bottom:1px solid var(--border)}
.card-body{padding:12px 16px}
.card-footer{display:flex;gap:8px;padding:12px 16px;border-top:1px solid var(--border)}
.row{margin:6px 0}
.empty{text-align:center;color:var(--muted);padding:40px}
.notice{padding:12px 16px;border-radius:8px;margin-bottom:16px}
.notice.ok{background:rgba(48,164,108,.2)}
.notice.err{background:rgba(229,72,77,.2)}
.modal{position:fixed;inset:0;background:rgba(0,0,0,.6);display:flex;align-items:center;justify-content:center}
.dialog{background:var(--card);border-radius:12px;padding:24px;width:min(480px,92vw);max-height:90vh;overflow:auto}
.dialog h3{margin-bottom:12px}
.preview .row{padding:8px 0;border-bottom:1px solid var(--border)}
.actions{display:flex;justify-content:flex-end;gap:8px;margin-top:16px}
.login{max-width:360px;margin:80px auto}
</style></head><body>
"##;

const LOGIN_BODY: &str = r#"<form class="login dialog" method="post" action="/login">
<h3>Sign in</h3>
<label>Email<input type="email" name="email" autocomplete="username" required/></label>
<label>Password<input type="password" name="password" autocomplete="current-password" required/></label>
<div class="actions"><button>Login</button></div>
</form>
"#;

const PAGE_TAIL: &str = "</body></html>\n";

#[cfg(test)]
mod tests {
    use docdesk_core::view::CardRow;

    use super::*;

    fn card(id: &str, value: &str) -> Card {
        Card {
            id: id.to_owned(),
            path: format!("projects/p/databases/(default)/documents/students/{id}"),
            rows: vec![CardRow {
                field: "fname".to_owned(),
                value: value.to_owned(),
            }],
        }
    }

    fn page<'a>(cards: &'a [Card], dialog: Option<Dialog<'a>>) -> String {
        dashboard(&Dashboard {
            email: "admin@school.edu",
            active: Some("students"),
            search: "",
            cards,
            dialog,
            flash: None,
        })
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn field_values_are_escaped() {
        let html = page(&[card("s1", "<script>alert(1)</script>")], None);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn empty_list_shows_placeholder() {
        let html = page(&[], None);
        assert!(html.contains("No documents found."));
    }

    #[test]
    fn cards_carry_edit_and_delete_actions() {
        let html = page(&[card("s1", "Ann")], None);
        assert!(html.contains(r#"href="/documents/edit?path=projects%2Fp%2Fdatabases%2F%28default%29%2Fdocuments%2Fstudents%2Fs1""#));
        assert!(html.contains(r#"value="projects/p/databases/(default)/documents/students/s1""#));
    }

    #[test]
    fn create_form_keeps_id_editable() {
        let mut form = FormModel::create("students");
        form.set_doc_id("s9");
        let html = page(&[], Some(Dialog::Form(&form)));
        assert!(html.contains("Add New Record"));
        assert!(html.contains(r#"name="doc_id" placeholder="Leave blank for an auto id" value="s9"/>"#));
        assert!(html.contains(r#"name="field.year_level""#));
    }

    #[test]
    fn delete_confirmation_names_document() {
        let action = PendingAction::Delete {
            path: "projects/p/databases/(default)/documents/students/s1".to_owned(),
        };
        let html = page(&[], Some(Dialog::Confirm(&action)));
        assert!(html.contains("Confirm Delete Document"));
        assert!(html.contains("<strong>s1</strong>"));
        assert!(html.contains(r#"action="/confirm""#));
    }

    #[test]
    fn login_page_shows_error_notice() {
        let html = login_page(Some(&Flash::error("INVALID_LOGIN_CREDENTIALS")));
        assert!(html.contains(r#"<div class="notice err" role="alert">INVALID_LOGIN_CREDENTIALS</div>"#));
        assert!(html.contains(r#"action="/login""#));
    }
}
