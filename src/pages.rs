//! Minimal inline page rendering. The pages are deliberately plain; no
//! template engine is involved.

use crate::auth::repo::User;
use crate::tasks::repo::Task;

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

fn error_line(error: Option<&str>) -> String {
    match error {
        Some(e) => format!("<p class=\"error\">{}</p>", escape(e)),
        None => String::new(),
    }
}

pub fn home(user: Option<&User>, tasks: &[Task]) -> String {
    let body = match user {
        Some(user) => {
            let mut items = String::new();
            for task in tasks {
                let description = task.description.as_deref().unwrap_or_default();
                items.push_str(&format!(
                    "<li>{}: {} <form method=\"post\" action=\"/tasks/{}/delete\"><button>delete</button></form></li>\n",
                    escape(&task.title),
                    escape(description),
                    task.id
                ));
            }
            format!(
                "<h1>{}'s tasks</h1>\n<ul>\n{items}</ul>\n<p><a href=\"/add_task\">add task</a> | <a href=\"/logout\">logout</a></p>",
                escape(&user.name)
            )
        }
        None => {
            "<h1>taskmind</h1>\n<p><a href=\"/login\">login</a> | <a href=\"/register\">register</a></p>".to_string()
        }
    };
    layout("taskmind", &body)
}

pub fn register(error: Option<&str>) -> String {
    let body = format!(
        "<h1>Register</h1>\n{}<form method=\"post\" action=\"/register\">\n<input name=\"username\" placeholder=\"username\">\n<input name=\"password\" type=\"password\" placeholder=\"password\">\n<button>register</button>\n</form>\n<p><a href=\"/login\">login</a></p>",
        error_line(error)
    );
    layout("register", &body)
}

pub fn login(error: Option<&str>) -> String {
    let body = format!(
        "<h1>Login</h1>\n{}<form method=\"post\" action=\"/login\">\n<input name=\"username\" placeholder=\"username\">\n<input name=\"password\" type=\"password\" placeholder=\"password\">\n<button>login</button>\n</form>\n<p><a href=\"/register\">register</a></p>",
        error_line(error)
    );
    layout("login", &body)
}

pub fn add_task() -> String {
    let body = "<h1>New task</h1>\n<form method=\"post\" action=\"/tasks\">\n<input name=\"title\" placeholder=\"title\">\n<input name=\"description\" placeholder=\"description\">\n<button>add</button>\n</form>\n<p><a href=\"/\">back</a></p>";
    layout("new task", body)
}
