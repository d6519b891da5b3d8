//! Line-oriented interactive session.
//!
//! The edit session only lives as long as the process, so the one-shot CLI
//! commands always start from an idle form. `easylife shell` keeps a single
//! [`App`] alive and reads commands from stdin, one per line:
//!
//! ```text
//! login alice
//! submit Buy milk
//! - milk
//! - eggs
//! .
//! edit <id>
//! submit Buy milk and bread
//! - milk
//! - bread
//! .
//! ```
//!
//! `submit <title>` takes the Markdown body from the following lines, up to a
//! line that is exactly `.` with nothing around it. Each command prints one
//! result (JSON by default).
//! Errors are printed and the loop keeps going.

use crate::app::App;
use crate::commands::{self, Output};
use crate::config::OutputFormat;
use crate::{Error, Result};
use std::io::{BufRead, Write};

const HELP: &str = "\
Commands:
  login <username> [password]        sign in
  register <username> <password> [confirm]
  logout                             sign out and reset the form
  whoami                             show the current user
  list                               list todos, newest first
  select <id>                        select a todo and show its preview
  preview                            show the selected todo
  new                                switch the form to creating a new todo
  edit <id>                          load a todo into the form
  submit <title>                     save the form; body follows, ended by '.'
  cancel                             leave edit mode without saving
  delete <id>                        delete a todo
  state                              show form mode and selection
  help                               this text
  quit                               leave the shell";

/// Terminator line for multi-line Markdown bodies.
const BODY_END: &str = ".";

/// Run the shell until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(
    app: &mut App,
    mut input: R,
    out: &mut W,
    format: OutputFormat,
) -> Result<()> {
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (command, rest) = split_command(trimmed);
        tracing::debug!(command, "shell command");
        let result = match command {
            "quit" | "exit" => break,
            "help" => {
                writeln!(out, "{}", HELP)?;
                continue;
            }
            "submit" => read_body(&mut input).and_then(|body| {
                let submitted = app.submit(rest, &body)?;
                Ok(render(&commands::Submitted { outcome: submitted }, format))
            }),
            _ => dispatch(app, command, rest, format),
        };

        match result {
            Ok(text) => writeln!(out, "{}", text)?,
            Err(e) => writeln!(out, "{}", render_error(&e, format))?,
        }
    }
    out.flush()?;
    Ok(())
}

fn dispatch(app: &mut App, command: &str, rest: &str, format: OutputFormat) -> Result<String> {
    let args: Vec<&str> = rest.split_whitespace().collect();
    let text = match (command, args.as_slice()) {
        ("login", [username]) => render(&commands::login(app, username, None)?, format),
        ("login", [username, password]) => {
            render(&commands::login(app, username, Some(*password))?, format)
        }
        ("register", [username, password]) => {
            render(&commands::register(app, username, password, None)?, format)
        }
        ("register", [username, password, confirm]) => render(
            &commands::register(app, username, password, Some(*confirm))?,
            format,
        ),
        ("logout", []) => render(&commands::logout(app)?, format),
        ("whoami", []) => render(&commands::whoami(app), format),
        ("list", []) => render(&commands::todo_list(app), format),
        ("select", [id]) => {
            app.select(id)?;
            render(&commands::preview(app), format)
        }
        ("preview", []) => render(&commands::preview(app), format),
        ("new" | "cancel", []) => {
            app.cancel();
            render(&commands::edit_state(app), format)
        }
        ("edit", [id]) => render(&commands::edit_start(app, id)?, format),
        ("delete", [id]) => render(&commands::todo_delete(app, id)?, format),
        ("state", []) => render(&commands::edit_state(app), format),
        (
            "login" | "register" | "logout" | "whoami" | "list" | "select" | "preview" | "new"
            | "cancel" | "edit" | "delete" | "state",
            _,
        ) => {
            return Err(Error::InvalidInput(format!(
                "wrong arguments for `{}` (try `help`)",
                command
            )));
        }
        _ => {
            return Err(Error::InvalidInput(format!(
                "unknown command `{}` (try `help`)",
                command
            )));
        }
    };
    Ok(text)
}

fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    }
}

/// Read body lines until a line that is exactly `.`, or end of input.
fn read_body<R: BufRead>(input: &mut R) -> Result<String> {
    let mut body = Vec::new();
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let content = line.trim_end_matches(['\r', '\n']);
        if content == BODY_END {
            break;
        }
        body.push(content.to_string());
    }
    Ok(body.join("\n"))
}

fn render<T: Output>(result: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => result.to_json(),
        OutputFormat::Human => result.to_human(),
    }
}

/// Format an error the way the CLI prints it on stderr.
pub fn render_error(err: &Error, format: OutputFormat) -> String {
    let hint = match err {
        Error::Unauthenticated => Some("log in first with `login <username>`"),
        Error::Usage(_) => Some("run `easylife --help` for usage"),
        _ => None,
    };
    match format {
        OutputFormat::Json => {
            let mut value = serde_json::json!({ "error": err.to_string() });
            if let Some(hint) = hint {
                value["hint"] = serde_json::Value::from(hint);
            }
            value.to_string()
        }
        OutputFormat::Human => match hint {
            Some(hint) => format!("Error: {} ({})", err, hint),
            None => format!("Error: {}", err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthPolicy;
    use crate::test_utils::{SeqIds, StepClock, memory_persistence};

    fn run_script(app: &mut App, script: &str, format: OutputFormat) -> Vec<String> {
        let mut out = Vec::new();
        run(app, script.as_bytes(), &mut out, format).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn app(policy: AuthPolicy) -> App {
        App::open(memory_persistence(), policy)
            .with_clock(StepClock::new())
            .with_id_generator(SeqIds::new())
    }

    #[test]
    fn test_create_edit_flow() {
        let mut app = app(AuthPolicy::trust_username());
        let script = "\
login alice
submit Buy milk
- milk
- eggs
.
edit todo-1
submit Buy milk and bread
- milk
- bread
.
state
";
        let lines = run_script(&mut app, script, OutputFormat::Json);

        assert_eq!(lines.len(), 5);
        let created: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(created["outcome"], "created");
        assert_eq!(created["todo"]["content"], "- milk\n- eggs");

        let updated: serde_json::Value = serde_json::from_str(&lines[3]).unwrap();
        assert_eq!(updated["outcome"], "updated");
        assert_eq!(updated["todo"]["title"], "Buy milk and bread");

        let state: serde_json::Value = serde_json::from_str(&lines[4]).unwrap();
        assert_eq!(state["mode"], "idle");
        assert_eq!(state["active_id"], "todo-1");
        assert_eq!(app.list().len(), 1);
    }

    #[test]
    fn test_delete_while_editing_resets_form() {
        let mut app = app(AuthPolicy::trust_username());
        let script = "login alice\nsubmit A\nbody\n.\nedit todo-1\ndelete todo-1\nstate\n";
        let lines = run_script(&mut app, script, OutputFormat::Json);

        let state: serde_json::Value = serde_json::from_str(lines.last().unwrap()).unwrap();
        assert_eq!(state["mode"], "idle");
        assert!(state["active_id"].is_null());
        assert_eq!(state["count"], 0);
    }

    #[test]
    fn test_errors_do_not_stop_the_loop() {
        let mut app = app(AuthPolicy::trust_username());
        let script = "list\nselect todo-1\nfrobnicate\nlogin\nlogin bob\nwhoami\n";
        let lines = run_script(&mut app, script, OutputFormat::Json);

        assert_eq!(lines.len(), 6);
        let unauth: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(unauth["error"], "Not logged in");
        assert!(unauth["hint"].is_string());
        assert!(lines[2].contains("unknown command"));
        assert!(lines[3].contains("wrong arguments"));
        assert!(lines[5].contains("\"user\":\"bob\""));
    }

    #[test]
    fn test_submit_requires_login() {
        let mut app = app(AuthPolicy::trust_username());
        let lines = run_script(&mut app, "submit Sneaky\nbody\n.\n", OutputFormat::Human);

        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Error: Not logged in"));
        assert!(app.list().is_empty());
    }

    #[test]
    fn test_verify_mode_register_and_login() {
        let mut app = app(AuthPolicy::verify_credentials());
        let script = "register alice p1\nlogin alice wrong\nlogin alice p1\nwhoami\n";
        let lines = run_script(&mut app, script, OutputFormat::Human);

        assert!(lines[0].starts_with("Registered alice"));
        assert_eq!(lines[1], "Error: Invalid username or password");
        assert_eq!(lines[2], "Logged in as alice");
        assert_eq!(app.current(), Some("alice"));
    }

    #[test]
    fn test_cancel_and_quit() {
        let mut app = app(AuthPolicy::trust_username());
        let script = "login a\nsubmit T\nx\n.\nedit todo-1\ncancel\nquit\nlogout\n";
        let lines = run_script(&mut app, script, OutputFormat::Json);

        let state: serde_json::Value = serde_json::from_str(lines.last().unwrap()).unwrap();
        assert_eq!(state["mode"], "idle");
        // quit stops before logout
        assert!(app.is_authenticated());
        assert_eq!(app.get("todo-1").unwrap().title, "T");
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let mut app = app(AuthPolicy::trust_username());
        let lines = run_script(&mut app, "# setup\n\nlogin a\n", OutputFormat::Human);
        assert_eq!(lines, vec!["Logged in as a"]);
    }

    #[test]
    fn test_body_without_terminator_runs_to_eof() {
        let mut app = app(AuthPolicy::trust_username());
        run_script(&mut app, "login a\nsubmit Notes\nline one\nline two", OutputFormat::Json);
        assert_eq!(app.list()[0].content, "line one\nline two");
    }

    #[test]
    fn test_only_exact_dot_ends_body() {
        let mut app = app(AuthPolicy::trust_username());
        let script = "login a\nsubmit Dots\nbefore\n .\n. \n..\nafter\n.\nlist\n";
        let lines = run_script(&mut app, script, OutputFormat::Json);

        assert_eq!(lines.len(), 3);
        assert_eq!(app.list()[0].content, "before\n .\n. \n..\nafter");
    }

    #[test]
    fn test_switching_user_resets_form() {
        let mut app = app(AuthPolicy::trust_username());
        let script = "login alice\nsubmit T\nx\n.\nedit todo-1\nlogin bob\nstate\n";
        let lines = run_script(&mut app, script, OutputFormat::Json);

        let state: serde_json::Value = serde_json::from_str(lines.last().unwrap()).unwrap();
        assert_eq!(state["user"], "bob");
        assert_eq!(state["mode"], "idle");
        assert!(state["active_id"].is_null());
    }

    #[test]
    fn test_select_shows_preview() {
        let mut app = app(AuthPolicy::trust_username());
        let script = "login a\nsubmit T\n**bold**\n.\nselect todo-1\n";
        let lines = run_script(&mut app, script, OutputFormat::Json);

        let preview: serde_json::Value = serde_json::from_str(&lines[2]).unwrap();
        assert!(
            preview["preview"]["html"]
                .as_str()
                .unwrap()
                .contains("<strong>bold</strong>")
        );
    }

    #[test]
    fn test_render_error_formats() {
        let json = render_error(&Error::NotFound("x".to_string()), OutputFormat::Json);
        assert_eq!(json, r#"{"error":"Todo not found: x"}"#);
        let human = render_error(&Error::PasswordMismatch, OutputFormat::Human);
        assert_eq!(human, "Error: Passwords do not match");

        let usage = render_error(&Error::Usage("bad flag".to_string()), OutputFormat::Human);
        assert_eq!(usage, "Error: bad flag (run `easylife --help` for usage)");
    }
}
