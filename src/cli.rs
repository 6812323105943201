//! Terminal wizard: walks one session over stdin/stdout.

use std::io;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use uuid::Uuid;

use crate::advisor::AdviceCategory;
use crate::wizard::{FieldKind, FieldValue, FieldView, SessionManager, SessionView, WizardStep};

const HELP: &str = "Commands: next | back | restart | advice <category> <text> | quit\n\
                    Categories: value_enhancement, dream_outcome, risk_reversal, bonuses, offer_analysis";

/// What the user asked for at the command prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Back,
    Restart,
    Advice { category: AdviceCategory, input: String },
    Quit,
    Help,
}

impl Command {
    /// Parse a command line. Blank input means `next`.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match word.to_ascii_lowercase().as_str() {
            "" | "next" | "n" => Ok(Self::Next),
            "back" | "b" | "previous" => Ok(Self::Back),
            "restart" => Ok(Self::Restart),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            "help" | "?" => Ok(Self::Help),
            "advice" => {
                let rest = rest.trim();
                let (category, input) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Ok(Self::Advice {
                    category: category.parse()?,
                    input: input.trim().to_string(),
                })
            }
            other => Err(format!("unknown command '{other}'")),
        }
    }
}

/// Turn a typed answer into a value for a field of `kind`. Select answers
/// may be given as the option text (any case) or its 1-based number.
pub fn parse_answer(kind: FieldKind, raw: &str) -> Result<FieldValue, String> {
    let raw = raw.trim();
    match kind {
        FieldKind::ShortText | FieldKind::LongText => Ok(FieldValue::text(raw)),
        FieldKind::Select { options } => pick_option(options, raw).map(FieldValue::text),
        FieldKind::MultiSelect { options } => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| pick_option(options, s))
            .collect::<Result<Vec<_>, _>>()
            .map(FieldValue::choices),
        FieldKind::Rating { .. } => raw
            .parse()
            .map(FieldValue::Integer)
            .map_err(|_| format!("'{raw}' is not a whole number")),
        // Non-numeric text is kept as typed; scoring falls back on it.
        FieldKind::Number { .. } => Ok(raw
            .parse()
            .map(FieldValue::Integer)
            .unwrap_or_else(|_| FieldValue::text(raw))),
    }
}

fn pick_option(options: &'static [&'static str], raw: &str) -> Result<&'static str, String> {
    if let Ok(n) = raw.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| options.get(i).copied())
            .ok_or_else(|| format!("choose a number from 1 to {}", options.len()));
    }
    options
        .iter()
        .copied()
        .find(|o| o.eq_ignore_ascii_case(raw))
        .ok_or_else(|| format!("'{raw}' is not one of the options"))
}

fn render_field_prompt(field: &FieldView) -> String {
    let mut prompt = format!("\n{}", field.label);
    match field.input {
        FieldKind::Select { options } | FieldKind::MultiSelect { options } => {
            for (i, option) in options.iter().enumerate() {
                prompt.push_str(&format!("\n  {}. {option}", i + 1));
            }
            if matches!(field.input, FieldKind::MultiSelect { .. }) {
                prompt.push_str("\n  (comma-separated)");
            }
        }
        FieldKind::Rating { min, max, .. } => prompt.push_str(&format!(" ({min}-{max})")),
        _ => {}
    }
    if let Some(value) = &field.value {
        prompt.push_str(&format!("\n  [current: {value}]"));
    }
    prompt.push_str("\n> ");
    prompt
}

fn render_step(view: &SessionView) -> String {
    format!(
        "\n=== {} ({}/{}) ===\n{}\n",
        view.title,
        view.step_index + 1,
        view.step_count,
        view.description
    )
}

/// Line-oriented wizard runner over any async reader and writer.
pub struct TerminalWizard<R, W> {
    manager: Arc<SessionManager>,
    lines: Lines<R>,
    out: W,
}

impl<R, W> TerminalWizard<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(manager: Arc<SessionManager>, reader: R, out: W) -> Self {
        Self {
            manager,
            lines: reader.lines(),
            out,
        }
    }

    async fn say(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await
    }

    /// Run until `quit` or end of input. Returns the session it drove.
    pub async fn run(&mut self) -> io::Result<Uuid> {
        let id = self.manager.create().await.id;
        tracing::info!(session_id = %id, "Terminal wizard started");

        loop {
            let view = self.manager.view(id).await.map_err(io::Error::other)?;
            self.say(&render_step(&view)).await?;

            if view.step == WizardStep::Results {
                let report = self
                    .manager
                    .with_session(id, |s| Ok(s.score_report()))
                    .await
                    .map_err(io::Error::other)?;
                self.say(&format!("\n{}\n", report.to_markdown())).await?;
            }

            for field in &view.fields {
                if !self.ask_field(id, field).await? {
                    return Ok(id);
                }
            }

            if !self.command_loop(id).await? {
                return Ok(id);
            }
        }
    }

    /// Ask one field until a valid answer or a blank line. Returns false at
    /// end of input.
    async fn ask_field(&mut self, id: Uuid, field: &FieldView) -> io::Result<bool> {
        loop {
            self.say(&render_field_prompt(field)).await?;
            let Some(line) = self.lines.next_line().await? else {
                return Ok(false);
            };
            if line.trim().is_empty() {
                return Ok(true);
            }

            let key = field.key;
            let result = match parse_answer(field.input, &line) {
                Ok(value) => self
                    .manager
                    .with_session(id, |s| s.set_input(key, value))
                    .await
                    .map_err(|e| e.to_string()),
                Err(reason) => Err(reason),
            };
            match result {
                Ok(()) => return Ok(true),
                Err(reason) => self.say(&format!("  ! {reason}\n")).await?,
            }
        }
    }

    /// Read commands until one moves the wizard. Returns false on quit or
    /// end of input.
    async fn command_loop(&mut self, id: Uuid) -> io::Result<bool> {
        loop {
            self.say("\n[next | back | restart | advice <category> <text> | quit]> ")
                .await?;
            let Some(line) = self.lines.next_line().await? else {
                return Ok(false);
            };

            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(reason) => {
                    self.say(&format!("  ! {reason}\n{HELP}\n")).await?;
                    continue;
                }
            };

            let moved = match command {
                Command::Quit => return Ok(false),
                Command::Help => {
                    self.say(&format!("{HELP}\n")).await?;
                    continue;
                }
                Command::Next => self.manager.with_session(id, |s| s.advance()).await,
                Command::Back => self.manager.with_session(id, |s| s.retreat()).await,
                Command::Restart => {
                    self.manager
                        .with_session(id, |s| {
                            s.restart();
                            Ok(s.step())
                        })
                        .await
                }
                Command::Advice { category, input } => {
                    let text = match self.manager.advise(id, category, &input).await {
                        Ok(answer) => answer.text,
                        Err(e) => format!("Error: {e}"),
                    };
                    self.say(&format!("\n{text}\n")).await?;
                    continue;
                }
            };

            match moved {
                Ok(_) => return Ok(true),
                Err(e) => self.say(&format!("  ! {e}\n")).await?,
            }
        }
    }
}
