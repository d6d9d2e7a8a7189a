use std::io::{self, BufRead, Write};

use crate::data::model::SkillColumns;
use crate::state::Session;
use crate::ui::render;
use crate::views::{ViewConfig, ViewDef, view_registry};

// ---------------------------------------------------------------------------
// Interactive explorer loop
// ---------------------------------------------------------------------------

/// One command per user action: load a source, pick a section, or manage the
/// session. Every action runs to completion before the next line is read.
pub struct ExplorerApp {
    session: Session,
    views: Vec<ViewDef>,
    /// Skill configuration applied to loads without an explicit override.
    default_skills: SkillColumns,
}

enum Outcome {
    Continue(String),
    Quit,
}

impl ExplorerApp {
    pub fn new(config: &ViewConfig, default_skills: SkillColumns) -> Self {
        ExplorerApp {
            session: Session::default(),
            views: view_registry(config),
            default_skills,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        writeln!(stdout, "insightbar – job-market dataset explorer")?;
        write!(stdout, "{}", self.help())?;
        loop {
            write!(stdout, "insightbar> ")?;
            stdout.flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break; // EOF
            }
            match self.execute(line.trim()) {
                Outcome::Continue(output) => write!(stdout, "{output}")?,
                Outcome::Quit => break,
            }
        }
        Ok(())
    }

    fn execute(&mut self, line: &str) -> Outcome {
        let (command, args) = match line.split_once(char::is_whitespace) {
            Some((command, args)) => (command, args.trim()),
            None => (line, ""),
        };

        let output = match command {
            "" => String::new(),
            "help" => self.help(),
            "quit" | "exit" => return Outcome::Quit,
            "views" => self.list_views(),
            "clear" => {
                self.session.clear();
                "Dataset cleared.\n".to_string()
            }
            "load" => self.load(args),
            "view" => self.show_view(args),
            other => format!("Unknown command {other:?}. `help` lists the commands.\n"),
        };
        Outcome::Continue(output)
    }

    fn help(&self) -> String {
        [
            "Commands:",
            "  load <path-or-url> [skill-start]  load a dataset; the optional index",
            "                                    overrides where skill columns begin",
            "  views                             list the available sections",
            "  view <id>                         show one section",
            "  clear                             drop the loaded dataset",
            "  help                              show this help",
            "  quit                              leave",
        ]
        .join("\n")
            + "\n"
    }

    fn list_views(&self) -> String {
        let width = self.views.iter().map(|v| v.id.len()).max().unwrap_or(0);
        self.views
            .iter()
            .map(|v| format!("  {:<width$}  {}\n", v.id, v.title))
            .collect()
    }

    fn load(&mut self, args: &str) -> String {
        let words: Vec<&str> = args.split_whitespace().collect();
        if words.is_empty() {
            return "Usage: load <path-or-url> [skill-start]\n".to_string();
        }

        // A trailing integer is a skill-start override; the source itself may
        // contain spaces.
        let (source_words, skills) = match words.split_last() {
            Some((last, rest)) if !rest.is_empty() => match last.parse::<usize>() {
                Ok(start) => (rest, SkillColumns::StartIndex(start)),
                Err(_) => (&words[..], self.default_skills.clone()),
            },
            _ => (&words[..], self.default_skills.clone()),
        };
        let source = source_words.join(" ");

        match self.session.load(&source, &skills) {
            Ok(dataset) => format!(
                "Loaded {} postings with {} columns ({} skill columns).\n",
                dataset.len(),
                dataset.columns.len(),
                dataset.skill_indices().len(),
            ),
            Err(e) => {
                log::error!("Failed to load {source}: {e}");
                format!("Load failed: {e}\n")
            }
        }
    }

    fn show_view(&self, id: &str) -> String {
        if id.is_empty() {
            return "Usage: view <id>   (`views` lists the sections)\n".to_string();
        }
        // Selecting a view before a load is a guarded no-op, not an error.
        let Some(dataset) = self.session.dataset() else {
            return "No dataset loaded. Run `load <path-or-url>` first.\n".to_string();
        };
        let Some(view) = self.views.iter().find(|v| v.id == id) else {
            return format!("Unknown view {id:?}. `views` lists the sections.\n");
        };

        match view.build(dataset) {
            Ok(derived) => format!("{}\n{}", view.title, render::render(&derived)),
            Err(e) => {
                log::error!("View {id} failed: {e}");
                format!("{}: {e}\n", view.title)
            }
        }
    }
}
