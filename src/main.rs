mod app;
mod data;
mod state;
mod ui;
mod views;

use app::ExplorerApp;
use data::model::SkillColumns;
use views::ViewConfig;

// Where skill-indicator columns begin in the published postings layout.
// Overridable per load: `load <source> <skill-start>`.
const DEFAULT_SKILL_START: usize = 10;

fn main() -> std::io::Result<()> {
    env_logger::init();

    let mut app = ExplorerApp::new(
        &ViewConfig::default(),
        SkillColumns::StartIndex(DEFAULT_SKILL_START),
    );
    app.run()
}
