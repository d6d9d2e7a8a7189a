use crate::data::error::DataError;
use crate::data::loader;
use crate::data::model::{JobDataset, SkillColumns};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// The session-scoped context: at most one loaded dataset, passed explicitly
/// to every aggregation. Views never reach for globals.
#[derive(Default)]
pub struct Session {
    /// Loaded dataset (None until the user loads a source).
    dataset: Option<JobDataset>,
}

impl Session {
    /// Load a source and replace the current dataset.
    ///
    /// Replacement happens only on success: a failed load reports its error
    /// and leaves any previously loaded dataset untouched.
    pub fn load(
        &mut self,
        source: &str,
        skills: &SkillColumns,
    ) -> Result<&JobDataset, DataError> {
        let dataset = loader::load_source(source, skills)?;
        Ok(self.dataset.insert(dataset))
    }

    /// Drop the current dataset, returning the session to its initial state.
    pub fn clear(&mut self) {
        self.dataset = None;
    }

    pub fn dataset(&self) -> Option<&JobDataset> {
        self.dataset.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let file = csv_file("Company,Python\nA,1\nB,0\n");
        let mut session = Session::default();
        session
            .load(file.path().to_str().unwrap(), &SkillColumns::StartIndex(1))
            .unwrap();
        assert_eq!(session.dataset().unwrap().len(), 2);

        let err = session
            .load("/no/such/file.csv", &SkillColumns::StartIndex(1))
            .unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
        // The earlier dataset is still there.
        assert_eq!(session.dataset().unwrap().len(), 2);
    }

    #[test]
    fn successful_load_replaces_dataset() {
        let first = csv_file("Company,Python\nA,1\n");
        let second = csv_file("Company,Python\nA,1\nB,0\nC,1\n");
        let mut session = Session::default();

        session
            .load(first.path().to_str().unwrap(), &SkillColumns::StartIndex(1))
            .unwrap();
        session
            .load(second.path().to_str().unwrap(), &SkillColumns::StartIndex(1))
            .unwrap();
        assert_eq!(session.dataset().unwrap().len(), 3);
    }

    #[test]
    fn clear_returns_to_initial_state() {
        let file = csv_file("Company,Python\nA,1\n");
        let mut session = Session::default();
        session
            .load(file.path().to_str().unwrap(), &SkillColumns::StartIndex(1))
            .unwrap();
        session.clear();
        assert!(session.dataset().is_none());
    }
}
