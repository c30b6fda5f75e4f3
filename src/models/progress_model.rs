use crate::download::DownloadSession;
use crate::ProgressState;

/// Model for the progress display in the UI
pub struct ProgressModel {
    pub completed: i32,
    pub total: i32,
    pub percent: i32,
    pub current_file: String,
}

impl From<&DownloadSession> for ProgressModel {
    fn from(session: &DownloadSession) -> Self {
        Self {
            completed: session.completed as i32,
            total: session.total as i32,
            percent: session.percent() as i32,
            current_file: session.current_file.clone(),
        }
    }
}

impl From<ProgressModel> for ProgressState {
    fn from(model: ProgressModel) -> Self {
        Self {
            completed: model.completed,
            total: model.total,
            percent: model.percent,
            current_file: model.current_file.into(),
        }
    }
}
