mod progress_model;

pub use progress_model::ProgressModel;
