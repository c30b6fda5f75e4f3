use crate::cli::Args;
use crate::download::{self, DownloadError, DownloadSession};
use crate::github::{self, GithubClient};
use crate::models::ProgressModel;
use crate::{MainWindow, ProgressState};
use anyhow::{Context, Result};
use slint::ComponentHandle;
use std::path::PathBuf;
use std::sync::Arc;

pub struct App {
    window: MainWindow,
    client: Arc<GithubClient>,
}

impl App {
    pub fn new(args: Args) -> Result<Self> {
        let window = MainWindow::new().context("Failed to create window")?;
        let client = Arc::new(GithubClient::new()?);

        // Pre-fill the form; CLI arguments win over persisted settings
        let config = crate::config::load();
        let url = args.url.unwrap_or(config.last_url);
        let folder = args
            .dest
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or(config.download_dir);
        window.set_commit_url(url.into());
        window.set_download_folder(folder.into());

        let app = Self { window, client };
        app.setup_callbacks()?;

        Ok(app)
    }

    fn setup_callbacks(&self) -> Result<()> {
        let window_weak = self.window.as_weak();
        self.window.on_browse_folder(move || {
            let window = window_weak.unwrap();
            let current = window.get_download_folder().to_string();

            let mut dialog = rfd::FileDialog::new();
            if !current.is_empty() {
                dialog = dialog.set_directory(&current);
            }

            if let Some(folder) = dialog.pick_folder() {
                window.set_download_folder(folder.to_string_lossy().to_string().into());
                save_settings(&window);
            }
        });

        let window_weak = self.window.as_weak();
        self.window.on_dismiss_dialog(move || {
            let window = window_weak.unwrap();
            window.set_dialog_visible(false);
        });

        let window_weak = self.window.as_weak();
        let client = Arc::clone(&self.client);
        self.window.on_start_download(move || {
            let window = window_weak.unwrap();
            let url = window.get_commit_url().trim().to_string();
            let folder = window.get_download_folder().trim().to_string();

            if folder.is_empty() {
                show_dialog(
                    &window,
                    "Error",
                    &DownloadError::MissingDestination.to_string(),
                );
                return;
            }

            let Some(reference) = github::parse_commit_url(&url) else {
                show_dialog(
                    &window,
                    "Error",
                    &DownloadError::InvalidReference.to_string(),
                );
                return;
            };

            save_settings(&window);

            // Lock the form for the duration; only one download at a time
            window.set_downloading(true);
            window.set_status_text("Connecting...".into());
            window.set_progress_state(ProgressState::default());

            let dest = PathBuf::from(folder);
            let client = Arc::clone(&client);
            let weak = window.as_weak();

            // The engine is strictly sequential; it runs off the UI thread so
            // the window keeps repainting while it blocks on I/O
            std::thread::spawn(move || {
                let result =
                    download::download_commit_files(client.as_ref(), &reference, &dest, |session| {
                        let snapshot = session.clone();
                        let _ = weak.upgrade_in_event_loop(move |window| {
                            apply_progress(&window, &snapshot);
                        });
                    });

                let _ = weak.upgrade_in_event_loop(move |window| {
                    finish_download(&window, result);
                });
            });
        });

        Ok(())
    }

    pub fn run(self) -> Result<()> {
        self.window.run().context("Failed to run window")?;
        Ok(())
    }
}

/// Reflect a session snapshot in the progress bar and status line
fn apply_progress(window: &MainWindow, session: &DownloadSession) {
    let status = if session.failed {
        "Download failed".to_string()
    } else if session.completed == 0 {
        format!("Starting download of {} files...", session.total)
    } else {
        format!(
            "Downloaded ({}/{}) {}%: {}",
            session.completed,
            session.total,
            session.percent(),
            session.current_file
        )
    };

    window.set_status_text(status.into());
    window.set_progress_state(ProgressModel::from(session).into());
}

/// Terminal state: success, nothing to do, or one of the error kinds
fn finish_download(window: &MainWindow, result: Result<DownloadSession, DownloadError>) {
    match result {
        Ok(session) if session.total == 0 => {
            window.set_status_text("Idle".into());
            window.set_progress_state(ProgressState::default());
            show_dialog(window, "Info", "No added or modified files to download.");
        }
        Ok(_) => {
            window.set_status_text("Done".into());
            show_dialog(window, "Success", "Files downloaded successfully.");
        }
        Err(e) => {
            window.set_status_text("Download failed".into());
            window.set_progress_state(ProgressState::default());
            show_dialog(window, "Error", &e.to_string());
        }
    }

    window.set_downloading(false);
}

fn show_dialog(window: &MainWindow, title: &str, text: &str) {
    window.set_dialog_title(title.into());
    window.set_dialog_text(text.into());
    window.set_dialog_visible(true);
}

fn save_settings(window: &MainWindow) {
    let config = crate::config::Config {
        download_dir: window.get_download_folder().to_string(),
        last_url: window.get_commit_url().to_string(),
    };
    if let Err(e) = crate::config::save(&config) {
        eprintln!("Warning: Could not save settings: {}", e);
    }
}
