//! Line-driven shell.

use std::io::Write;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::RwLock;
use tracing::debug;

use vibevid_api::ApiClient;
use vibevid_auth::{AuthFlow, AuthStage};
use vibevid_library::{FileSelection, LibraryClient, LibraryState, UploadPipeline};
use vibevid_session::SessionStore;

/// Interactive shell over the core client components.
pub struct Shell {
    api: ApiClient,
    store: SessionStore,
    flow: AuthFlow,
    library: LibraryClient,
    uploader: UploadPipeline,
    /// Handle entered last, reused for the verification step.
    handle: RwLock<Option<String>>,
}

impl Shell {
    pub fn new(api: ApiClient, store: SessionStore) -> Self {
        Self {
            api,
            store,
            flow: AuthFlow::new(),
            library: LibraryClient::new(),
            uploader: UploadPipeline::new(),
            handle: RwLock::new(None),
        }
    }

    /// Run the command loop until `quit` or end of input.
    pub async fn run(&self) -> anyhow::Result<()> {
        if let Some(session) = self.store.initialize().await? {
            println!("Welcome back.");
            self.library.refresh(&self.api, &session, &self.store).await;
        }
        self.print_surface().await;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        self.prompt()?;
        while let Some(line) = lines.next_line().await.context("reading stdin")? {
            if !self.dispatch(line.trim()).await {
                break;
            }
            self.print_surface().await;
            self.prompt()?;
        }
        Ok(())
    }

    fn prompt(&self) -> anyhow::Result<()> {
        print!("vibevid> ");
        std::io::stdout().flush().context("flushing prompt")?;
        Ok(())
    }

    /// Handle one command line. Returns false to exit the loop.
    async fn dispatch(&self, line: &str) -> bool {
        let mut parts = line.split_whitespace();
        let command = match parts.next() {
            Some(c) => c,
            None => return true,
        };
        let args: Vec<&str> = parts.collect();

        match command {
            "quit" | "exit" => return false,
            "help" => self.print_help().await,
            _ => {
                if self.store.is_active().await {
                    self.dispatch_library(command, &args).await;
                } else {
                    self.dispatch_auth(command, &args).await;
                }
            }
        }
        true
    }

    async fn dispatch_auth(&self, command: &str, args: &[&str]) {
        match (command, args) {
            ("signup", [handle, password]) => {
                self.remember_handle(handle).await;
                let (email, phone) = split_handle(handle);
                let _ = self
                    .flow
                    .submit_signup(&self.api, &email, &phone, password)
                    .await;
            }
            ("code", [code]) => {
                let Some(handle) = self.handle.read().await.clone() else {
                    println!("No contact handle yet; sign up first.");
                    return;
                };
                let (email, phone) = split_handle(&handle);
                let _ = self
                    .flow
                    .submit_verify(&self.api, &email, &phone, code)
                    .await;
            }
            ("login", [handle, password]) => {
                self.remember_handle(handle).await;
                let (email, phone) = split_handle(handle);
                if let Ok(session) = self
                    .flow
                    .submit_login(&self.api, &self.store, &email, &phone, password)
                    .await
                {
                    self.library.refresh(&self.api, &session, &self.store).await;
                }
            }
            ("switch", [stage]) => {
                let stage = match *stage {
                    "signup" => AuthStage::Signup,
                    "verify" => AuthStage::Verify,
                    "login" => AuthStage::Login,
                    other => {
                        println!("Unknown stage: {}", other);
                        return;
                    }
                };
                if self.flow.switch_to(stage).await.is_err() {
                    println!("Busy; wait for the pending request.");
                }
            }
            _ => println!("Unknown command; try `help`."),
        }
    }

    async fn dispatch_library(&self, command: &str, args: &[&str]) {
        let Some(session) = self.store.current().await else {
            return;
        };

        match (command, args) {
            ("list", []) => {
                self.library.refresh(&self.api, &session, &self.store).await;
            }
            ("upload", [path]) => {
                match FileSelection::from_path(path).await {
                    Ok(selection) => {
                        debug!(file = %selection.file_name, "Staged upload");
                        if let Err(e) = self.uploader.select(selection).await {
                            println!("{}", e);
                            return;
                        }
                    }
                    Err(e) => {
                        println!("{}", e);
                        return;
                    }
                }
                if let Err(e) = self
                    .uploader
                    .upload(&self.api, &session, &self.store, &self.library)
                    .await
                {
                    println!("Upload failed: {}", e);
                }
            }
            ("url", [index]) => match self.nth_video(index).await {
                Some(id) => println!("{}", self.api.stream_url(&id)),
                None => println!("No such video."),
            },
            ("logout", []) => {
                if let Err(e) = self.store.clear().await {
                    println!("Logout failed: {}", e);
                    return;
                }
                self.flow.reset().await;
                println!("Logged out.");
            }
            _ => println!("Unknown command; try `help`."),
        }

        // Any authorized call may have torn the session down.
        if !self.store.is_active().await && command != "logout" {
            self.flow.reset().await;
            println!("Session expired; please sign in again.");
        }
    }

    async fn nth_video(&self, index: &str) -> Option<vibevid_models::VideoId> {
        let index: usize = index.parse().ok()?;
        let state = self.library.state().await;
        let videos = state.videos()?;
        videos.get(index).map(|v| v.id.clone())
    }

    async fn remember_handle(&self, handle: &str) {
        *self.handle.write().await = Some(handle.to_string());
    }

    async fn print_surface(&self) {
        if self.store.is_active().await {
            match self.library.state().await {
                LibraryState::Loading => println!("Loading videos…"),
                LibraryState::Error(message) => println!("Error: {}", message),
                LibraryState::Empty => println!("No videos yet. Upload your first one!"),
                LibraryState::Populated(videos) => {
                    println!("Your videos:");
                    for (i, video) in videos.iter().enumerate() {
                        println!("  [{}] {} ({})", i, video.display_name, video.media_type);
                    }
                }
            }
            return;
        }

        let stage = match self.flow.stage().await {
            AuthStage::Signup => "Create your account — signup <email|phone> <password>",
            AuthStage::Verify => "Verify your account — code <otp>",
            AuthStage::Login => "Welcome back — login <email|phone> <password>",
        };
        println!("{}", stage);
        if let Some(message) = self.flow.message().await {
            println!("{}", message);
        }
    }

    async fn print_help(&self) {
        if self.store.is_active().await {
            println!("Commands: list, upload <path>, url <n>, logout, quit");
        } else {
            println!("Commands: signup <email|phone> <password>, code <otp>,");
            println!("          login <email|phone> <password>, switch <stage>, quit");
        }
    }
}

/// Map one free-form handle onto the (email, phone) form fields.
fn split_handle(handle: &str) -> (String, String) {
    if handle.contains('@') {
        (handle.to_string(), String::new())
    } else {
        (String::new(), handle.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_with_at_sign_are_emails() {
        assert_eq!(
            split_handle("a@x.com"),
            ("a@x.com".to_string(), String::new())
        );
        assert_eq!(
            split_handle("+15550100"),
            (String::new(), "+15550100".to_string())
        );
    }
}
