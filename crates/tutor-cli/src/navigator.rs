//! Terminal navigation: print the boundary URL and end the session.

use colored::Colorize;
use tokio::sync::watch;
use tutor_core::interaction::{Destination, Navigator};

pub struct TerminalNavigator {
    login_url: String,
    logout_url: String,
    left: watch::Sender<Option<Destination>>,
}

impl TerminalNavigator {
    /// Returns the navigator and a receiver that observes the first navigation.
    pub fn new(login_url: String, logout_url: String) -> (Self, watch::Receiver<Option<Destination>>) {
        let (left, rx) = watch::channel(None);
        (
            Self {
                login_url,
                logout_url,
                left,
            },
            rx,
        )
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, destination: Destination) {
        let url = match destination {
            Destination::Login => &self.login_url,
            Destination::Logout => &self.logout_url,
        };
        println!("{} {}", "Continue in your browser:".bright_magenta(), url);
        tracing::info!("[Navigator] Leaving session for {:?}", destination);
        self.left.send_replace(Some(destination));
    }
}
