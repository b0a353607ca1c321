use std::process::Command;

/// Opens links outside the app window.
pub trait LinkOpener: Send + Sync {
    fn open_url(&self, url: &str);
}

/// Hands urls to the desktop's default browser.
pub struct SystemBrowser;

impl LinkOpener for SystemBrowser {
    fn open_url(&self, url: &str) {
        let url = url.trim();
        if url.is_empty() {
            return;
        }
        let spawned = if cfg!(target_os = "macos") {
            Command::new("open").arg(url).spawn()
        } else if cfg!(target_os = "windows") {
            Command::new("cmd").args(["/C", "start", "", url]).spawn()
        } else {
            Command::new("xdg-open").arg(url).spawn()
        };
        if let Err(err) = spawned {
            tracing::warn!(error = %err, "could not open browser");
        }
    }
}
