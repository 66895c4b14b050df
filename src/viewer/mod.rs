use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

/// Something that can show a saved workbook to the user
pub trait Viewer {
    fn open(&mut self, path: &Path) -> Result<()>;
}

/// Hands the file to the desktop's default application
pub struct SystemViewer;

impl SystemViewer {
    fn command(path: &Path) -> Command {
        #[cfg(target_os = "macos")]
        let command = {
            let mut c = Command::new("open");
            c.arg(path);
            c
        };
        #[cfg(target_os = "windows")]
        let command = {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]).arg(path);
            c
        };
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let command = {
            let mut c = Command::new("xdg-open");
            c.arg(path);
            c
        };
        command
    }
}

impl Viewer for SystemViewer {
    fn open(&mut self, path: &Path) -> Result<()> {
        let status = Self::command(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .context("Failed to launch file viewer")?;

        if !status.success() {
            bail!("File viewer exited with {}", status);
        }
        Ok(())
    }
}

/// Open `path`, downgrading failure to a warning
///
/// The workbook is already saved by the time this runs; not being able to
/// show it is not an error for the caller.
pub fn open_best_effort(viewer: &mut dyn Viewer, path: &Path) {
    if let Err(e) = viewer.open(path) {
        tracing::warn!(path = %path.display(), "could not open workbook: {:#}", e);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    struct MockViewer {
        opened: Vec<PathBuf>,
        fail: bool,
    }

    impl Viewer for MockViewer {
        fn open(&mut self, path: &Path) -> Result<()> {
            if self.fail {
                bail!("no display");
            }
            self.opened.push(path.to_path_buf());
            Ok(())
        }
    }

    #[test]
    fn test_open_best_effort_opens() {
        let mut viewer = MockViewer { opened: Vec::new(), fail: false };
        open_best_effort(&mut viewer, Path::new("chat_history.xlsx"));
        assert_eq!(viewer.opened, vec![PathBuf::from("chat_history.xlsx")]);
    }

    #[test]
    fn test_open_best_effort_swallows_failure() {
        let mut viewer = MockViewer { opened: Vec::new(), fail: true };
        open_best_effort(&mut viewer, Path::new("chat_history.xlsx"));
        assert!(viewer.opened.is_empty());
    }

    #[test]
    fn test_system_command_targets_path() {
        let command = SystemViewer::command(Path::new("/tmp/out.xlsx"));
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args.last().map(|a| a.to_os_string()), Some("/tmp/out.xlsx".into()));
    }
}
