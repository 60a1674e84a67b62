//! Capabilities the note commands need from their environment.
//!
//! Paths are vault-relative strings in the form produced by
//! [`crate::paths::normalize_path`].
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

#[async_trait]
pub trait Vault: Send + Sync {
    async fn exists(&self, path: &str) -> io::Result<bool>;

    /// Create a new file. Fails if something already exists at `path`.
    async fn create(&self, path: &str, content: &str) -> io::Result<()>;

    /// Atomically replace the content of an existing file with
    /// `transform(old)`. No other `process` on the same path may interleave.
    async fn process(
        &self,
        path: &str,
        transform: &(dyn for<'a> Fn(&'a str) -> String + Send + Sync),
    ) -> io::Result<String>;

    async fn create_folder(&self, path: &str) -> io::Result<()>;

    /// Bring the file to the user's attention.
    async fn open(&self, path: &str) -> io::Result<()>;
}

/// Fire-and-forget user feedback.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// How [`FsVault::open`] surfaces a note.
#[derive(Debug, Clone)]
pub enum Opener {
    /// Print the absolute path on stdout.
    Print,
    /// Launch an editor with its own arguments followed by the path.
    Editor { program: String, args: Vec<String> },
}

impl Opener {
    /// `$VISUAL`, then `$EDITOR`, else print.
    pub fn from_env() -> Self {
        std::env::var("VISUAL")
            .ok()
            .and_then(|v| Opener::editor(&v))
            .or_else(|| std::env::var("EDITOR").ok().and_then(|v| Opener::editor(&v)))
            .unwrap_or(Opener::Print)
    }

    /// Split an editor command line such as `code --wait` on whitespace.
    pub fn editor(command: &str) -> Option<Self> {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Opener::Editor {
            program,
            args: words.collect(),
        })
    }
}

/// A vault backed by a directory on disk.
pub struct FsVault {
    root: PathBuf,
    opener: Opener,
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl FsVault {
    pub fn new(root: PathBuf, opener: Opener) -> Self {
        FsVault {
            root,
            opener,
            locks: DashMap::new(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        Arc::clone(self.locks.entry(path.to_path_buf()).or_default().value())
    }

    /// Drop the mutex for `path` once nobody but the map and `lock` holds it.
    fn release(&self, path: &Path, lock: Arc<Mutex<()>>) {
        self.locks
            .remove_if(path, |_, held| Arc::ptr_eq(held, &lock) && Arc::strong_count(held) == 2);
    }
}

/// Write `content` to a temp file next to `path` and move it into place.
///
/// With `clobber == false` the move fails if `path` already exists and the new
/// file gets `NEW_NOTE_MODE`. Otherwise `path` must be the real file (not a
/// symlink) and its permissions are carried over.
async fn write_via_temp(path: PathBuf, content: String, clobber: bool) -> io::Result<()> {
    tokio::task::spawn_blocking(move || {
        use std::io::Write;

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        if clobber {
            let permissions = std::fs::metadata(&path)?.permissions();
            tmp.as_file().set_permissions(permissions)?;
        } else {
            set_new_note_mode(tmp.as_file())?;
        }
        tmp.as_file().sync_all()?;
        if clobber {
            tmp.persist(&path).map_err(|e| e.error)?;
        } else {
            tmp.persist_noclobber(&path).map_err(|e| e.error)?;
        }
        Ok(())
    })
    .await
    .map_err(io::Error::other)?
}

/// Mode for freshly created notes; temp files start out owner-only.
#[cfg(unix)]
const NEW_NOTE_MODE: u32 = 0o644;

#[cfg(unix)]
fn set_new_note_mode(file: &std::fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(std::fs::Permissions::from_mode(NEW_NOTE_MODE))
}

#[cfg(not(unix))]
fn set_new_note_mode(_file: &std::fs::File) -> io::Result<()> {
    Ok(())
}

#[async_trait]
impl Vault for FsVault {
    async fn exists(&self, path: &str) -> io::Result<bool> {
        fs::try_exists(self.resolve(path)).await
    }

    async fn create(&self, path: &str, content: &str) -> io::Result<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).await?;
        }
        let lock = self.lock_for(&full);
        let result = {
            let _guard = lock.lock().await;
            write_via_temp(full.clone(), content.to_string(), false).await
        };
        self.release(&full, lock);
        result
    }

    async fn process(
        &self,
        path: &str,
        transform: &(dyn for<'a> Fn(&'a str) -> String + Send + Sync),
    ) -> io::Result<String> {
        // Write next to the real file so a symlinked note keeps its link
        let real = fs::canonicalize(self.resolve(path)).await?;
        let lock = self.lock_for(&real);
        let result = {
            let _guard = lock.lock().await;
            match fs::read_to_string(&real).await {
                Ok(old) => {
                    let new = transform(&old);
                    write_via_temp(real.clone(), new.clone(), true)
                        .await
                        .map(|()| new)
                }
                Err(e) => Err(e),
            }
        };
        self.release(&real, lock);
        result
    }

    async fn create_folder(&self, path: &str) -> io::Result<()> {
        fs::create_dir_all(self.resolve(path)).await
    }

    async fn open(&self, path: &str) -> io::Result<()> {
        let full = self.resolve(path);
        match &self.opener {
            Opener::Print => {
                println!("{}", full.display());
                Ok(())
            }
            Opener::Editor { program, args } => {
                debug!("opening {} with {program} {args:?}", full.display());
                let status = tokio::process::Command::new(program)
                    .args(args)
                    .arg(&full)
                    .status()
                    .await?;
                if status.success() {
                    Ok(())
                } else {
                    Err(io::Error::other(format!("{program} exited with {status}")))
                }
            }
        }
    }
}
