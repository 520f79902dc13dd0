//! Headless shapelabel host.
//!
//! ```text
//! shapelabel [--config FILE] <image-dir> <label-dir>
//! shapelabel [--config FILE] replay <image-dir> <label-dir> <script>
//! ```

mod script;

use script::Command;
use shapelabel_core::images::{self, label_file_name};
use shapelabel_core::{
    AnnotationError, AnnotationSession, AnnotatorConfig, FileLabelStore, LabelStore, StorageError,
    codec,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

const USAGE: &str = "usage: shapelabel [--config FILE] <image-dir> <label-dir>\n       \
                     shapelabel [--config FILE] replay <image-dir> <label-dir> <script>";

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}\n{usage}", usage = USAGE)]
    Usage(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Script(#[from] script::ScriptError),
    #[error(transparent)]
    Annotation(#[from] AnnotationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

enum Action {
    List {
        images: PathBuf,
        labels: PathBuf,
    },
    Replay {
        images: PathBuf,
        labels: PathBuf,
        script: PathBuf,
    },
}

struct Args {
    config: Option<PathBuf>,
    action: Action,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, CliError> {
    let mut config = None;
    let mut positional = Vec::new();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| CliError::Usage("--config needs a file".to_string()))?;
                config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Err(CliError::Usage("shapelabel".to_string())),
            _ => positional.push(arg),
        }
    }

    let action = match positional.as_slice() {
        [cmd, images, labels, script] if cmd == "replay" => Action::Replay {
            images: images.into(),
            labels: labels.into(),
            script: script.into(),
        },
        [images, labels] if images != "replay" => Action::List {
            images: images.into(),
            labels: labels.into(),
        },
        _ => return Err(CliError::Usage("wrong arguments".to_string())),
    };
    Ok(Args { config, action })
}

fn load_config(path: Option<&Path>) -> Result<AnnotatorConfig, CliError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match AnnotatorConfig::default_path() {
            Some(path) => path,
            None => return Ok(AnnotatorConfig::default()),
        },
    };
    log::debug!("config from {}", path.display());
    Ok(AnnotatorConfig::load(&path)?)
}

/// Print every image's annotations. Returns the number of label files that
/// failed to load.
fn list(config: &AnnotatorConfig, image_dir: &Path, label_dir: &Path) -> Result<usize, CliError> {
    let store = FileLabelStore::new(label_dir.to_path_buf())?;
    let mut failed = 0;
    for image in images::scan(image_dir, &config.image_extensions)? {
        let name = label_file_name(&image);
        println!("{}", image.display());
        let Some(text) = store.read(&name)? else {
            continue;
        };
        match codec::decode_set(&text) {
            Ok(set) => {
                for label in set.display_labels() {
                    println!("  {}", label);
                }
            }
            Err(e) => {
                failed += 1;
                println!("  error in {}: {}", name, e);
            }
        }
    }
    Ok(failed)
}

fn replay(
    config: AnnotatorConfig,
    image_dir: &Path,
    label_dir: &Path,
    script_path: &Path,
) -> Result<usize, CliError> {
    let text = std::fs::read_to_string(script_path).map_err(|source| CliError::Read {
        path: script_path.to_path_buf(),
        source,
    })?;
    let commands = script::parse(&text)?;

    let store = FileLabelStore::new(label_dir.to_path_buf())?;
    let mut session = AnnotationSession::new(store, config);
    let mut failed = 0;
    if let Err(e) = session.load_images(image_dir) {
        surface(e, &mut failed)?;
    }

    for command in commands {
        let result = match command {
            Command::Down(p) => session.on_pointer_down(p).map(drop),
            Command::Up(p) => session.on_pointer_up(p).map(drop),
            Command::Move(p) => {
                session.on_pointer_move(p);
                Ok(())
            }
            Command::Kind(kind) => {
                session.on_shape_type_selected(kind);
                Ok(())
            }
            Command::Delete => session.on_delete_requested().map(drop),
            Command::Cancel => {
                session.on_cancel_requested();
                Ok(())
            }
            Command::Next => session.next().map(drop),
            Command::Prev => session.prev().map(drop),
        };
        if let Err(e) = result {
            surface(e, &mut failed)?;
        }
    }
    session.save()?;

    let (current, total) = session.position();
    match session.current_image_path() {
        Some(path) => println!("{} ({}/{})", path.display(), current, total),
        None => println!("no image open"),
    }
    for label in session.display_labels() {
        println!("  {}", label);
    }
    Ok(failed)
}

/// Report a recoverable error and keep going; stop on anything fatal.
fn surface(e: AnnotationError, failed: &mut usize) -> Result<(), CliError> {
    if e.is_fatal() {
        return Err(e.into());
    }
    log::warn!("{}", e);
    eprintln!("warning: {}", e);
    *failed += 1;
    Ok(())
}

fn run() -> Result<usize, CliError> {
    let args = parse_args(std::env::args().skip(1))?;
    let config = load_config(args.config.as_deref())?;
    match args.action {
        Action::List { images, labels } => list(&config, &images, &labels),
        Action::Replay {
            images,
            labels,
            script,
        } => replay(config, &images, &labels, &script),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting shapelabel");

    match run() {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            eprintln!("{} label file(s) failed to load", failed);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, CliError> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_list_args() {
        let parsed = args(&["--config", "cfg.json", "imgs", "labels"]).unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("cfg.json")));
        assert!(matches!(
            parsed.action,
            Action::List { ref images, .. } if images == Path::new("imgs")
        ));
    }

    #[test]
    fn test_parse_replay_args() {
        let parsed = args(&["replay", "imgs", "labels", "run.txt"]).unwrap();
        assert!(parsed.config.is_none());
        assert!(matches!(
            parsed.action,
            Action::Replay { ref script, .. } if script == Path::new("run.txt")
        ));
    }

    #[test]
    fn test_bad_args() {
        assert!(matches!(args(&["imgs"]), Err(CliError::Usage(_))));
        assert!(matches!(args(&["replay", "a", "b"]), Err(CliError::Usage(_))));
        assert!(matches!(args(&["--config"]), Err(CliError::Usage(_))));
    }
}
