use std::{path::{Path, PathBuf}, io::{self, ErrorKind, Write}, fs::{create_dir_all, File, self}};

use super::Config;
use crate::gallery::error::Error;
use home::home_dir;

const CONFIG_PATH_RELATIVE: &'static str = ".photogallery";
const CONFIG_FILENAME: &'static str = "config.yml";

pub fn default_path() -> Result<PathBuf, io::Error> {
    let path = home_dir()
        .ok_or(io::Error::new(ErrorKind::NotFound, "Impossible to get home directory."))?
        .join(CONFIG_PATH_RELATIVE)
        .join(CONFIG_FILENAME);
    Ok(path)
}

fn resolve(path: Option<&Path>) -> Result<PathBuf, io::Error> {
    match path {
        Some(path) => Ok(path.to_owned()),
        None => default_path(),
    }
}

fn read(path: &Path) -> Result<Config, Error> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(serde_yaml::from_str::<Config>(&content)?),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("No config at {}, using defaults.", path.display());
            Ok(Config::default())
        },
        Err(err) => Err(err.into()),
    }
}

/// Loads the config file, or the defaults when there is none yet.
pub fn load(path: Option<&Path>) -> Result<Config, Error> {
    let config = read(&resolve(path)?)?;
    config.validate()?;
    Ok(config)
}

/// Like `load`, but a broken or invalid file gives the defaults so it can be
/// rewritten. Only I/O errors are returned.
pub fn load_for_update(path: Option<&Path>) -> Result<Config, Error> {
    let path = resolve(path)?;
    match read(&path) {
        Ok(config) => match config.validate() {
            Ok(()) => Ok(config),
            Err(err) => {
                warn!("Ignoring {}: {}", path.display(), err);
                Ok(Config::default())
            },
        },
        Err(Error::YamlError(err)) => {
            warn!("Ignoring {}: {}", path.display(), err);
            Ok(Config::default())
        },
        Err(err) => Err(err),
    }
}

pub fn save(config: &Config, path: Option<&Path>) -> Result<PathBuf, Error> {
    config.validate()?;
    let path = resolve(path)?;
    if let Some(dir) = path.parent() {
        create_dir_all(dir)?;
    }
    let content = serde_yaml::to_string(config)?;
    let mut file = File::create(&path)?;
    file.write_all(content.as_bytes())?;
    Ok(path)
}
