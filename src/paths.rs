use std::{
    env,
    path::{Path, PathBuf},
};

use stacked_errors::{bail, Result, StackableErr};
use tokio::fs;

/// Expands a leading `~` or `~/` against the `HOME` environment variable. Any
/// other path is returned as is.
pub fn expand_home(path_str: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path_str.as_ref();
    let rest = if path == Path::new("~") {
        Path::new("")
    } else if let Ok(rest) = path.strip_prefix("~/") {
        rest
    } else {
        return Ok(path.to_owned())
    };
    let home = env::var_os("HOME")
        .stack_err_with(|| format!("expand_home(path_str: {path:?}) -> `HOME` is not set"))?;
    Ok(PathBuf::from(home).join(rest))
}

/// Expands a leading `~`, then canonicalizes and checks the existence of a
/// file path. Also adds on better information to errors.
///
/// Note: this does not prevent TOCTOU bugs.
pub async fn acquire_file_path(file_path_str: impl AsRef<Path>) -> Result<PathBuf> {
    let file_path_str = file_path_str.as_ref();
    let expanded = expand_home(file_path_str)?;
    let path = fs::canonicalize(&expanded)
        .await
        .stack_err_with(|| format!("acquire_file_path(file_path_str: {file_path_str:?})"))?;
    if !path.is_file() {
        bail!("acquire_file_path(file_path_str: {file_path_str:?}) -> is not a file")
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_are_untouched() {
        assert_eq!(
            expand_home("/etc/ssh/key").unwrap(),
            PathBuf::from("/etc/ssh/key")
        );
        assert_eq!(expand_home("~user/key").unwrap(), PathBuf::from("~user/key"));
    }

    #[test]
    fn tilde_is_expanded() {
        let Some(home) = env::var_os("HOME") else {
            return
        };
        assert_eq!(
            expand_home("~/.ssh/id_rsa").unwrap(),
            PathBuf::from(&home).join(".ssh/id_rsa")
        );
        assert_eq!(expand_home("~").unwrap(), PathBuf::from(&home));
    }

    #[tokio::test]
    async fn acquire_rejects_missing_and_directories() {
        assert!(acquire_file_path("/definitely/not/a/real/key").await.is_err());
        let dir = env::temp_dir();
        assert!(acquire_file_path(&dir).await.is_err());
    }
}
