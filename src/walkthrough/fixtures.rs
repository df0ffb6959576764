use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::domain::naming;

/// Create a local fixture file whose content is `content` repeated `size`
/// times.
///
/// The file name is prefixed with a truncated random token so that repeated
/// runs never collide on disk; `token_len` controls how much of the token is
/// kept (see [`naming::disambiguate`]).
pub async fn create_temp_file(
    dir: &Path,
    size: usize,
    file_name: &str,
    content: &str,
    token_len: usize,
) -> std::io::Result<PathBuf> {
    let path = dir.join(naming::disambiguate(file_name, token_len));

    let mut file = tokio::fs::File::create(&path).await?;
    file.write_all(content.repeat(size).as_bytes()).await?;
    file.flush().await?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_repeats_content() {
        let dir = std::env::temp_dir();
        let path = create_temp_file(&dir, 300, "fixture.txt", "f", 6).await.unwrap();

        let data = tokio::fs::read(&path).await.unwrap();
        assert_eq!(data.len(), 300);
        assert!(data.iter().all(|b| *b == b'f'));

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with("fixture.txt"));
        assert_eq!(name.len(), 6 + "fixture.txt".len());

        tokio::fs::remove_file(&path).await.ok();
    }

    #[tokio::test]
    async fn fixtures_get_distinct_names() {
        let dir = std::env::temp_dir();
        let first = create_temp_file(&dir, 1, "same.txt", "x", 6).await.unwrap();
        let second = create_temp_file(&dir, 1, "same.txt", "x", 6).await.unwrap();
        assert_ne!(first, second);

        tokio::fs::remove_file(&first).await.ok();
        tokio::fs::remove_file(&second).await.ok();
    }
}
