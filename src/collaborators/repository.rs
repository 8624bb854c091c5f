//! 代码仓库访问
//!
//! 默认实现 `FsRepository` 以目录模拟仓库：`<root>/<repo_name>/<revision>/...`，
//! 每个版本目录是一次提交的完整快照，修改时间最新的版本为最新版本。

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::external;
use crate::errors::{MarkingError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub identifier: String,
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,
}

/// 导出到压缩包的文件及其批注
#[derive(Debug, Clone, Default)]
pub struct ExportFile {
    pub path: String,
    pub annotations: Vec<String>,
}

#[async_trait]
pub trait RepositoryAccess: Send + Sync {
    async fn get_latest_revision(&self, repo_name: &str) -> Result<Revision>;

    async fn list_files(&self, repo_name: &str, revision: &str) -> Result<Vec<String>>;

    async fn get_file_content(&self, repo_name: &str, revision: &str, path: &str)
    -> Result<Vec<u8>>;

    async fn export_zip(
        &self,
        repo_name: &str,
        revision: &str,
        files: &[ExportFile],
    ) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct FsRepository {
    root: PathBuf,
}

/// 拒绝绝对路径与 `..`，防止越出仓库目录
fn safe_relative(path: &str) -> Result<PathBuf> {
    let candidate = Path::new(path);
    let safe = !path.is_empty()
        && candidate
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !safe {
        return Err(MarkingError::validation(format!(
            "Invalid repository path: {path}"
        )));
    }
    Ok(candidate.to_path_buf())
}

fn collect_files(base: &Path, dir: &Path, out: &mut Vec<String>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_files(base, &path, out)?;
        } else if let Ok(relative) = path.strip_prefix(base) {
            out.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }
    Ok(())
}

fn annotation_trailer(annotations: &[String]) -> String {
    let mut trailer = String::from("\n\n/* Annotations\n");
    for line in annotations {
        trailer.push_str(" * ");
        trailer.push_str(line);
        trailer.push('\n');
    }
    trailer.push_str(" */\n");
    trailer
}

impl FsRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn revision_dir(&self, repo_name: &str, revision: &str) -> Result<PathBuf> {
        Ok(self
            .root
            .join(safe_relative(repo_name)?)
            .join(safe_relative(revision)?))
    }
}

#[async_trait]
impl RepositoryAccess for FsRepository {
    async fn get_latest_revision(&self, repo_name: &str) -> Result<Revision> {
        let repo_dir = self.root.join(safe_relative(repo_name)?);
        let repo_name = repo_name.to_string();

        tokio::task::spawn_blocking(move || {
            let mut latest: Option<(std::time::SystemTime, String)> = None;
            let entries = std::fs::read_dir(&repo_dir)
                .map_err(|e| external(&format!("Cannot open repository {repo_name}"), e))?;
            for entry in entries {
                let entry = entry.map_err(|e| external("Cannot read repository entry", e))?;
                let meta = entry
                    .metadata()
                    .map_err(|e| external("Cannot read revision metadata", e))?;
                if !meta.is_dir() {
                    continue;
                }
                let modified = meta
                    .modified()
                    .map_err(|e| external("Cannot read revision timestamp", e))?;
                let name = entry.file_name().to_string_lossy().to_string();
                let newer = latest
                    .as_ref()
                    .is_none_or(|(t, n)| (modified, &name) > (*t, n));
                if newer {
                    latest = Some((modified, name));
                }
            }

            let (modified, identifier) = latest.ok_or_else(|| {
                MarkingError::external_collaborator(format!(
                    "Repository {repo_name} has no revisions"
                ))
            })?;
            Ok(Revision {
                identifier,
                timestamp: Some(chrono::DateTime::<chrono::Utc>::from(modified)),
            })
        })
        .await
        .map_err(|e| external("Repository task failed", e))?
    }

    async fn list_files(&self, repo_name: &str, revision: &str) -> Result<Vec<String>> {
        let dir = self.revision_dir(repo_name, revision)?;
        tokio::task::spawn_blocking(move || {
            let mut files = Vec::new();
            collect_files(&dir, &dir, &mut files)
                .map_err(|e| external(&format!("Cannot list {}", dir.display()), e))?;
            files.sort();
            Ok(files)
        })
        .await
        .map_err(|e| external("Repository task failed", e))?
    }

    async fn get_file_content(
        &self,
        repo_name: &str,
        revision: &str,
        path: &str,
    ) -> Result<Vec<u8>> {
        let full = self
            .revision_dir(repo_name, revision)?
            .join(safe_relative(path)?);
        tokio::fs::read(&full).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => MarkingError::not_found(format!(
                "File {path} not found in {repo_name}@{revision}"
            )),
            _ => external(&format!("Cannot read {path}"), e),
        })
    }

    async fn export_zip(
        &self,
        repo_name: &str,
        revision: &str,
        files: &[ExportFile],
    ) -> Result<Vec<u8>> {
        let dir = self.revision_dir(repo_name, revision)?;
        let prefix = repo_name.to_string();
        let mut entries = Vec::with_capacity(files.len());
        for file in files {
            entries.push((safe_relative(&file.path)?, file.clone()));
        }

        let bytes = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

            for (relative, file) in entries {
                let mut content = std::fs::read(dir.join(&relative))
                    .map_err(|e| external(&format!("Cannot read {}", file.path), e))?;
                if !file.annotations.is_empty() {
                    content.extend_from_slice(annotation_trailer(&file.annotations).as_bytes());
                }
                zip.start_file(format!("{}/{}", prefix, file.path), options)?;
                zip.write_all(&content)
                    .map_err(|e| external("Cannot write zip entry", e))?;
            }

            Ok(zip.finish()?.into_inner())
        })
        .await
        .map_err(|e| external("Repository task failed", e))??;

        debug!(
            "Exported {} bytes from {}@{}",
            bytes.len(),
            repo_name,
            revision
        );
        Ok(bytes)
    }
}
