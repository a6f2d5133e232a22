use crate::error::AppError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// A local file and the object key it is uploaded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadItem {
    pub path: PathBuf,
    pub bucket: String,
    pub key: String,
}

impl UploadItem {
    pub fn destination(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

fn collect_files(dir: &Path, extension: &str, found: &mut Vec<PathBuf>) -> Result<(), AppError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, extension, found)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(extension) {
            found.push(path);
        }
    }
    Ok(())
}

/// Key for a file: its last three path segments joined with `/`, e.g.
/// `moneypuck/season_level/Skaters_2023-2024_regular.parquet`.
fn object_key(path: &Path, prefix: Option<&str>) -> String {
    let segments: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let tail = segments[segments.len().saturating_sub(3)..].join("/");
    match prefix {
        Some(prefix) if !prefix.is_empty() => {
            format!("{}/{}", prefix.trim_end_matches('/'), tail)
        }
        _ => tail,
    }
}

/// Lists every file under `data_dir` with the given extension, in sorted
/// order, paired with its destination key.
pub fn plan_uploads(
    data_dir: &Path,
    extension: &str,
    bucket: &str,
    prefix: Option<&str>,
) -> Result<Vec<UploadItem>, AppError> {
    let extension = extension.trim_start_matches('.');
    let mut files = Vec::new();
    if data_dir.is_dir() {
        collect_files(data_dir, extension, &mut files)?;
    }
    if files.is_empty() {
        return Err(AppError::NoFilesFound {
            extension: extension.to_string(),
            dir: data_dir.display().to_string(),
        });
    }
    files.sort();

    let plan: Vec<UploadItem> = files
        .into_iter()
        .map(|path| UploadItem {
            key: object_key(&path, prefix),
            bucket: bucket.to_string(),
            path,
        })
        .collect();
    info!("Planned {} uploads to s3://{}", plan.len(), bucket);
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_object_key_uses_last_three_segments() {
        let path = Path::new("/srv/data/moneypuck/season_level/Skaters_2023_regular.parquet");
        assert_eq!(
            object_key(path, None),
            "moneypuck/season_level/Skaters_2023_regular.parquet"
        );
        assert_eq!(
            object_key(path, Some("nhl-data/")),
            "nhl-data/moneypuck/season_level/Skaters_2023_regular.parquet"
        );
        assert_eq!(object_key(Path::new("a.parquet"), None), "a.parquet");
    }

    #[test]
    fn test_plan_is_recursive_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("moneypuck");
        touch(&data_dir.join("season_level").join("Teams_2008_regular.parquet"));
        touch(&data_dir.join("season_level").join("Goalies_2008_regular.parquet"));
        touch(&data_dir.join("season_level").join("Goalies_2008_regular.csv"));
        touch(&data_dir.join("shots").join("2023").join("shots_2023.parquet"));

        let plan = plan_uploads(&data_dir, "parquet", "nhl-bucket", None).unwrap();

        let keys: Vec<&str> = plan.iter().map(|item| item.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "moneypuck/season_level/Goalies_2008_regular.parquet",
                "moneypuck/season_level/Teams_2008_regular.parquet",
                "shots/2023/shots_2023.parquet",
            ]
        );
        assert_eq!(
            plan[0].destination(),
            "s3://nhl-bucket/moneypuck/season_level/Goalies_2008_regular.parquet"
        );
    }

    #[test]
    fn test_no_matching_files() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("a.csv"));
        assert!(matches!(
            plan_uploads(dir.path(), ".parquet", "b", None),
            Err(AppError::NoFilesFound { ref extension, .. }) if extension == "parquet"
        ));
        assert!(matches!(
            plan_uploads(&dir.path().join("missing"), "csv", "b", None),
            Err(AppError::NoFilesFound { .. })
        ));
    }
}
