use std::{
    io::ErrorKind,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use tracing::debug;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Ordered CSV file-backed table.
///
/// Every row is one serde record; the header row is derived from the field names.
/// The file is always rewritten as a whole: a temp file is written next to the
/// target, fsynced, then renamed over it, so readers see either the old or the
/// new content and never a torn write.
///
/// Writers are serialised through an internal mutex held for the full
/// load-mutate-save cycle of [`CsvTable::transact`].
pub struct CsvTable<R> {
    file_path: PathBuf,
    write_lock: Mutex<()>,
    _row: PhantomData<fn() -> R>,
}

impl<R> CsvTable<R>
where
    R: Serialize + DeserializeOwned,
{
    /// Bind the table to a path. The file is not created until the first save.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into(), write_lock: Mutex::new(()), _row: PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read all rows in file order. A missing file is an empty table.
    pub async fn load(&self) -> Result<Vec<R>, ServiceError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ServiceError::read(&self.file_path, e)),
        };
        let rows = csv::Reader::from_reader(bytes.as_slice())
            .deserialize()
            .collect::<Result<Vec<R>, _>>()
            .map_err(|e| ServiceError::read(&self.file_path, e))?;
        debug!(path = %self.file_path.display(), rows = rows.len(), "table loaded");
        Ok(rows)
    }

    /// Replace the file content with `rows`.
    pub async fn save(&self, rows: &[R]) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().await;
        self.write_atomic(rows).await
    }

    /// Load, apply `f`, and persist while holding the write lock.
    ///
    /// Nothing is written when `f` fails. The lock is released on every exit path.
    pub async fn transact<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut Vec<R>) -> Result<T, ServiceError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut rows = self.load().await?;
        let out = f(&mut rows)?;
        self.write_atomic(&rows).await?;
        Ok(out)
    }

    async fn write_atomic(&self, rows: &[R]) -> Result<(), ServiceError> {
        let data = encode(rows).map_err(|e| ServiceError::write(&self.file_path, e))?;

        let parent = match self.file_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).await.map_err(|e| ServiceError::write(&self.file_path, e))?;

        let file_name = self.file_path.file_name().and_then(|s| s.to_str()).unwrap_or("table");
        let tmp = parent.join(format!(".{}.tmp.{}", file_name, Uuid::new_v4()));

        if let Err(e) = write_and_sync(&tmp, &data).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::write(&self.file_path, e));
        }
        if let Err(e) = fs::rename(&tmp, &self.file_path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::write(&self.file_path, e));
        }
        debug!(path = %self.file_path.display(), rows = rows.len(), "table saved");
        Ok(())
    }
}

fn encode<R: Serialize>(rows: &[R]) -> Result<Vec<u8>, String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for row in rows {
        wtr.serialize(row).map_err(|e| e.to_string())?;
    }
    wtr.into_inner().map_err(|e| e.error().to_string())
}

async fn write_and_sync(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut f = fs::File::create(path).await?;
    f.write_all(data).await?;
    f.sync_all().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: u64,
        label: Option<String>,
        amount: Option<f64>,
    }

    fn tmp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("csv_table_{}_{}/rows.csv", tag, uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_file_loads_empty() -> Result<(), anyhow::Error> {
        let table = CsvTable::<Row>::new(tmp_path("missing"));
        assert!(table.load().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn save_then_load_preserves_order_and_nulls() -> Result<(), anyhow::Error> {
        let path = tmp_path("roundtrip");
        let table = CsvTable::<Row>::new(&path);
        let rows = vec![
            Row { id: 3, label: Some("c, with comma".into()), amount: Some(1.5) },
            Row { id: 1, label: None, amount: Some(20.0) },
            Row { id: 2, label: Some("b".into()), amount: None },
        ];
        table.save(&rows).await?;
        assert_eq!(table.load().await?, rows);

        let text = tokio::fs::read_to_string(&path).await?;
        assert!(text.starts_with("id,label,amount\n"));

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn malformed_file_is_read_error() -> Result<(), anyhow::Error> {
        let path = tmp_path("malformed");
        tokio::fs::create_dir_all(path.parent().unwrap()).await?;
        tokio::fs::write(&path, "id,label,amount\nnot-a-number,x,1\n").await?;

        let table = CsvTable::<Row>::new(&path);
        assert!(matches!(table.load().await, Err(ServiceError::StorageRead { .. })));

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn directory_in_place_of_file_fails_both_ways() -> Result<(), anyhow::Error> {
        let path = tmp_path("dir");
        tokio::fs::create_dir_all(&path).await?;

        let table = CsvTable::<Row>::new(&path);
        assert!(matches!(table.load().await, Err(ServiceError::StorageRead { .. })));
        let rows = vec![Row { id: 1, label: None, amount: None }];
        assert!(matches!(table.save(&rows).await, Err(ServiceError::StorageWrite { .. })));

        // no temp file left behind
        let mut entries = tokio::fs::read_dir(path.parent().unwrap()).await?;
        let mut names = Vec::new();
        while let Some(e) = entries.next_entry().await? {
            names.push(e.file_name().to_string_lossy().to_string());
        }
        assert_eq!(names, vec!["rows.csv".to_string()]);

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_mutation_writes_nothing() -> Result<(), anyhow::Error> {
        let path = tmp_path("abort");
        let table = CsvTable::<Row>::new(&path);
        table.save(&[Row { id: 1, label: None, amount: None }]).await?;

        let res: Result<(), _> = table
            .transact(|rows| {
                rows.clear();
                Err(ServiceError::Validation("nope".into()))
            })
            .await;
        assert!(res.is_err());
        assert_eq!(table.load().await?.len(), 1);

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_transactions_do_not_lose_writes() -> Result<(), anyhow::Error> {
        let path = tmp_path("concurrent");
        let table = Arc::new(CsvTable::<Row>::new(&path));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let t = Arc::clone(&table);
            handles.push(tokio::spawn(async move {
                t.transact(|rows| {
                    let id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
                    rows.push(Row { id, label: None, amount: None });
                    Ok(id)
                })
                .await
            }));
        }
        for h in handles {
            h.await??;
        }

        let ids: Vec<u64> = table.load().await?.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, (1..=16).collect::<Vec<_>>());

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn two_tables_on_one_path_save_independently() -> Result<(), anyhow::Error> {
        let path = tmp_path("shared");
        let a = Arc::new(CsvTable::<Row>::new(&path));
        let b = Arc::new(CsvTable::<Row>::new(&path));

        let mut handles = Vec::new();
        for i in 0..16u64 {
            let t = if i % 2 == 0 { Arc::clone(&a) } else { Arc::clone(&b) };
            handles.push(tokio::spawn(async move {
                t.save(&[Row { id: i, label: Some("x".into()), amount: None }]).await
            }));
        }
        for h in handles {
            h.await??;
        }

        let rows = a.load().await?;
        assert_eq!(rows.len(), 1);
        let mut entries = tokio::fs::read_dir(path.parent().unwrap()).await?;
        let mut names = Vec::new();
        while let Some(e) = entries.next_entry().await? {
            names.push(e.file_name().to_string_lossy().to_string());
        }
        assert_eq!(names, vec!["rows.csv".to_string()]);

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }
}
