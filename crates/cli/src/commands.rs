use std::path::PathBuf;

use anyhow::{bail, Context};
use ingest_admin_core::{DashboardController, DocumentId, PendingFile, RemoveOutcome};

use crate::output;

pub async fn list(dashboard: &DashboardController, search: Option<String>, json: bool) -> anyhow::Result<()> {
    dashboard.mount().await.context("could not load documents")?;
    let documents = match search {
        Some(term) => dashboard.search(&term),
        None => dashboard.visible_documents(),
    };
    if json {
        println!("{}", output::render_json(&documents)?);
    } else {
        print!("{}", output::render_table(&documents, dashboard.empty_message()));
    }
    Ok(())
}

pub async fn upload(dashboard: &DashboardController, paths: Vec<PathBuf>) -> anyhow::Result<()> {
    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let file = PendingFile::from_path(path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?;
        files.push(file);
    }
    let count = files.len();

    dashboard.open_upload();
    dashboard.upload().add_files(files);
    dashboard.submit_upload().await?;

    println!(
        "uploaded {count} file(s); catalog now holds {} document(s)",
        dashboard.document_count()
    );
    Ok(())
}

pub async fn delete(dashboard: &DashboardController, ids: Vec<String>) -> anyhow::Result<()> {
    dashboard.mount().await.context("could not load documents")?;

    let mut failed = 0;
    for raw in &ids {
        let id = DocumentId::parse(raw)?;
        match dashboard.delete(&id).await {
            Ok(RemoveOutcome::Removed) => println!("deleted {id}"),
            Ok(RemoveOutcome::NotPresent) => {
                eprintln!("skipped {id}: not in the catalog");
                failed += 1;
            }
            Err(_) => failed += 1,
        }
    }

    if failed > 0 {
        bail!("{failed} of {} delete(s) did not succeed", ids.len());
    }
    Ok(())
}
