//! Scripting orchestrator - runs every configured section in category order.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{Config, ConnectionSettings, OutputSection, TargetVersion};
use crate::core::{Catalog, RowSource, ScriptGenerator};
use crate::drivers::mssql::{MssqlCatalog, MssqlGenerator};
use crate::error::{Result, ScriptGenError};
use crate::scripting::{
    script_functions, script_procedures, script_tables, script_triggers, script_user_types,
    script_views, Category,
};
use crate::values::{FormatContext, ValueExporter};
use crate::writer::{write_script_file, ScriptWriter};

/// Scripting orchestrator.
pub struct Orchestrator {
    config: Config,
    output_dir: PathBuf,
    catalog: Arc<dyn Catalog>,
    rows: Arc<dyn RowSource>,
    generator: Box<dyn ScriptGenerator>,
    format: FormatContext,
}

/// One script file written by a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptFileResult {
    pub category: Category,

    pub path: PathBuf,

    /// Objects scripted; tables exported for value sections.
    pub objects: usize,

    /// Rows exported, for value sections only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u64>,

    pub duration_seconds: f64,
}

/// Result of a scripting run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptRunResult {
    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run completed.
    pub completed_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// Files in the order they were written.
    pub files: Vec<ScriptFileResult>,
}

impl ScriptRunResult {
    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Orchestrator {
    /// Connect to SQL Server and prepare a run.
    pub async fn connect(
        config: Config,
        settings: &ConnectionSettings,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let catalog = Arc::new(MssqlCatalog::connect(settings).await?);
        Ok(Self::with_parts(
            config,
            output_dir,
            catalog.clone(),
            catalog,
            Box::new(MssqlGenerator),
        ))
    }

    /// Assemble an orchestrator from explicit collaborators.
    pub fn with_parts(
        config: Config,
        output_dir: impl Into<PathBuf>,
        catalog: Arc<dyn Catalog>,
        rows: Arc<dyn RowSource>,
        generator: Box<dyn ScriptGenerator>,
    ) -> Self {
        Self {
            config,
            output_dir: output_dir.into(),
            catalog,
            rows,
            generator,
            format: FormatContext::invariant(),
        }
    }

    /// Run every configured section. Categories run in a fixed order:
    /// tables, triggers, user types, procedures, views, functions, values.
    /// The first failure stops the run; files already written stay.
    pub async fn run(&self) -> Result<ScriptRunResult> {
        let started_at = Utc::now();
        let version = self.config.target_version()?;
        info!(
            "Scripting to {} (target {:?})",
            self.output_dir.display(),
            version
        );
        std::fs::create_dir_all(&self.output_dir)?;

        let mut files = Vec::new();

        for section in &self.config.script_tables {
            let filter = section.name_filter()?;
            let started = Instant::now();
            let mut out = ScriptWriter::new(Vec::new());
            let count = script_tables(
                &*self.catalog,
                &*self.generator,
                version,
                |name| filter.should_include(name),
                &mut out,
            )
            .await?;
            files.push(self.save(Category::Tables, &section.output_file, out, count, started)?);
        }

        let plain_sections: [(Category, &Vec<OutputSection>); 5] = [
            (Category::Triggers, &self.config.script_triggers),
            (Category::UserTypes, &self.config.script_user_types),
            (Category::Procedures, &self.config.script_procs),
            (Category::Views, &self.config.script_views),
            (Category::Functions, &self.config.script_udfs),
        ];
        for (category, sections) in plain_sections {
            for section in sections {
                let started = Instant::now();
                let mut out = ScriptWriter::new(Vec::new());
                let count = self.render(category, version, &mut out).await?;
                files.push(self.save(category, &section.output_file, out, count, started)?);
            }
        }

        for section in &self.config.script_values {
            let specs = section.export_specs()?;
            let started = Instant::now();
            let mut out = ScriptWriter::new(Vec::new());
            let exporter = ValueExporter::new(&*self.catalog, &*self.rows, self.format);
            let results = exporter.export(&specs, &mut out).await?;

            let mut file =
                self.save(Category::Values, &section.output_file, out, results.len(), started)?;
            file.rows = Some(results.iter().map(|r| r.rows).sum());
            files.push(file);
        }

        let completed_at = Utc::now();
        let duration_seconds = (completed_at - started_at).num_milliseconds() as f64 / 1000.0;
        info!(
            "Scripting complete: {} files in {:.1}s",
            files.len(),
            duration_seconds
        );

        Ok(ScriptRunResult {
            started_at,
            completed_at,
            duration_seconds,
            files,
        })
    }

    async fn render(
        &self,
        category: Category,
        version: TargetVersion,
        out: &mut ScriptWriter<Vec<u8>>,
    ) -> Result<usize> {
        let catalog = &*self.catalog;
        let generator = &*self.generator;
        match category {
            Category::Triggers => script_triggers(catalog, generator, version, out).await,
            Category::UserTypes => script_user_types(catalog, generator, version, out).await,
            Category::Procedures => script_procedures(catalog, generator, version, out).await,
            Category::Views => script_views(catalog, generator, version, out).await,
            Category::Functions => script_functions(catalog, generator, version, out).await,
            Category::Tables | Category::Values => Err(ScriptGenError::Config(format!(
                "{} sections need their own section settings",
                category
            ))),
        }
    }

    /// Write one rendered section to disk.
    fn save(
        &self,
        category: Category,
        output_file: &str,
        out: ScriptWriter<Vec<u8>>,
        objects: usize,
        started: Instant,
    ) -> Result<ScriptFileResult> {
        let path = resolve_output_path(&self.output_dir, output_file);
        write_script_file(&path, &out.finish()?)?;
        info!("Wrote {} ({} {})", path.display(), objects, category);

        Ok(ScriptFileResult {
            category,
            path,
            objects,
            rows: None,
            duration_seconds: started.elapsed().as_secs_f64(),
        })
    }
}

/// Relative output files land under the output directory; absolute ones are
/// used as given.
fn resolve_output_path(output_dir: &Path, output_file: &str) -> PathBuf {
    output_dir.join(output_file.trim())
}
