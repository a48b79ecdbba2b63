//! The export fallback chain and slide image discovery.

use crate::error::{ExportError, Result};
use crate::mechanisms::{KeynoteExporter, LibreOfficeExporter, PowerPointExporter, SlideExporter};
use crate::render::TextRenderExporter;
use slidecast_core::naming::sort_naturally;
use slidecast_core::{SlideImage, Workspace};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the slide images for a run came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutcome {
    /// Directory holding the images.
    pub source_dir: PathBuf,
    /// Images in slide order.
    pub images: Vec<SlideImage>,
    /// Mechanism that produced them; `None` when existing images were reused.
    pub mechanism: Option<String>,
}

/// Ordered list of export mechanisms, tried until one produces images.
pub struct ExportChain {
    exporters: Vec<Box<dyn SlideExporter>>,
}

impl ExportChain {
    pub fn new(exporters: Vec<Box<dyn SlideExporter>>) -> Self {
        Self { exporters }
    }

    /// Keynote, PowerPoint, LibreOffice + ImageMagick, then text rendering.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(KeynoteExporter::default()),
            Box::new(PowerPointExporter::default()),
            Box::new(LibreOfficeExporter::default()),
            Box::new(TextRenderExporter),
        ])
    }

    /// Produce ordered slide images for `document` inside `workspace`.
    ///
    /// Images already present in `uploaded_slides/` skip every mechanism.
    /// Otherwise `exported_slides/` is cleared of old PNGs and each mechanism
    /// is tried in turn. When all of them fail, the other search directories
    /// are still consulted before giving up with manual export instructions.
    pub fn run(&self, document: &Path, workspace: &Workspace) -> Result<ExportOutcome> {
        let uploaded = workspace.uploaded_slides();
        let images = list_slide_images(&uploaded, true)?;
        if !images.is_empty() {
            log::info!(
                "Using {} pre-supplied slide images from {}",
                images.len(),
                uploaded.display()
            );
            return Ok(ExportOutcome {
                source_dir: uploaded,
                images,
                mechanism: None,
            });
        }

        let output_dir = workspace.exported_slides();
        fs::create_dir_all(&output_dir)?;

        for exporter in &self.exporters {
            if !exporter.is_available() {
                log::info!("Skipping {} export (not available on this platform)", exporter.name());
                continue;
            }

            // Each attempt starts from an empty directory so a failed
            // mechanism's partial output cannot shift the numbering.
            let removed = remove_stale_pngs(&output_dir)?;
            if removed > 0 {
                log::info!("Removed {} old slide images from {}", removed, output_dir.display());
            }

            log::info!("Trying {} export...", exporter.name());
            match exporter.export(document, &output_dir) {
                Ok(()) => {
                    let images = list_slide_images(&output_dir, false)?;
                    if images.is_empty() {
                        log::warn!("{} export finished but produced no slide images", exporter.name());
                        continue;
                    }
                    log::info!("Exported {} slides using {}", images.len(), exporter.name());
                    return Ok(ExportOutcome {
                        source_dir: output_dir,
                        images,
                        mechanism: Some(exporter.name().to_string()),
                    });
                }
                Err(e) => log::warn!("{} export failed: {}", exporter.name(), e),
            }
        }

        if let Some((source_dir, images)) = find_exported_slides(workspace)? {
            log::info!("Found {} slide images in {}", images.len(), source_dir.display());
            return Ok(ExportOutcome {
                source_dir,
                images,
                mechanism: None,
            });
        }

        Err(ExportError::AllFailed {
            instructions: manual_export_instructions(document),
        })
    }
}

/// First search directory holding slide PNGs, with its images in slide order.
pub fn find_exported_slides(workspace: &Workspace) -> Result<Option<(PathBuf, Vec<SlideImage>)>> {
    for name in Workspace::SLIDE_SEARCH_DIRS {
        let dir = workspace.dir(name);
        let images = list_slide_images(&dir, *name == Workspace::UPLOADED_SLIDES)?;
        if !images.is_empty() {
            return Ok(Some((dir, images)));
        }
    }
    Ok(None)
}

fn is_png(name: &str) -> bool {
    name.to_lowercase().ends_with(".png")
}

/// PNG files in `dir`, naturally ordered and numbered from 1.
///
/// Unless `any_name` is set, only files whose names start with `slide`
/// (any case) are taken. A missing directory yields no images.
pub fn list_slide_images(dir: &Path, any_name: bool) -> Result<Vec<SlideImage>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| is_png(name) && (any_name || name.to_lowercase().starts_with("slide")))
        .collect();

    // Stable natural sort over a name-sorted list keeps ties deterministic.
    names.sort();
    sort_naturally(&mut names);

    Ok(names
        .into_iter()
        .enumerate()
        .map(|(i, name)| SlideImage {
            index: i + 1,
            path: dir.join(name),
        })
        .collect())
}

/// Delete PNGs left in `dir` by an earlier export. Returns how many were removed.
fn remove_stale_pngs(dir: &Path) -> Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let png = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(is_png);
        if png && path.is_file() {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Steps for exporting slides by hand when every automated mechanism failed.
pub fn manual_export_instructions(document: &Path) -> String {
    format!(
        "MANUAL EXPORT INSTRUCTIONS:\n\
         1. Open {doc} in PowerPoint\n\
         2. Go to File > Export > Change File Type\n\
         3. Select PNG Portable Network Graphics Format\n\
         4. Click Save As\n\
         5. Choose a folder named '{dir}' next to the presentation\n\
         6. When asked which slides to export, choose \"All Slides\"\n\
         7. This creates one PNG file per slide\n\
         8. Run this command again; it will pick up the exported images",
        doc = document.display(),
        dir = Workspace::MANUAL_SLIDES,
    )
}
