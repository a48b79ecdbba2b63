//! Automated export mechanisms backed by external presentation tools.

use crate::error::{ExportError, Result};
use crate::process::run_checked;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// One way of turning a presentation into `slide*.png` files.
pub trait SlideExporter {
    /// Human-readable mechanism name for progress messages.
    fn name(&self) -> &str;

    /// Whether the mechanism can run on this platform at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Export every slide of `document` as PNG files into `output_dir`.
    fn export(&self, document: &Path, output_dir: &Path) -> Result<()>;
}

/// Absolute form of a path, for tools that run with a different working directory.
fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(std::fs::canonicalize(path)?)
}

/// Keynote automation through `osascript` (macOS only).
pub struct KeynoteExporter {
    pub timeout: Duration,
}

impl Default for KeynoteExporter {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
        }
    }
}

impl KeynoteExporter {
    fn script(document: &Path, output_dir: &Path) -> String {
        let quote = |p: &Path| p.display().to_string().replace('\\', "\\\\").replace('"', "\\\"");
        format!(
            r#"tell application "Keynote"
    activate
    open POSIX file "{doc}"
    delay 3
    tell front document
        set slide_count to count of slides
        repeat with i from 1 to slide_count
            set slide_path to "{out}/slide_" & i & ".png"
            export slide i as "slide images" to file slide_path
        end repeat
    end tell
    close front document
    quit
end tell"#,
            doc = quote(document),
            out = quote(output_dir),
        )
    }
}

impl SlideExporter for KeynoteExporter {
    fn name(&self) -> &str {
        "Keynote"
    }

    fn is_available(&self) -> bool {
        cfg!(target_os = "macos")
    }

    fn export(&self, document: &Path, output_dir: &Path) -> Result<()> {
        if !self.is_available() {
            return Err(ExportError::Unavailable(self.name().to_string()));
        }
        let script = Self::script(&absolute(document)?, &absolute(output_dir)?);
        run_checked(Command::new("osascript").args(["-e", &script]), self.timeout)
    }
}

/// PowerPoint COM automation through a temporary PowerShell script (Windows only).
pub struct PowerPointExporter {
    pub timeout: Duration,
}

impl Default for PowerPointExporter {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
        }
    }
}

impl PowerPointExporter {
    fn script(document: &Path, output_dir: &Path) -> String {
        // Single-quoted PowerShell strings only need embedded quotes doubled.
        let quote = |p: &Path| p.display().to_string().replace('\'', "''");
        format!(
            "$ppt = New-Object -ComObject PowerPoint.Application\n\
             $presentation = $ppt.Presentations.Open('{doc}', $true, $false, $false)\n\
             for ($i = 1; $i -le $presentation.Slides.Count; $i++) {{\n\
             \x20   $slide = $presentation.Slides.Item($i)\n\
             \x20   $slide.Export((Join-Path '{out}' (\"slide_\" + $i + \".png\")), \"PNG\")\n\
             }}\n\
             $presentation.Close()\n\
             $ppt.Quit()\n\
             [System.Runtime.Interopservices.Marshal]::ReleaseComObject($ppt) | Out-Null\n",
            doc = quote(document),
            out = quote(output_dir),
        )
    }
}

impl SlideExporter for PowerPointExporter {
    fn name(&self) -> &str {
        "PowerPoint"
    }

    fn is_available(&self) -> bool {
        cfg!(windows)
    }

    fn export(&self, document: &Path, output_dir: &Path) -> Result<()> {
        if !self.is_available() {
            return Err(ExportError::Unavailable(self.name().to_string()));
        }

        let mut file = tempfile::Builder::new()
            .prefix("slidecast-export")
            .suffix(".ps1")
            .tempfile()?;
        file.write_all(Self::script(&absolute(document)?, &absolute(output_dir)?).as_bytes())?;
        // Removed when dropped, whatever the outcome.
        let script = file.into_temp_path();

        run_checked(
            Command::new("powershell.exe")
                .args(["-NoProfile", "-ExecutionPolicy", "Bypass", "-File"])
                .arg(&*script),
            self.timeout,
        )
    }
}

/// LibreOffice to PDF, then ImageMagick to one PNG per page.
pub struct LibreOfficeExporter {
    pub soffice: PathBuf,
    pub convert: PathBuf,
    pub pdf_timeout: Duration,
    pub pdf_retry_timeout: Duration,
    pub rasterize_timeout: Duration,
}

impl Default for LibreOfficeExporter {
    fn default() -> Self {
        Self {
            soffice: PathBuf::from("soffice"),
            convert: PathBuf::from("convert"),
            pdf_timeout: Duration::from_secs(90),
            pdf_retry_timeout: Duration::from_secs(60),
            rasterize_timeout: Duration::from_secs(180),
        }
    }
}

impl LibreOfficeExporter {
    fn convert_to_pdf(&self, document: &Path, pdf_dir: &Path) -> Result<()> {
        let enhanced = run_checked(
            Command::new(&self.soffice)
                .args(["--headless", "--invisible", "--convert-to", "pdf", "--outdir"])
                .arg(pdf_dir)
                .arg("--writer")
                .arg(document),
            self.pdf_timeout,
        );

        match enhanced {
            Ok(()) => Ok(()),
            Err(ExportError::Spawn { program, source }) => Err(ExportError::Spawn { program, source }),
            Err(e) => {
                log::warn!("LibreOffice enhanced PDF conversion failed: {}", e);
                run_checked(
                    Command::new(&self.soffice)
                        .args(["--headless", "--convert-to", "pdf", "--outdir"])
                        .arg(pdf_dir)
                        .arg(document),
                    self.pdf_retry_timeout,
                )
            }
        }
    }
}

impl SlideExporter for LibreOfficeExporter {
    fn name(&self) -> &str {
        "LibreOffice + ImageMagick"
    }

    fn export(&self, document: &Path, output_dir: &Path) -> Result<()> {
        let document = absolute(document)?;
        // The intermediate PDF lives here and goes away with it.
        let pdf_dir = tempfile::tempdir()?;

        log::info!("Converting {} to PDF using LibreOffice", document.display());
        self.convert_to_pdf(&document, pdf_dir.path())?;

        let stem = document
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "presentation".to_string());
        let pdf = pdf_dir.path().join(format!("{}.pdf", stem));
        if !pdf.exists() {
            return Err(ExportError::CommandFailed {
                program: self.soffice.display().to_string(),
                message: "PDF file was not created".to_string(),
            });
        }

        log::info!("Converting PDF pages to slide images using ImageMagick");
        run_checked(
            Command::new(&self.convert)
                .args(["-density", "300", "-quality", "95"])
                .args(["-background", "white", "-alpha", "remove", "-colorspace", "RGB"])
                .arg(&pdf)
                .arg(output_dir.join("slide_%d.png")),
            self.rasterize_timeout,
        )
    }
}
