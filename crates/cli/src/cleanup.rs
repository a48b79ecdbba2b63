//! Interactive removal of intermediate directories.

use slidecast_core::Workspace;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories the cleanup tool knows about, in display order.
pub const CLEANUP_DIRS: &[&str] = &[
    Workspace::SLIDE_IMAGES,
    Workspace::AUDIO_CLIPS,
    Workspace::TEST_AUDIO,
    Workspace::EXPORTED_SLIDES,
];

/// Menu choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Essential,
    Standard,
    Full,
    Custom,
    Cancel,
}

impl Preset {
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::Essential),
            "2" => Some(Self::Standard),
            "3" => Some(Self::Full),
            "4" => Some(Self::Custom),
            "5" => Some(Self::Cancel),
            _ => None,
        }
    }

    /// Directories removed by a fixed preset. Custom and Cancel have none.
    pub fn directories(self) -> &'static [&'static str] {
        match self {
            Self::Essential => &[Workspace::SLIDE_IMAGES, Workspace::TEST_AUDIO],
            Self::Standard => &[
                Workspace::SLIDE_IMAGES,
                Workspace::TEST_AUDIO,
                Workspace::AUDIO_CLIPS,
            ],
            Self::Full => &[
                Workspace::SLIDE_IMAGES,
                Workspace::TEST_AUDIO,
                Workspace::AUDIO_CLIPS,
                Workspace::EXPORTED_SLIDES,
            ],
            Self::Custom | Self::Cancel => &[],
        }
    }
}

/// Total size of the files under `path`. Missing paths and unreadable entries count as zero.
pub fn directory_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|meta| meta.len())
        .sum()
}

/// Human-readable size with one decimal, in B, KB, MB, GB or TB.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} TB", size)
}

/// What a cleanup run removed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanupSummary {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
    pub freed_bytes: u64,
}

/// Remove the named directories under the workspace, tallying freed space.
pub fn remove_directories<W: Write>(workspace: &Workspace, names: &[&str], out: &mut W) -> io::Result<CleanupSummary> {
    let mut summary = CleanupSummary::default();

    for name in names {
        let dir = workspace.dir(name);
        if !dir.exists() {
            writeln!(out, "  Directory not found: {}/", name)?;
            continue;
        }

        let size = directory_size(&dir);
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                writeln!(out, "  Removed {}/", name)?;
                summary.freed_bytes += size;
                summary.removed.push(dir);
            }
            Err(e) => {
                writeln!(out, "  Error removing {}/: {}", name, e)?;
                log::warn!("Failed to remove {}: {}", dir.display(), e);
                summary.failed.push(dir);
            }
        }
    }

    Ok(summary)
}

/// Print `question` and read one trimmed line. `None` at end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> io::Result<Option<String>> {
    write!(out, "{}", question)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "y" | "yes")
}

/// Run the cleanup dialogue. Returns `None` when the user cancels or
/// there is nothing to do. End of input counts as cancel.
pub fn run_interactive<R: BufRead, W: Write>(
    workspace: &Workspace,
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<CleanupSummary>> {
    writeln!(out, "Slidecast Cleanup Tool")?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out)?;
    writeln!(out, "Current disk usage:")?;

    let mut total = 0;
    for name in CLEANUP_DIRS {
        let size = directory_size(&workspace.dir(name));
        total += size;
        if size > 0 {
            writeln!(out, "  {}/: {}", name, format_size(size))?;
        }
    }

    if total == 0 {
        writeln!(out, "  No cleanup needed - no intermediate files found.")?;
        return Ok(None);
    }
    writeln!(out)?;
    writeln!(out, "Total size to clean: {}", format_size(total))?;

    writeln!(out)?;
    writeln!(out, "What would you like to clean up?")?;
    writeln!(out, "1. Essential cleanup (slide_images, test_audio)")?;
    writeln!(out, "2. Standard cleanup (slide_images, test_audio, audio_clips)")?;
    writeln!(out, "3. Full cleanup (everything including exported_slides)")?;
    writeln!(out, "4. Custom selection")?;
    writeln!(out, "5. Cancel")?;

    let preset = loop {
        let Some(choice) = prompt(input, out, "\nEnter your choice (1-5): ")? else {
            writeln!(out, "\nCleanup cancelled.")?;
            return Ok(None);
        };
        match Preset::from_choice(&choice) {
            Some(preset) => break preset,
            None => writeln!(out, "Invalid choice. Please enter 1-5.")?,
        }
    };

    let selected: Vec<&str> = match preset {
        Preset::Cancel => {
            writeln!(out, "Cleanup cancelled.")?;
            return Ok(None);
        }
        Preset::Custom => {
            let mut selected = Vec::new();
            for name in CLEANUP_DIRS {
                if !workspace.dir(name).exists() {
                    continue;
                }
                match prompt(input, out, &format!("Remove {}/? (y/n): ", name))? {
                    Some(answer) if is_yes(&answer) => selected.push(*name),
                    Some(_) => {}
                    None => {
                        writeln!(out, "\nCleanup cancelled.")?;
                        return Ok(None);
                    }
                }
            }
            selected
        }
        fixed => fixed.directories().to_vec(),
    };

    if selected.is_empty() {
        writeln!(out, "No directories selected for cleanup.")?;
        return Ok(None);
    }

    writeln!(out)?;
    writeln!(out, "About to remove:")?;
    for name in &selected {
        let dir = workspace.dir(name);
        if dir.exists() {
            writeln!(out, "  - {}/ ({})", name, format_size(directory_size(&dir)))?;
        }
    }

    match prompt(input, out, "\nProceed with cleanup? (y/n): ")? {
        Some(answer) if is_yes(&answer) => {}
        _ => {
            writeln!(out, "Cleanup cancelled.")?;
            return Ok(None);
        }
    }

    writeln!(out)?;
    writeln!(out, "Cleaning up...")?;
    let summary = remove_directories(workspace, &selected, out)?;

    writeln!(out)?;
    writeln!(out, "Cleanup completed!")?;
    writeln!(out, "Freed up: {}", format_size(summary.freed_bytes))?;
    writeln!(
        out,
        "Removed {}/{} directories",
        summary.removed.len(),
        summary.removed.len() + summary.failed.len()
    )?;

    Ok(Some(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn populate(workspace: &Workspace, name: &str, bytes: usize) {
        let dir = workspace.dir(name);
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("a.bin"), vec![0u8; bytes]).unwrap();
        fs::write(dir.join("nested").join("b.bin"), vec![0u8; bytes]).unwrap();
    }

    fn run(workspace: &Workspace, answers: &str) -> (Option<CleanupSummary>, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut out = Vec::new();
        let summary = run_interactive(workspace, &mut input, &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512.0 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024u64.pow(4)), "3.0 TB");
    }

    #[test]
    fn test_directory_size_recurses() {
        let root = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(root.path());
        populate(&workspace, Workspace::AUDIO_CLIPS, 100);

        assert_eq!(directory_size(&workspace.audio_clips()), 200);
        assert_eq!(directory_size(&root.path().join("missing")), 0);
    }

    #[test]
    fn test_preset_directories() {
        assert_eq!(Preset::from_choice(" 2 "), Some(Preset::Standard));
        assert_eq!(Preset::from_choice("6"), None);
        assert_eq!(Preset::Essential.directories(), &["slide_images", "test_audio"]);
        assert_eq!(Preset::Full.directories().len(), 4);
    }

    #[test]
    fn test_essential_preset_after_invalid_choice() {
        let root = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(root.path());
        populate(&workspace, Workspace::SLIDE_IMAGES, 10);
        populate(&workspace, Workspace::AUDIO_CLIPS, 10);

        let (summary, output) = run(&workspace, "9\n1\ny\n");
        let summary = summary.unwrap();

        assert!(output.contains("Invalid choice"));
        assert_eq!(summary.removed, vec![workspace.slide_images()]);
        assert_eq!(summary.freed_bytes, 20);
        assert!(!workspace.slide_images().exists());
        assert!(workspace.audio_clips().exists());
    }

    #[test]
    fn test_custom_selection() {
        let root = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(root.path());
        populate(&workspace, Workspace::SLIDE_IMAGES, 10);
        populate(&workspace, Workspace::EXPORTED_SLIDES, 10);

        // Asked only about existing directories: slide_images, then exported_slides.
        let (summary, _) = run(&workspace, "4\nn\nyes\ny\n");

        assert_eq!(summary.unwrap().removed, vec![workspace.exported_slides()]);
        assert!(workspace.slide_images().exists());
    }

    #[test]
    fn test_declined_confirmation_keeps_files() {
        let root = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(root.path());
        populate(&workspace, Workspace::TEST_AUDIO, 10);

        let (summary, output) = run(&workspace, "3\nn\n");
        assert!(summary.is_none());
        assert!(output.contains("Cleanup cancelled."));
        assert!(workspace.test_audio().exists());
    }

    #[test]
    fn test_end_of_input_cancels() {
        let root = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(root.path());
        populate(&workspace, Workspace::TEST_AUDIO, 10);

        let (summary, _) = run(&workspace, "");
        assert!(summary.is_none());
        assert!(workspace.test_audio().exists());
    }

    #[test]
    fn test_nothing_to_clean() {
        let root = tempfile::tempdir().unwrap();
        let (summary, output) = run(&Workspace::new(root.path()), "1\ny\n");
        assert!(summary.is_none());
        assert!(output.contains("No cleanup needed"));
    }
}
