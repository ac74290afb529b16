//! Terminal output for search results and catalog lookups

use crate::catalog::{PluginDetail, category_name, format_file_size};
use crate::search::PluginSummary;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn stdout(color: bool) -> StandardStream {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Print one block per plugin, most relevant first
pub fn print_summaries(summaries: &[PluginSummary], total: usize, color: bool) -> io::Result<()> {
    let mut stdout = stdout(color);

    for summary in summaries {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
        write!(stdout, "{}", summary.id)?;
        stdout.reset()?;

        if !summary.name.is_empty() {
            write!(stdout, "  {}", summary.name)?;
        }
        if !summary.author.is_empty() {
            stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
            write!(stdout, "  by {}", summary.author)?;
            stdout.reset()?;
        }
        writeln!(stdout)?;

        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(
            stdout,
            "  {} downloads, {} stars",
            summary.downloads, summary.stars
        )?;
        stdout.reset()?;
        write!(stdout, "  {}", summary.license)?;
        if !summary.api_version.is_empty() {
            write!(stdout, "  api {}", summary.api_version)?;
        }
        writeln!(stdout, "  updated {}", summary.updated_at)?;

        if !summary.categories.is_empty() {
            let names: Vec<&str> = summary.categories.iter().map(|c| category_name(c)).collect();
            writeln!(stdout, "  [{}]", names.join(", "))?;
        }
        if !summary.summary.is_empty() {
            writeln!(stdout, "  {}", summary.summary)?;
        }
    }

    stdout.set_color(ColorSpec::new().set_dimmed(true))?;
    writeln!(stdout, "{} of {} plugins", summaries.len(), total)?;
    stdout.reset()?;

    Ok(())
}

/// Print a catalog entry with its newest version and download
pub fn print_detail(detail: &PluginDetail, color: bool) -> io::Result<()> {
    let mut stdout = stdout(color);

    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
    writeln!(stdout, "{}", detail.id)?;
    stdout.reset()?;
    writeln!(stdout, "  {}", detail.name)?;
    if !detail.summary.is_empty() {
        writeln!(stdout, "  {}", detail.summary)?;
    }
    if !detail.source.is_empty() {
        writeln!(stdout, "  source: {}", detail.source)?;
    }
    writeln!(stdout, "  license: {}", detail.license_class())?;

    if let Some(version) = detail.latest_version(None) {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(stdout, "  latest: {}", version.version)?;
        stdout.reset()?;
        if version.prerelease {
            write!(stdout, " (prerelease)")?;
        }
        writeln!(stdout)?;

        if let Some(file) = version.primary_file() {
            writeln!(
                stdout,
                "  download: {} ({})",
                file.filename,
                format_file_size(file.size)
            )?;
        }
    }

    for dependency in &detail.dependencies {
        writeln!(stdout, "  depends on {} ({:?})", dependency.plugin_id, dependency.dependency_type)?;
    }

    Ok(())
}
