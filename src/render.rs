//! Renderer: output-mode dispatch and the formatted projections.
//!
//! Structured mode emits one pretty JSON document on standard output and
//! nothing on standard error. Formatted mode projects a human-readable
//! subset of each payload; the projection for frozen blueprints is an
//! explicit allow-list pulled straight from the decoded value, never a
//! round trip through another encoding.

use crate::error::{CommandError, ProjectionError};
use crate::types::{ComposeInfoResponse, DependencyPackage, ModuleInfo, NameVersion};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};

/// How a command's results reach the user. Resolved once from the
/// global flag and threaded by value into every render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable projection; item errors go to standard error.
    Formatted,
    /// One machine-readable JSON document on standard output.
    Structured,
}

impl OutputMode {
    pub fn is_structured(self) -> bool {
        self == OutputMode::Structured
    }
}

/// Serialize `doc` as one pretty JSON document followed by a newline.
pub fn write_structured<T: Serialize>(doc: &T, out: &mut dyn Write) -> Result<(), CommandError> {
    serde_json::to_writer_pretty(&mut *out, doc)?;
    writeln!(out)?;
    Ok(())
}

/// Write a pre-rendered textual document verbatim, terminating it with
/// a newline if the service did not.
pub fn write_passthrough(doc: &str, out: &mut dyn Write) -> io::Result<()> {
    out.write_all(doc.as_bytes())?;
    if !doc.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}

/// The display subset of a frozen blueprint. The full payload carries
/// many more fields (description, distro, groups, ...); only these are
/// shown.
#[derive(Debug, Clone)]
pub struct FrozenParts {
    pub name: String,
    pub version: String,
    pub modules: Vec<NameVersion>,
    pub packages: Vec<NameVersion>,
}

impl FrozenParts {
    /// Extract the display fields directly from the decoded payload.
    pub fn from_value(blueprint: &Value) -> Result<Self, ProjectionError> {
        let name = blueprint
            .get("name")
            .and_then(Value::as_str)
            .ok_or(ProjectionError::MissingField("name"))?
            .to_string();
        let version = blueprint
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Ok(Self {
            name,
            version,
            modules: name_versions(blueprint, "modules")?,
            packages: name_versions(blueprint, "packages")?,
        })
    }
}

fn name_versions(v: &Value, key: &'static str) -> Result<Vec<NameVersion>, ProjectionError> {
    match v.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                let name = item
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or(ProjectionError::MissingField("name"))?
                    .to_string();
                let version = item
                    .get("version")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Ok(NameVersion { name, version })
            })
            .collect(),
        Some(_) => Err(ProjectionError::WrongType(key)),
    }
}

/// Print a frozen blueprint's name, version, and pinned module and
/// package versions.
pub fn write_frozen_parts(parts: &FrozenParts, out: &mut dyn Write) -> io::Result<()> {
    if parts.version.is_empty() {
        writeln!(out, "blueprint: {}", parts.name)?;
    } else {
        writeln!(out, "blueprint: {} v{}", parts.name, parts.version)?;
    }
    for m in &parts.modules {
        writeln!(out, "    {}-{}", m.name, m.version)?;
    }
    for p in &parts.packages {
        writeln!(out, "    {}-{}", p.name, p.version)?;
    }
    Ok(())
}

/// Print the compose summary line and its package, module, and
/// dependency sections.
pub fn write_compose_info(info: &ComposeInfoResponse, out: &mut dyn Write) -> io::Result<()> {
    let image_size = if info.image_size > 0 {
        info.image_size.to_string()
    } else {
        String::new()
    };
    writeln!(
        out,
        "{} {:<8} {:<15} {} {:<16} {}",
        info.id,
        info.queue_status,
        info.blueprint.name,
        info.blueprint.version,
        info.compose_type,
        image_size
    )?;

    writeln!(out, "Packages:")?;
    for p in &info.blueprint.packages {
        writeln!(out, "    {}-{}", p.name, p.version)?;
    }
    writeln!(out, "Modules:")?;
    for m in &info.blueprint.modules {
        writeln!(out, "    {}-{}", m.name, m.version)?;
    }
    writeln!(out, "Dependencies:")?;
    for d in &info.deps.packages {
        writeln!(out, "    {}", format_dependency(d))?;
    }
    Ok(())
}

fn format_dependency(d: &DependencyPackage) -> String {
    if d.release.is_empty() || d.arch.is_empty() {
        format!("{}-{}", d.name, d.version)
    } else {
        format!("{}-{}-{}.{}", d.name, d.version, d.release, d.arch)
    }
}

/// Print one module's details with its fields wrapped at 80 columns.
pub fn write_module_info(module: &ModuleInfo, out: &mut dyn Write) -> io::Result<()> {
    write_wrapped(out, 6, 80, &format!("Name: {}", module.name))?;
    write_wrapped(out, 9, 80, &format!("Summary: {}", module.summary))?;
    write_wrapped(out, 10, 80, &format!("Homepage: {}", module.homepage))?;
    write_wrapped(out, 13, 80, &format!("Description: {}", module.description))?;
    writeln!(out, "Builds:")?;
    for b in &module.builds {
        writeln!(out, "    {}", b)?;
    }
    writeln!(out, "Dependencies:")?;
    for d in &module.dependencies {
        writeln!(out, "    {}", d)?;
    }
    writeln!(out)?;
    writeln!(out)?;
    Ok(())
}

/// Greedy word wrap at `width` columns; continuation lines are indented
/// by `indent` spaces so wrapped text lines up under the field value.
fn write_wrapped(out: &mut dyn Write, indent: usize, width: usize, text: &str) -> io::Result<()> {
    let mut column = 0usize;
    for word in text.split_whitespace() {
        if column == 0 {
            write!(out, "{}", word)?;
            column = word.len();
        } else if column + 1 + word.len() > width {
            write!(out, "\n{}{}", " ".repeat(indent), word)?;
            column = indent + word.len();
        } else {
            write!(out, " {}", word)?;
            column += 1 + word.len();
        }
    }
    writeln!(out)
}
