//! Subcommand implementations
//!
//! Each command writes its report to `out` and leaves error rendering to
//! the caller.

use std::io::Write;

use anyhow::Context;
use pon_engine::{EngineError, Intent, ProfileEngine};
use pon_schema::tables::tcont_type_description;
use pon_schema::{descriptors, FieldId, FieldValue, ProfileKind};
use pon_store::{ProfileStore, ScanUsageIndex, UsageIndex};

/// Options of `modify`
#[derive(Debug, Clone, Default)]
pub(crate) struct ModifyOptions {
    /// `(field, raw value)` pairs in command-line order
    pub(crate) sets: Vec<(String, String)>,
    pub(crate) copy_as: Option<String>,
    pub(crate) commit_as: Option<String>,
    pub(crate) dry_run: bool,
}

/// Parse `Field=value`; the value may be empty or contain `=`
pub(crate) fn parse_assignment(arg: &str) -> Result<(String, String), String> {
    let (field, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected Field=value, got '{arg}'"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{arg}'"));
    }
    Ok((field.to_string(), value.to_string()))
}

pub(crate) fn list<S: ProfileStore>(engine: &ProfileEngine<S>, kind: ProfileKind, out: &mut dyn Write) -> anyhow::Result<()> {
    let profiles = engine.list(kind)?;
    if profiles.is_empty() {
        writeln!(out, "no {}s", kind.label())?;
        return Ok(());
    }
    let index = ScanUsageIndex::new(engine.store());
    for profile in profiles {
        let users = index.dependents(kind, profile.name())?.len();
        if users == 0 {
            writeln!(out, "{}", profile.name())?;
        } else {
            writeln!(out, "{}\t(in use by {users})", profile.name())?;
        }
    }
    Ok(())
}

pub(crate) fn show<S: ProfileStore>(
    engine: &ProfileEngine<S>,
    kind: ProfileKind,
    name: &str,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let profile = engine.get(kind, name)?;
    writeln!(out, "{profile}")?;
    for desc in descriptors(kind) {
        let value = profile.value_of(desc);
        if desc.sentinel.matches(&value) {
            writeln!(out, "  {:<32} -", desc.id)?;
        } else {
            writeln!(out, "  {:<32} {value}", desc.id)?;
        }
    }
    if kind == ProfileKind::OnuTcont {
        let tcont_type = profile.fields().get(&FieldId::TcontType).and_then(FieldValue::as_int).unwrap_or(0);
        writeln!(out, "  {}", tcont_type_description(tcont_type))?;
    }
    for (key, value) in profile.extra() {
        writeln!(out, "  {key:<32} {value} (not editable)")?;
    }
    Ok(())
}

pub(crate) fn usage<S: ProfileStore>(
    engine: &ProfileEngine<S>,
    kind: ProfileKind,
    name: &str,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let report = engine.usage(kind, name)?;
    if !report.is_in_use() {
        writeln!(out, "{} '{name}' is not in use", kind.label())?;
        return Ok(());
    }
    writeln!(out, "{} '{name}' is used by:", kind.label())?;
    for dependent in &report.dependents {
        writeln!(out, "  {dependent}")?;
    }
    if kind != ProfileKind::Service && !report.onus.is_empty() {
        writeln!(out, "reaching ONUs: {}", report.onus.join(", "))?;
    }
    Ok(())
}

pub(crate) fn modify<S: ProfileStore>(
    engine: &ProfileEngine<S>,
    kind: ProfileKind,
    name: &str,
    options: &ModifyOptions,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let mut txn = engine.begin_transaction(kind, name, Intent::Modify)?;
    if txn.is_in_use() {
        writeln!(out, "{} '{name}' is in use by {} object(s)", kind.label(), txn.dependents().len())?;
    }

    if let Some(copy) = &options.copy_as {
        let assigned = txn.assign_name(copy)?;
        writeln!(out, "editing as '{assigned}'")?;
    }

    for (field, raw) in &options.sets {
        let report = txn
            .apply_field_named(field, raw)
            .with_context(|| format!("setting {field}={raw}"))?;
        writeln!(out, "  {report}")?;
    }

    if options.dry_run {
        let body = serde_json::to_string_pretty(&txn.preview()).context("rendering device body")?;
        writeln!(out, "{body}")?;
        txn.abort();
        return Ok(());
    }

    let commit = txn.commit(options.commit_as.as_deref())?;
    match &commit.deleted {
        Some(deleted) if *deleted != commit.name => {
            writeln!(out, "committed {} '{}' (replacing '{deleted}')", kind.label(), commit.name)?;
        }
        _ => writeln!(out, "committed {} '{}'", kind.label(), commit.name)?,
    }
    Ok(())
}

pub(crate) fn delete<S: ProfileStore>(
    engine: &ProfileEngine<S>,
    kind: ProfileKind,
    name: &str,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match engine.delete(kind, name) {
        Ok(()) => {
            writeln!(out, "deleted {} '{name}'", kind.label())?;
            Ok(())
        }
        Err(err @ EngineError::InUseBlocked { .. }) => {
            for dependent in err.dependents() {
                writeln!(out, "  used by {dependent}")?;
            }
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn fields(kind: ProfileKind, out: &mut dyn Write) -> anyhow::Result<()> {
    let table = descriptors(kind);
    if table.is_empty() {
        writeln!(out, "{}s have no editable fields", kind.label())?;
        return Ok(());
    }
    for desc in table {
        write!(
            out,
            "{:<32} {:<8} {} (unset: {})",
            desc.id,
            desc.value_type.as_str(),
            desc.domain,
            desc.sentinel.value()
        )?;
        if let Some(gate) = &desc.gate {
            let values: Vec<String> = gate.any_of.iter().map(i64::to_string).collect();
            write!(out, " when {} in {{{}}}", gate.field, values.join(","))?;
        }
        if let Some(target) = desc.reference {
            write!(out, " -> {}", target.label())?;
        }
        writeln!(out, "  {}", desc.help)?;
    }
    Ok(())
}
