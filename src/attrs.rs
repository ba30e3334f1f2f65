//! Translation of per-file attribute requests into post-install commands.
//!
//! The staged layout does not preserve ownership or permissions, so declared
//! mode/owner/group requests become `chmod`/`chown`/`chgrp` lines in the
//! `%post` scriptlet. The descriptor writer emits them before any
//! user-supplied post-install line; custom logic may depend on the fixes
//! already having run.

/// Build the attribute commands for one packaged file, in the fixed order
/// mode, then owner, then group, one command per declared field.
///
/// `quoted_path` is the already-quoted packaged path. Field values pass
/// through verbatim; nothing validates mode or name syntax here; bad values
/// surface when the installed scriptlet runs on the target system.
pub fn translate(
    quoted_path: &str,
    mode: Option<&str>,
    owner: Option<&str>,
    group: Option<&str>,
) -> Vec<String> {
    let mut commands = Vec::new();

    if let Some(mode) = mode {
        commands.push(format!("chmod {} {}", mode, quoted_path));
    }
    if let Some(owner) = owner {
        commands.push(format!("chown {} {}", owner, quoted_path));
    }
    if let Some(group) = group {
        commands.push(format!("chgrp {} {}", group, quoted_path));
    }

    commands
}
