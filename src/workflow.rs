use colored::Colorize;
use modlist::agents::{BuiltList, ListBuilder, ListRow, Snapshot, SettingsEditor, SnapshotLoader};
use modlist::engine::{ActionButton, Category, SortMode};
use modlist::model::{Entry, SeparatorKind};
use modlist::settings::Settings;
use modlist::Result;
use std::path::Path;

/// Build the list for a snapshot using the stored settings.
fn build_list(
    settings: &Settings,
    snapshot: Snapshot,
    query: Option<&str>,
    sort_mode: SortMode,
) -> Result<BuiltList> {
    let rules = settings.exclusion_rules();
    let packages = snapshot.package_resolver();

    let mut builder = ListBuilder::new(&rules, &packages, settings.display.clone())
        .sort_mode(sort_mode)
        .disabled_repos(snapshot.disabled_repos());
    if let Some(query) = query {
        builder = builder.query(query);
    }
    for spec in &snapshot.notifications {
        let (kind, special) = spec.resolve();
        builder = builder.notification(kind, special);
    }
    for name in &snapshot.separators {
        builder = builder.separator(SeparatorKind::from_name(name));
    }

    builder.build(snapshot.installed, snapshot.catalog)
}

/// Execute the list workflow
pub fn execute_list(
    settings_path: &Path,
    snapshot_path: &Path,
    query: Option<&str>,
    sort_mode: SortMode,
) -> Result<()> {
    let settings = Settings::load(settings_path)?;
    let snapshot = SnapshotLoader::new(snapshot_path).load()?;
    let list = build_list(&settings, snapshot, query, sort_mode)?;

    if list.rows.is_empty() {
        println!("{}", "No modules to show.".yellow());
        return Ok(());
    }

    for row in &list.rows {
        print_row(row);
    }

    print_summary(&list);
    Ok(())
}

/// Execute the check workflow (summary only)
pub fn execute_check(settings_path: &Path, snapshot_path: &Path) -> Result<()> {
    let settings = Settings::load(settings_path)?;
    let snapshot = SnapshotLoader::new(snapshot_path).load()?;
    let list = build_list(&settings, snapshot, None, SortMode::Update)?;

    print_summary(&list);
    if !list.summary.has_updates {
        return Ok(());
    }

    println!("\n{}", "📦 Pending updates:".cyan().bold());
    for module in list.updatable() {
        let installed = module
            .local()
            .map(|local| local.installed_version_code)
            .unwrap_or_default();
        let available = module.available_version_code();
        println!(
            "  • {} {} → {}",
            module.display_name().white().bold(),
            installed.to_string().red(),
            available.to_string().green().bold()
        );
        match module.pending_download() {
            Some(download) => {
                println!("    {} {}", "from".dimmed(), download.url);
                println!(
                    "    {} {} {} {}",
                    "source".dimmed(),
                    download.source,
                    "checksum".dimmed(),
                    download.checksum.unwrap_or("-")
                );
            }
            None => println!("    {}", "no download available".yellow()),
        }
    }

    Ok(())
}

/// Execute the exclude workflow
pub fn execute_exclude(settings_path: &Path, module_id: &str, version: Option<&str>) -> Result<()> {
    let editor = SettingsEditor::new(settings_path);

    match version {
        Some(spec) => {
            let rule = editor.set_version_rule(module_id, spec)?;
            println!("{}", format!("✓ Stored version rule '{}'", rule).green());
        }
        None => {
            if editor.add_exclude(module_id)? {
                println!(
                    "{}",
                    format!("✓ Updates for '{}' will no longer be shown", module_id).green()
                );
            } else {
                println!(
                    "{}",
                    format!("'{}' is already excluded", module_id).yellow()
                );
            }
        }
    }

    Ok(())
}

/// Execute the include workflow
pub fn execute_include(settings_path: &Path, module_id: &str) -> Result<()> {
    let editor = SettingsEditor::new(settings_path);
    let result = editor.remove_module(module_id)?;

    if result.is_empty() {
        println!(
            "{}",
            format!("No exclusions were stored for '{}'", module_id).yellow()
        );
    } else {
        println!(
            "{}",
            format!(
                "✓ Removed exclusions for '{}' ({} version rule(s))",
                module_id, result.rules_removed
            )
            .green()
        );
    }

    Ok(())
}

fn print_row(row: &ListRow) {
    match &row.entry {
        Entry::Module(module) => {
            let label = format!("[{}]", row.category);
            let label = match row.category {
                Category::Updatable => label.green().bold(),
                Category::Installed => label.cyan(),
                _ => label.normal(),
            };

            let mut versions = Vec::new();
            if let Some(local) = module.local() {
                versions.push(format!("installed {}", local.installed_version_code));
            }
            if let Some(remote) = module.remote() {
                versions.push(format!("{} {}", remote.source_repo_id, remote.version_code));
            }
            let updated = module.last_updated_text();
            if !updated.is_empty() {
                versions.push(format!("updated {}", updated));
            }

            println!(
                "{} {} {} {}",
                label,
                module.display_name().white().bold(),
                format!("({})", module.id()).dimmed(),
                versions.join(", ").dimmed()
            );
            if !row.buttons.is_empty() {
                println!("    {}", format_buttons(&row.buttons));
            }
        }
        Entry::Notification { kind, special } => {
            let text = format!("! {}", kind);
            if *special {
                println!("{}", text.magenta().bold());
            } else {
                println!("{}", text.yellow());
            }
        }
        Entry::Separator(kind) => println!("\n{}", format!("── {} ──", kind).cyan().bold()),
        Entry::Footer { .. } => {}
    }
}

fn format_buttons(buttons: &[ActionButton]) -> String {
    buttons
        .iter()
        .map(|button| match button {
            ActionButton::Warning => button.to_string().red().bold().to_string(),
            ActionButton::Safe => button.to_string().green().to_string(),
            _ => button.to_string().dimmed().to_string(),
        })
        .collect::<Vec<_>>()
        .join(" · ")
}

fn print_summary(list: &BuiltList) {
    if list.summary.has_updates {
        println!(
            "\n{}",
            format!("{} module(s) have updates", list.summary.count)
                .green()
                .bold()
        );
    } else {
        println!("\n{}", "✨ All modules are up to date!".green().bold());
    }
}
