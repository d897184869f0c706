//! Settings CLI commands
//!
//! Every edit is saved immediately and recorded in the audit log.

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::{ListKind, Settings};
use crate::error::{SplitError, SplitResult};
use crate::services::SettingsService;

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show current settings
    Show {
        /// Print as JSON (token redacted)
        #[arg(long)]
        json: bool,
    },

    /// Set the partner's share of ordinary expenses (e.g. 0.5)
    #[command(name = "set-rate")]
    SetRate {
        #[arg(allow_negative_numbers = true)]
        rate: f64,
    },

    /// Set the partner's display name
    #[command(name = "set-partner")]
    SetPartner { name: String },

    /// Add an entry to a list
    Add {
        /// Which list to edit
        #[arg(value_enum)]
        list: ListKind,
        /// Category, subcategory or account name
        item: String,
    },

    /// Remove an entry from a list by name or position
    Remove {
        /// Which list to edit
        #[arg(value_enum)]
        list: ListKind,
        /// Entry to remove
        #[arg(required_unless_present = "index")]
        item: Option<String>,
        /// 0-based position to remove instead of a name
        #[arg(long, conflicts_with = "item")]
        index: Option<usize>,
    },

    /// Configure the spreadsheet endpoint
    #[command(name = "set-export")]
    SetExport {
        /// Web app URL
        url: String,
        /// Shared token (prompted for when omitted)
        #[arg(long)]
        token: Option<String>,
    },

    /// Remove the spreadsheet endpoint
    #[command(name = "clear-export")]
    ClearExport,

    /// Replace settings from a JSON file (browser extension keys accepted)
    Import { file: PathBuf },
}

/// Handle a settings command
pub fn handle_settings_command(
    service: &SettingsService,
    cmd: SettingsCommands,
) -> SplitResult<()> {
    match cmd {
        SettingsCommands::Show { json } => {
            let settings = service.load()?;
            if json {
                let mut shown = settings;
                if let Some(export) = shown.export.as_mut() {
                    export.token = "<redacted>".into();
                }
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                print!("{}", format_settings(&settings));
            }
        }

        SettingsCommands::SetRate { rate } => {
            let settings = service.set_split_rate(rate)?;
            println!("Split rate set to {}", settings.split_rate);
            if !settings.split_rate_in_range() {
                eprintln!("Warning: split rate {} is outside 0..=1", settings.split_rate);
            }
        }

        SettingsCommands::SetPartner { name } => {
            let settings = service.set_partner_name(&name)?;
            println!("Partner name set to {}", settings.partner_name);
        }

        SettingsCommands::Add { list, item } => {
            if service.add_item(list, &item)? {
                println!("Added '{}' to {}", item.trim(), list);
            } else {
                println!("'{}' is already in {}", item.trim(), list);
            }
        }

        SettingsCommands::Remove { list, item, index } => match (item, index) {
            (_, Some(index)) => match service.remove_index(list, index)? {
                Some(removed) => println!("Removed '{}' from {}", removed, list),
                None => println!("No entry at position {} in {}", index, list),
            },
            (Some(item), None) => {
                service.remove_item(list, &item)?;
                println!("Removed '{}' from {}", item.trim(), list);
            }
            (None, None) => {
                return Err(SplitError::Validation(
                    "Give an entry name or --index".into(),
                ))
            }
        },

        SettingsCommands::SetExport { url, token } => {
            let token = match token {
                Some(token) => token,
                None => prompt_token()?,
            };
            service.set_export(&url, &token)?;
            println!("Spreadsheet endpoint set to {}", url.trim());
        }

        SettingsCommands::ClearExport => {
            if service.clear_export()? {
                println!("Spreadsheet endpoint removed");
            } else {
                println!("No spreadsheet endpoint was configured");
            }
        }

        SettingsCommands::Import { file } => {
            let settings = service.import_from(&file)?;
            println!("Imported settings from {}", file.display());
            print!("{}", format_settings(&settings));
        }
    }

    Ok(())
}

/// Prompt for the export token (hidden input)
fn prompt_token() -> SplitResult<String> {
    rpassword::prompt_password("Export token: ")
        .map_err(|e| SplitError::Io(format!("Failed to read token: {}", e)))
}

/// Format settings for display
pub fn format_settings(settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Partner name: {}\n", settings.partner_name));
    output.push_str(&format!("Split rate:   {}\n", settings.split_rate));

    for kind in [
        ListKind::PartnerAccount,
        ListKind::Category,
        ListKind::Subcategory,
    ] {
        let list = settings.list(kind);
        output.push_str(&format!("\n{} ({}):\n", capitalize(&kind.to_string()), list.len()));
        if list.is_empty() {
            output.push_str("  (none)\n");
        }
        for (index, item) in list.iter().enumerate() {
            output.push_str(&format!("  [{}] {}\n", index, item));
        }
    }

    output.push('\n');
    match &settings.export {
        Some(export) => output.push_str(&format!("Export:       {} (token set)\n", export.url)),
        None => output.push_str("Export:       not configured\n"),
    }

    output
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportEndpoint;

    #[test]
    fn test_format_settings() {
        let mut settings = Settings::default();
        settings.partner_accounts.push("Bank X".into());
        settings.expense_category_exclusions.push("振替".into());
        settings.export = Some(ExportEndpoint {
            url: "https://example.com/exec".into(),
            token: "secret".into(),
        });

        let text = format_settings(&settings);

        assert!(text.contains("Partner name: Partner"));
        assert!(text.contains("Partner accounts (1):"));
        assert!(text.contains("  [0] Bank X"));
        assert!(text.contains("Category exclusions (1):"));
        assert!(text.contains("  [0] 振替"));
        assert!(text.contains("Subcategory exclusions (0):"));
        assert!(text.contains("https://example.com/exec (token set)"));
        assert!(!text.contains("secret"));
    }
}
