use clap::{Parser, Subcommand};

/// math-callout - Numbered theorem callouts for markdown vaults
///
/// # Quick Reference
///
/// ## Indexing
///
/// ```bash
/// math-callout index algebra/groups.md          # Print numbered titles, labels, equation tags
/// math-callout index algebra/groups.md --write  # Rewrite callout headers in place
/// math-callout refs algebra/rings.md            # Resolve [[note#^id]] links and list backlinks
/// ```
///
/// A math callout is a blockquote whose first line carries its settings:
///
/// ```text
/// > [!math|{"type":"theorem","title":"Lagrange","label":"lagrange"}] Theorem 1 (Lagrange).
/// > The order of a subgroup divides the order of the group.
/// ```
///
/// ## Configuration
///
/// Options are set per file or folder and inherited downwards; the
/// nearest location wins. `/` is the vault root.
///
/// ```bash
/// math-callout resolve algebra/groups.md              # Effective configuration
/// math-callout config show algebra                    # Options stored at a location
/// math-callout config set algebra numberStyle roman
/// math-callout config set algebra rename '{"theorem":"Satz"}'
/// math-callout config unset algebra numberStyle
/// ```
///
/// ## Profiles
///
/// ```bash
/// math-callout profile list
/// math-callout profile copy English                   # -> "Copy of English"
/// math-callout profile rename "Copy of English" Mine  # Cascades to every location
/// math-callout profile name Mine theorem "Thm"
/// math-callout profile tags Mine "en,short"
/// math-callout profile delete Mine --replace English
/// math-callout profile delete Mine --unset
/// ```
///
/// ## Excluded Files
///
/// ```bash
/// math-callout exclude add drafts
/// math-callout exclude list
/// ```
///
/// ## Environment Variables
///
/// - `MATH_CALLOUT_VAULT`: Vault directory (default: current directory)
/// - `MATH_CALLOUT_LOG`: Log filter, e.g. `debug` or `math_callout=info` (default: warn)
///
#[derive(Parser, Debug)]
#[command(name = "math-callout")]
#[command(version = "0.1.0")]
#[command(about = "Numbered theorem callouts, equation numbering and labels for markdown vaults")]
pub struct Cli {
    /// Vault directory (default: $MATH_CALLOUT_VAULT or the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub vault: Option<String>,

    /// Output in JSON format (for scripting)
    #[arg(short = 'j', long, global = true)]
    pub json: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Number the callouts and equations of a document
    #[command(alias = "i")]
    Index {
        /// Document path or vault location
        file: String,

        /// Rewrite callout headers with their titles and indices
        #[arg(short, long)]
        write: bool,
    },

    /// Print the fully resolved configuration at a location
    #[command(alias = "rv")]
    Resolve {
        /// Vault location (`/` for the root)
        location: String,
    },

    /// Edit per-location configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Manage display-name profiles
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Manage locations excluded from indexing
    #[command(subcommand)]
    Exclude(ExcludeCommand),

    /// Resolve block references in a document and list its backlinks
    Refs {
        /// Document path or vault location
        file: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show options stored at a location
    Show {
        location: String,
    },

    /// Set an option (value parsed as JSON when possible)
    Set {
        location: String,
        key: String,
        value: String,
    },

    /// Remove an option from a non-root location
    Unset {
        location: String,
        key: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// List profiles
    #[command(alias = "ls")]
    List,

    /// Show a profile's display names
    Show {
        id: String,
    },

    /// Add an empty profile
    Add {
        id: String,
    },

    /// Rename a profile, updating every location that uses it
    Rename {
        old: String,
        new: String,
    },

    /// Copy a profile under a fresh "Copy of" name
    Copy {
        id: String,
    },

    /// Delete a profile
    Delete {
        id: String,

        /// Repoint locations using the profile to this one
        #[arg(long, conflicts_with = "unset")]
        replace: Option<String>,

        /// Unset the profile at locations using it
        #[arg(long)]
        unset: bool,
    },

    /// Replace a profile's tags (comma-separated)
    Tags {
        id: String,
        tags: String,
    },

    /// Set the display name of one kind
    Name {
        id: String,
        /// Kind, e.g. theorem, lemma
        kind: String,
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExcludeCommand {
    /// Exclude a file or folder
    Add {
        location: String,
    },

    /// Remove an exclusion
    Remove {
        location: String,
    },

    /// List excluded locations
    #[command(alias = "ls")]
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profile_delete() {
        let cli = Cli::parse_from(["math-callout", "profile", "delete", "Mine", "--replace", "English"]);
        match cli.command {
            Command::Profile(ProfileCommand::Delete { id, replace, unset }) => {
                assert_eq!(id, "Mine");
                assert_eq!(replace.as_deref(), Some("English"));
                assert!(!unset);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(Cli::try_parse_from([
            "math-callout", "profile", "delete", "Mine", "--replace", "English", "--unset"
        ])
        .is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["math-callout", "index", "a.md", "--json", "--vault", "/tmp/v", "-w"]);
        assert!(cli.json);
        assert_eq!(cli.vault.as_deref(), Some("/tmp/v"));
        assert!(matches!(cli.command, Command::Index { write: true, .. }));
    }
}
