pub mod block;
pub mod cli;
pub mod config;
pub mod constants;
pub mod context;
pub mod edit;
pub mod engine;
pub mod equation;
pub mod error;
pub mod format;
pub mod indexer;
pub mod kind;
pub mod links;
pub mod location;
pub mod markdown;
pub mod numeral;
pub mod profile;
pub mod registry;
pub mod resolver;
pub mod state;
pub mod store;
pub mod util;

pub use block::{parse_header, CalloutHeader, CalloutSettings};
pub use cli::{Cli, Command};
pub use context::Context;
pub use config::{CalloutStyle, Configuration, RefFormat, ResolvedConfig, OPTION_KEYS};
pub use edit::{apply_edits, EditOp, ValidationError};
pub use engine::CalloutEngine;
pub use error::{Error, Result};
pub use format::{format_label, format_reference, format_title};
pub use indexer::{write_back, IndexedCallout, IndexedDocument, IndexedEquation, Indexer, RenderSink};
pub use kind::TheoremKind;
pub use links::{LabelIndex, LinkIndex, VaultLinkIndex};
pub use location::Location;
pub use numeral::{convert, NumberStyle};
pub use profile::{Profile, ProfileBody};
pub use registry::DeletePlan;
pub use resolver::{resolve_config, resolve_settings, ResolvedSettings};
pub use state::PluginState;
pub use store::{FileStore, MemoryStore, Slot, Store};
